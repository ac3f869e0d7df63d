//! `stroke-writer`: write a text file as pen plotter G-code.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use stroke_writer::{
    CommandSink, ConfigError, ConsoleSink, DEFAULT_PEN_POWER, DeviceConfig, DeviceSink, FontSize,
    LayoutConfig, LoadError, PenPower, RetryPolicy, SinkError, SvgSink, Writer, load_font,
};
use thiserror::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

mod prompt;

/// Where generated commands go.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Print G-code to stdout or to `--output`
    Console,
    /// Stream G-code to a plotter at `--device`
    Device,
    /// Render an SVG preview to `--output`
    Preview,
}

#[derive(Parser, Debug)]
#[command(version, about = "Write text files as pen plotter G-code")]
struct Cli {
    /// Text file to write
    #[arg(default_value = "TestData.txt")]
    input: PathBuf,

    /// Single-stroke font description
    #[arg(short, long, default_value = "SingleStrokeFont.txt")]
    font: PathBuf,

    /// Font size between 4 and 10 (asked for interactively when omitted)
    #[arg(short = 's', long)]
    font_size: Option<f32>,

    /// Width after which words wrap onto a new line
    #[arg(long, default_value_t = 100.0)]
    line_width: f32,

    /// Gap between lines, added to the font size
    #[arg(long, default_value_t = 2.0)]
    line_spacing: f32,

    /// Width of a tab in spaces
    #[arg(long, default_value_t = 4)]
    tab_width: u32,

    /// Characters kept per word; the rest of a longer word is dropped
    #[arg(long, default_value_t = 99)]
    max_word_len: usize,

    /// Spindle power that lowers the pen
    #[arg(long, default_value_t = DEFAULT_PEN_POWER)]
    pen_power: u16,

    #[arg(short, long, value_enum, default_value_t = Mode::Console)]
    mode: Mode,

    /// Output file (console mode defaults to stdout, preview mode to preview.svg)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Serial device of the plotter
    #[arg(long, value_name = "PATH")]
    device: Option<PathBuf>,

    /// Feed rate sent to the plotter before drawing
    #[arg(long, default_value_t = 1000)]
    feed: u32,

    /// Attempts per device operation before giving up
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Delay before the first retry, doubled on every further retry
    #[arg(long, default_value_t = 100, value_name = "MS")]
    retry_backoff_ms: u64,

    /// Pause after each acknowledged command
    #[arg(long, default_value_t = 0, value_name = "MS")]
    settle_ms: u64,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Font(#[from] LoadError),

    #[error("could not read {}: {source}", .path.display())]
    Document { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("device mode needs --device")]
    MissingDevice,

    #[error("could not read the font size: {0}")]
    Prompt(io::Error),

    #[error("could not open {}: {source}", .path.display())]
    Output { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Font(LoadError::NotFound(_)) => 1,
            Self::Font(_) => 2,
            Self::Document { .. } => 3,
            Self::Output { .. } | Self::Sink(_) => 4,
            Self::Config(_) | Self::MissingDevice | Self::Prompt(_) => 5,
        }
    }
}

impl Cli {
    fn layout_config(&self, font_size: FontSize) -> Result<LayoutConfig, ConfigError> {
        let config = LayoutConfig {
            font_size,
            line_width: self.line_width,
            line_spacing: self.line_spacing,
            tab_width: self.tab_width,
            max_word_len: self.max_word_len,
        };
        config.validate()?;
        Ok(config)
    }

    fn device_config(&self) -> DeviceConfig {
        DeviceConfig {
            feed: self.feed,
            retry: RetryPolicy {
                attempts: self.retries,
                backoff: Duration::from_millis(self.retry_backoff_ms),
            },
            settle: Duration::from_millis(self.settle_ms),
        }
    }
}

fn init_logging(verbose: u8) {
    let default_directives = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    // G-code may go to stdout, so logs stay on stderr.
    registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn create(path: &Path) -> Result<BufWriter<File>, CliError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| CliError::Output {
            path: path.to_owned(),
            source,
        })
}

fn open_sink(cli: &Cli) -> Result<Box<dyn CommandSink>, CliError> {
    let sink: Box<dyn CommandSink> = match cli.mode {
        Mode::Console => match &cli.output {
            Some(path) => Box::new(ConsoleSink::new(create(path)?)),
            None => Box::new(ConsoleSink::new(io::stdout().lock())),
        },
        Mode::Preview => {
            let path = cli
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from("preview.svg"));
            Box::new(SvgSink::new(create(&path)?))
        }
        Mode::Device => {
            let path = cli.device.as_ref().ok_or(CliError::MissingDevice)?;
            let port = OpenOptions::new()
                .read(true)
                .write(true)
                .open(path)
                .map_err(|source| CliError::Output {
                    path: path.clone(),
                    source,
                })?;
            info!(device = %path.display(), "connecting to plotter");
            Box::new(DeviceSink::connect(port, cli.device_config())?)
        }
    };
    Ok(sink)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let table = load_font(&cli.font)?;
    info!(font = %cli.font.display(), glyphs = table.defined(), "font loaded");

    let font_size = match cli.font_size {
        Some(size) => FontSize::new(size)?,
        None => prompt::font_size(&mut io::stdin().lock(), &mut io::stderr())
            .map_err(CliError::Prompt)?,
    };
    let config = cli.layout_config(font_size)?;
    let pen_power = PenPower::new(cli.pen_power)?;
    debug!(?config, pen_power = pen_power.get(), "layout");

    let text = std::fs::read(&cli.input).map_err(|source| CliError::Document {
        path: cli.input.clone(),
        source,
    })?;

    let mut sink = open_sink(cli)?;
    let stats = Writer::new(&table, &config, pen_power).write_document(text, &mut sink)?;

    info!(
        words = stats.words,
        lines = stats.lines,
        commands = stats.commands,
        mode = ?cli.mode,
        "finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "stroke-writer failed");
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_layout_config() {
        let cli = Cli::parse_from(["stroke-writer"]);
        assert_eq!(cli.input, PathBuf::from("TestData.txt"));
        assert_eq!(cli.font, PathBuf::from("SingleStrokeFont.txt"));
        assert_eq!(cli.mode, Mode::Console);

        let config = cli.layout_config(FontSize::default()).unwrap();
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn exit_codes_by_failure() {
        assert_eq!(CliError::Font(LoadError::NotFound("f".into())).exit_code(), 1);
        assert_eq!(
            CliError::Font(LoadError::OutOfRange {
                code: 300,
                position: 2
            })
            .exit_code(),
            2
        );
        assert_eq!(
            CliError::Document {
                path: "t".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }
            .exit_code(),
            3
        );
        assert_eq!(CliError::Sink(SinkError::Disconnected).exit_code(), 4);
        assert_eq!(CliError::MissingDevice.exit_code(), 5);
        assert_eq!(CliError::Config(ConfigError::PenPower).exit_code(), 5);
    }

    #[test]
    fn parses_device_options() {
        let cli = Cli::parse_from([
            "stroke-writer",
            "notes.txt",
            "--mode",
            "device",
            "--device",
            "/dev/ttyUSB0",
            "--retries",
            "5",
            "--settle-ms",
            "100",
        ]);
        let config = cli.device_config();
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.settle, Duration::from_millis(100));
        assert_eq!(config.feed, 1000);
    }
}
