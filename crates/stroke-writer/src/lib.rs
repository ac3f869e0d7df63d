//! `stroke-writer` lays out plain text in a single-stroke font and turns it
//! into G-code for pen plotters and drawing robots.
//!
//! Text is split into words, wrapped to a fixed line width and traced glyph
//! by glyph. The resulting commands are handed to a [CommandSink], which may
//! print them, stream them to a plotter, or render an SVG preview:
//!
//! ```
//! use stroke_writer::{ConsoleSink, GlyphTable, LayoutConfig, PenPower, Writer};
//!
//! let table = GlyphTable::parse("999 73 2 0 0 0 0 18 1")?;
//! let mut sink = ConsoleSink::new(Vec::new());
//!
//! Writer::new(&table, &LayoutConfig::default(), PenPower::default())
//!     .write_document(*b"II", &mut sink)?;
//!
//! let gcode = String::from_utf8(sink.into_inner())?;
//! assert!(gcode.starts_with("S0\nG0 X0.00 Y0.00\nS1000\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::path::Path;

pub use stroke_writer_core::{DESIGN_UNITS, Glyph, GlyphTable, LoadError, Point, Stroke};
use tracing::debug;

pub mod config;
pub mod gcode;
pub mod layout;
pub mod segment;
pub mod sink;
mod writer;

pub use config::{ConfigError, FontSize, LayoutConfig, PenPower};
pub use gcode::{CodeGenerator, Command, DEFAULT_PEN_POWER};
pub use layout::{LayoutState, word_width};
pub use segment::{Segmenter, Token};
pub use sink::{
    CommandSink, ConsoleSink, DeviceConfig, DeviceSink, RetryPolicy, SinkError, SvgSink,
};
pub use writer::{DocumentStats, Writer};

/// Read and parse a font description file.
pub fn load_font(path: impl AsRef<Path>) -> Result<GlyphTable, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        debug!(path = %path.display(), error = %err, "cannot read font description");
        LoadError::NotFound(path.display().to_string())
    })?;

    let table = GlyphTable::parse(&String::from_utf8_lossy(&bytes))?;
    debug!(path = %path.display(), glyphs = table.defined(), "loaded font");
    Ok(table)
}
