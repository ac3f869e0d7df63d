use std::io::{self, BufRead, BufReader, ErrorKind, Read, Write};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::{CommandSink, SinkError};
use crate::gcode::Command;

/// How often, and how patiently, transient I/O failures are retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per operation, including the first.
    pub attempts: u32,
    /// Delay before the first retry; doubles after each further failure.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    /// Feed rate sent with the initial homing move.
    pub feed: u32,
    pub retry: RetryPolicy,
    /// Pause after each acknowledged command.
    pub settle: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            feed: 1000,
            retry: RetryPolicy::default(),
            settle: Duration::ZERO,
        }
    }
}

/// Streams commands to a plotter over a line-based serial link.
///
/// Every command is written as one line, then the sink blocks until the
/// device answers `ok`. Any timeout comes from the underlying port.
pub struct DeviceSink<P: Read + Write> {
    port: BufReader<P>,
    config: DeviceConfig,
    reply: String,
}

impl<P: Read + Write> DeviceSink<P> {
    /// Wake the device, wait for its banner and put it into drawing mode.
    pub fn connect(port: P, config: DeviceConfig) -> Result<Self, SinkError> {
        let mut sink = Self {
            port: BufReader::new(port),
            config,
            reply: String::new(),
        };

        info!("waking up the plotter");
        sink.send("")?;
        sink.wait_for_banner()?;
        info!("plotter is ready to draw");

        let feed = sink.config.feed;
        for command in [Command::Home { feed }, Command::SpindleOn, Command::PenUp] {
            sink.emit(&command)?;
        }

        Ok(sink)
    }

    pub fn into_inner(self) -> P {
        self.port.into_inner()
    }

    /// Write `line` and its newline. A retry resumes after the bytes the
    /// port already accepted, so the device never sees part of a line twice.
    fn send(&mut self, line: &str) -> Result<(), SinkError> {
        let line = format!("{line}\n");
        let bytes = line.as_bytes();
        let port = self.port.get_mut();
        let mut written = 0;

        retry(&self.config.retry, || {
            while written < bytes.len() {
                match port.write(&bytes[written..])? {
                    0 => return Err(ErrorKind::WriteZero.into()),
                    n => written += n,
                }
            }
            port.flush()
        })
    }

    /// Read the next non-blank line from the device.
    fn read_reply(&mut self) -> Result<&str, SinkError> {
        loop {
            self.reply.clear();
            let port = &mut self.port;
            let reply = &mut self.reply;
            let read = retry(&self.config.retry, || port.read_line(reply))?;

            if read == 0 {
                return Err(SinkError::Disconnected);
            }
            if !self.reply.trim().is_empty() {
                return Ok(self.reply.trim());
            }
        }
    }

    /// The device announces itself with a banner containing `$`.
    fn wait_for_banner(&mut self) -> Result<(), SinkError> {
        loop {
            let reply = self.read_reply()?;
            debug!(reply, "device");
            if reply.contains('$') {
                return Ok(());
            }
        }
    }

    fn wait_for_ack(&mut self, command: &str) -> Result<(), SinkError> {
        loop {
            let reply = self.read_reply()?;

            if reply.starts_with("ok") {
                return Ok(());
            }
            if reply.starts_with("error") {
                return Err(SinkError::Rejected {
                    command: command.to_owned(),
                    reply: reply.to_owned(),
                });
            }

            debug!(reply, "ignoring device message");
        }
    }
}

impl<P: Read + Write> CommandSink for DeviceSink<P> {
    fn emit(&mut self, command: &Command) -> Result<(), SinkError> {
        let line = command.to_string();
        trace!(command = %line, "sending");

        self.send(&line)?;
        self.wait_for_ack(&line)?;

        if !self.config.settle.is_zero() {
            thread::sleep(self.config.settle);
        }
        Ok(())
    }
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}

/// Run `op`, retrying transient failures with exponential backoff.
fn retry<T>(policy: &RetryPolicy, mut op: impl FnMut() -> io::Result<T>) -> Result<T, SinkError> {
    let attempts = policy.attempts.max(1);
    let mut delay = policy.backoff;
    let mut attempt = 1;

    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if is_transient(&err) => {
                if attempt >= attempts {
                    return Err(SinkError::RetriesExhausted {
                        attempts,
                        source: err,
                    });
                }

                warn!(attempt, ?delay, error = %err, "device I/O failed, retrying");
                thread::sleep(delay);
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
