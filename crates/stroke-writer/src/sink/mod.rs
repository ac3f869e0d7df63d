//! Destinations for generated commands.
//!
//! A run writes to exactly one [CommandSink], picked at startup:
//! - [ConsoleSink] prints G-code, one command per line
//! - [DeviceSink] streams commands to a plotter and waits for each to be acknowledged
//! - [SvgSink] renders the pen path to an SVG preview instead of moving anything

use std::io::{self, Write};

use thiserror::Error;

use crate::gcode::Command;

mod device;
mod preview;

pub use device::{DeviceConfig, DeviceSink, RetryPolicy};
pub use preview::SvgSink;

/// Failures while delivering commands.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The device answered a command with an error reply.
    #[error("device rejected `{command}`: {reply}")]
    Rejected { command: String, reply: String },

    #[error("device closed the connection")]
    Disconnected,

    #[error("device still failing after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: io::Error,
    },
}

/// Something that accepts a stream of [Command]s.
pub trait CommandSink {
    fn emit(&mut self, command: &Command) -> Result<(), SinkError>;

    /// Called once after the last command of a document.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn emit(&mut self, command: &Command) -> Result<(), SinkError> {
        (**self).emit(command)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn emit(&mut self, command: &Command) -> Result<(), SinkError> {
        (**self).emit(command)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

/// Writes each command as a line of text.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CommandSink for ConsoleSink<W> {
    fn emit(&mut self, command: &Command) -> Result<(), SinkError> {
        writeln!(self.out, "{command}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}
