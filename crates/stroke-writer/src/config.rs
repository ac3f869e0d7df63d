//! Layout configuration.

use std::num::NonZeroU16;
use std::str::FromStr;

use stroke_writer_core::DESIGN_UNITS;
use thiserror::Error;

use crate::gcode::DEFAULT_PEN_POWER;

/// Smallest font size accepted, in output units.
pub const MIN_FONT_SIZE: f32 = 4.0;
/// Largest font size accepted, in output units.
pub const MAX_FONT_SIZE: f32 = 10.0;

/// Errors raised while validating configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("font size {0} is outside 4-10")]
    FontSizeOutOfRange(f32),

    #[error("{0:?} is not a number")]
    NotANumber(String),

    #[error("line width must be positive, got {0}")]
    LineWidth(f32),

    #[error("line spacing must not be negative, got {0}")]
    LineSpacing(f32),

    #[error("maximum word length must be at least 1")]
    MaxWordLength,

    #[error("pen power must be at least 1, or the pen would never go down")]
    PenPower,
}

/// A font size which has been checked against the supported range.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct FontSize(f32);

impl FontSize {
    pub fn new(size: f32) -> Result<Self, ConfigError> {
        if (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
            Ok(Self(size))
        } else {
            Err(ConfigError::FontSizeOutOfRange(size))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Ratio between output units and font design units.
    pub fn scale_factor(self) -> f32 {
        self.0 / DESIGN_UNITS
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(MAX_FONT_SIZE)
    }
}

impl FromStr for FontSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size = s
            .trim()
            .parse::<f32>()
            .map_err(|_| ConfigError::NotANumber(s.trim().to_owned()))?;
        Self::new(size)
    }
}

/// Spindle power sent to lower the pen. `S0` always means pen up, so zero is
/// not a valid power.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PenPower(NonZeroU16);

impl PenPower {
    pub fn new(power: u16) -> Result<Self, ConfigError> {
        NonZeroU16::new(power).map(Self).ok_or(ConfigError::PenPower)
    }

    pub fn get(self) -> u16 {
        self.0.get()
    }
}

impl Default for PenPower {
    fn default() -> Self {
        const POWER: NonZeroU16 = match NonZeroU16::new(DEFAULT_PEN_POWER) {
            Some(power) => power,
            None => panic!("default pen power must not be zero"),
        };
        Self(POWER)
    }
}

/// Page geometry used by the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub font_size: FontSize,
    /// Width after which words wrap onto the next line.
    pub line_width: f32,
    /// Extra gap between lines, on top of the font size.
    pub line_spacing: f32,
    /// Width of a tab, counted in spaces.
    pub tab_width: u32,
    /// Longest word kept; further characters of a word are dropped.
    pub max_word_len: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_size: FontSize::default(),
            line_width: 100.0,
            line_spacing: 2.0,
            tab_width: 4,
            max_word_len: 99,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.line_width > 0.0) {
            return Err(ConfigError::LineWidth(self.line_width));
        }
        if !(self.line_spacing >= 0.0) {
            return Err(ConfigError::LineSpacing(self.line_spacing));
        }
        if self.max_word_len == 0 {
            return Err(ConfigError::MaxWordLength);
        }
        Ok(())
    }
}
