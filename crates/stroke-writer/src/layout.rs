//! Cursor tracking and line wrapping.

use stroke_writer_core::GlyphTable;
use tracing::debug;

use crate::config::LayoutConfig;

/// Rendered width of `word` at the given scale.
///
/// Each character contributes the advance of its glyph; characters without
/// strokes contribute nothing.
pub fn word_width(table: &GlyphTable, word: &[u8], scale_factor: f32) -> f32 {
    word.iter()
        .map(|&code| table.glyph(code).advance() * scale_factor)
        .sum()
}

/// Position of the pen origin on the page, plus the fixed page geometry.
///
/// The cursor starts at the origin. Lines advance towards negative Y, so
/// `cursor_y` only ever decreases until [LayoutState::reset] is called at the
/// end of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    cursor_x: f32,
    cursor_y: f32,
    scale_factor: f32,
    font_size: f32,
    line_width: f32,
    line_spacing: f32,
    tab_width: u32,
}

impl LayoutState {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            cursor_x: 0.0,
            cursor_y: 0.0,
            scale_factor: config.font_size.scale_factor(),
            font_size: config.font_size.get(),
            line_width: config.line_width,
            line_spacing: config.line_spacing,
            tab_width: config.tab_width,
        }
    }

    pub fn cursor_x(&self) -> f32 {
        self.cursor_x
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn line_height(&self) -> f32 {
        self.font_size + self.line_spacing
    }

    pub fn at_line_start(&self) -> bool {
        self.cursor_x == 0.0
    }

    /// Would a word of this width end within the line width?
    pub fn fits(&self, width: f32) -> bool {
        self.cursor_x + width <= self.line_width
    }

    /// Start a new line if a word of `width` would overflow the current one.
    ///
    /// A word is never wrapped away from the start of a line, so words wider
    /// than the whole line are placed at `x = 0` and allowed to overflow.
    /// Returns whether a line break happened.
    pub fn wrap_for(&mut self, width: f32) -> bool {
        if self.at_line_start() || self.fits(width) {
            return false;
        }

        debug!(
            cursor_x = self.cursor_x,
            width,
            limit = self.line_width,
            "wrapping word onto a new line"
        );
        self.line_break();
        true
    }

    pub fn line_break(&mut self) {
        self.cursor_x = 0.0;
        self.cursor_y -= self.line_height();
    }

    /// Move the cursor right by `dx` output units.
    pub fn advance(&mut self, dx: f32) {
        self.cursor_x += dx.max(0.0);
    }

    pub fn space(&mut self) {
        self.advance(self.font_size);
    }

    pub fn tab(&mut self) {
        self.advance(self.tab_width as f32 * self.font_size);
    }

    /// Return the cursor to the origin for the next document.
    pub fn reset(&mut self) {
        self.cursor_x = 0.0;
        self.cursor_y = 0.0;
    }
}
