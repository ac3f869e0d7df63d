#![no_std]

//! `stroke-writer-core` provides the glyph primitives and the single-stroke
//! font loader used by the `stroke-writer` crate.
//!
//! A font is a set of glyphs, one per ASCII character code, each made of a
//! sequence of [Stroke]s drawn on an 18-unit design grid. Fonts are parsed
//! from their text description with [GlyphTable::parse]:
//!
//! ```
//! use stroke_writer_core::GlyphTable;
//!
//! let table = GlyphTable::parse("999 73 2 0 0 0 0 18 1").unwrap();
//! assert_eq!(table.glyph(b'I').strokes().len(), 2);
//! ```

extern crate alloc;

mod error;
mod parse;

use alloc::vec::Vec;

pub use error::LoadError;

/// Number of character codes covered by a [GlyphTable] (the ASCII range).
pub const GLYPH_COUNT: usize = 128;

/// Size of the em square that font descriptions are drawn on.
pub const DESIGN_UNITS: f32 = 18.0;

/// A single sample point of a glyph, in font design units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    /// X coordinate of this point
    pub x: f32,
    /// Y coordinate of this point
    pub y: f32,
    /// Should a line be drawn (i.e., "pen down") when moving to this point?
    pub pen: bool,
}

/// The strokes which make up a single character.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Glyph {
    strokes: Vec<Stroke>,
}

static EMPTY_GLYPH: Glyph = Glyph::new();

impl Glyph {
    /// A glyph without any strokes.
    pub const fn new() -> Self {
        Self {
            strokes: Vec::new(),
        }
    }

    /// A glyph drawn by visiting `strokes` in order.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// Series of points which make up this glyph
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Does this glyph have no strokes (and so nothing to draw)?
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Horizontal advance of this glyph in design units.
    ///
    /// Font descriptions encode the advance as the X coordinate of the final
    /// stroke, so an empty glyph has no advance.
    pub fn advance(&self) -> f32 {
        self.strokes.last().map_or(0.0, |stroke| stroke.x)
    }

    /// Place this glyph with its origin at `(origin_x, origin_y)`, scaling
    /// every stroke by `scale`.
    pub fn place(
        &self,
        origin_x: f32,
        origin_y: f32,
        scale: f32,
    ) -> impl Iterator<Item = Point> + '_ {
        self.strokes.iter().map(move |stroke| Point {
            x: origin_x + stroke.x * scale,
            y: origin_y + stroke.y * scale,
            pen: stroke.pen,
        })
    }
}

/// A positioned point in output units, produced by [Glyph::place].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point {
    /// X coordinate of this point
    pub x: f32,
    /// Y coordinate of this point
    pub y: f32,
    /// Should a line be drawn (i.e., "pen down") when moving to this point?
    pub pen: bool,
}

/// Lookup from character code to [Glyph].
///
/// Every code in `0..GLYPH_COUNT` has an entry; codes that never appeared in
/// the font description map to an empty glyph. The table is never modified
/// after it has been loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphTable {
    glyphs: [Glyph; GLYPH_COUNT],
}

impl GlyphTable {
    /// A table where every character is empty.
    pub const fn empty() -> Self {
        Self {
            glyphs: [const { Glyph::new() }; GLYPH_COUNT],
        }
    }

    /// Parse a font description into a table.
    ///
    /// See [LoadError] for the ways a description can be rejected. Nothing is
    /// returned on failure, so a partially parsed font is never used.
    pub fn parse(source: &str) -> Result<Self, LoadError> {
        parse::parse_table(source)
    }

    /// Look up the glyph for a character code.
    ///
    /// Codes outside the ASCII range get an empty glyph.
    pub fn glyph(&self, code: u8) -> &Glyph {
        self.glyphs.get(code as usize).unwrap_or(&EMPTY_GLYPH)
    }

    /// Number of characters which have at least one stroke.
    pub fn defined(&self) -> usize {
        self.glyphs.iter().filter(|glyph| !glyph.is_empty()).count()
    }

    pub(crate) fn insert(&mut self, code: usize, glyph: Glyph) {
        self.glyphs[code] = glyph;
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::empty()
    }
}
