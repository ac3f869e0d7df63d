//! Turning placed glyphs into G-code commands.

use std::fmt;

use stroke_writer_core::{GlyphTable, Point};
use tracing::trace;

use crate::config::PenPower;
use crate::layout::LayoutState;

/// Spindle power which lowers the pen.
pub const DEFAULT_PEN_POWER: u16 = 1000;

/// A single line of G-code understood by the plotter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command {
    /// `S0`: lift the pen.
    PenUp,
    /// `S<power>`: lower the pen.
    PenDown(u16),
    /// `G0`: move without drawing.
    Travel { x: f32, y: f32 },
    /// `G1`: draw a line to the given point.
    Draw { x: f32, y: f32 },
    /// `G1 X0 Y0 F<feed>`: move to the origin and set the feed rate.
    Home { feed: u32 },
    /// `M3`: enable the spindle output that drives the pen.
    SpindleOn,
}

impl Command {
    fn from_point(point: Point) -> Self {
        // Adding zero turns -0.0 into 0.0 so it never prints as "-0.00".
        let (x, y) = (point.x + 0.0, point.y + 0.0);
        if point.pen {
            Self::Draw { x, y }
        } else {
            Self::Travel { x, y }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PenUp => f.write_str("S0"),
            Self::PenDown(power) => write!(f, "S{power}"),
            Self::Travel { x, y } => write!(f, "G0 X{x:.2} Y{y:.2}"),
            Self::Draw { x, y } => write!(f, "G1 X{x:.2} Y{y:.2}"),
            Self::Home { feed } => write!(f, "G1 X0 Y0 F{feed}"),
            Self::SpindleOn => f.write_str("M3"),
        }
    }
}

/// Emits the commands which trace words of text.
///
/// The generator remembers which pen state was last signalled so that
/// `S` commands are only sent when the pen actually has to move.
#[derive(Debug)]
pub struct CodeGenerator<'t> {
    table: &'t GlyphTable,
    pen_power: PenPower,
    pen_down: Option<bool>,
}

impl<'t> CodeGenerator<'t> {
    pub fn new(table: &'t GlyphTable, pen_power: PenPower) -> Self {
        Self {
            table,
            pen_power,
            pen_down: None,
        }
    }

    /// Trace `word` starting at the layout cursor, advancing the cursor past
    /// each glyph as it is drawn.
    pub fn word(&mut self, word: &[u8], layout: &mut LayoutState, out: &mut Vec<Command>) {
        let scale = layout.scale_factor();

        for &code in word {
            let glyph = self.table.glyph(code);
            if glyph.is_empty() {
                trace!(code, "no strokes for character, skipping");
                continue;
            }

            for point in glyph.place(layout.cursor_x(), layout.cursor_y(), scale) {
                self.set_pen(point.pen, out);
                out.push(Command::from_point(point));
            }

            layout.advance(glyph.advance() * scale);
        }
    }

    /// Lift the pen and return to the origin.
    pub fn park(&mut self, out: &mut Vec<Command>) {
        self.set_pen(false, out);
        out.push(Command::Travel { x: 0.0, y: 0.0 });
    }

    /// Treat the pen state as unknown, so the next stroke signals it again.
    pub fn forget_pen(&mut self) {
        self.pen_down = None;
    }

    fn set_pen(&mut self, down: bool, out: &mut Vec<Command>) {
        if self.pen_down == Some(down) {
            return;
        }

        self.pen_down = Some(down);
        out.push(if down {
            Command::PenDown(self.pen_power.get())
        } else {
            Command::PenUp
        });
    }
}
