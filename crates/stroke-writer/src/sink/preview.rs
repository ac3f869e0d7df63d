use std::io::Write;

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Path, Rectangle};

use super::{CommandSink, SinkError};
use crate::gcode::Command;

/// Renders the pen path into an SVG document instead of driving a plotter.
///
/// Lines are drawn wherever the pen moves while lowered. Plotter Y points up,
/// so it is flipped to keep the text upright in the image.
pub struct SvgSink<W: Write> {
    out: W,
    margin: f32,
    position: (f32, f32),
    pen_down: bool,
    /// Polylines traced with the pen down, in plotter coordinates.
    strokes: Vec<Vec<(f32, f32)>>,
}

impl<W: Write> SvgSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            margin: 10.0,
            position: (0.0, 0.0),
            pen_down: false,
            strokes: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn move_to(&mut self, x: f32, y: f32) {
        if self.pen_down {
            match self.strokes.last_mut() {
                Some(stroke) if stroke.last() == Some(&self.position) => stroke.push((x, y)),
                _ => self.strokes.push(vec![self.position, (x, y)]),
            }
        }
        self.position = (x, y);
    }

    fn document(&self) -> Document {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        for &(x, y) in self.strokes.iter().flatten() {
            min_x = min_x.min(x);
            min_y = min_y.min(-y);
            max_x = max_x.max(x);
            max_y = max_y.max(-y);
        }

        if self.strokes.is_empty() {
            (min_x, min_y, max_x, max_y) = (0.0, 0.0, 0.0, 0.0);
        }

        let left = min_x - self.margin;
        let top = min_y - self.margin;
        let width = max_x - min_x + 2.0 * self.margin;
        let height = max_y - min_y + 2.0 * self.margin;

        let mut data = Data::new();
        for stroke in &self.strokes {
            let mut points = stroke.iter().map(|&(x, y)| (x, -y));
            if let Some(start) = points.next() {
                data = data.move_to(start);
            }
            for point in points {
                data = data.line_to(point);
            }
        }

        let background = Rectangle::new()
            .set("x", left)
            .set("y", top)
            .set("width", width)
            .set("height", height)
            .set("fill", "white");

        let path = Path::new()
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 0.5_f32)
            .set("stroke-linecap", "round")
            .set("d", data);

        let document = Document::new()
            .set("viewBox", (left, top, width, height))
            .set("width", format!("{width}mm"))
            .set("height", format!("{height}mm"))
            .add(background);

        if self.strokes.is_empty() {
            document
        } else {
            document.add(path)
        }
    }
}

impl<W: Write> CommandSink for SvgSink<W> {
    fn emit(&mut self, command: &Command) -> Result<(), SinkError> {
        match *command {
            Command::PenUp => self.pen_down = false,
            Command::PenDown(_) => self.pen_down = true,
            Command::Travel { x, y } | Command::Draw { x, y } => self.move_to(x, y),
            Command::Home { .. } => self.move_to(0.0, 0.0),
            Command::SpindleOn => {}
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        let document = self.document();
        svg::write(&mut self.out, &document)?;
        self.out.flush()?;
        Ok(())
    }
}
