//! Drives a document through segmentation, layout and code generation.

use stroke_writer_core::GlyphTable;
use tracing::{debug, info, warn};

use crate::config::{LayoutConfig, PenPower};
use crate::gcode::{CodeGenerator, Command};
use crate::layout::{LayoutState, word_width};
use crate::segment::{Segmenter, Token};
use crate::sink::{CommandSink, SinkError};

/// Totals for one written document.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DocumentStats {
    pub words: usize,
    pub lines: usize,
    pub commands: usize,
}

/// Writes documents in one font and page layout.
///
/// The writer owns the layout cursor; it is only ever moved by the writer
/// itself while a document is being written.
pub struct Writer<'t> {
    table: &'t GlyphTable,
    layout: LayoutState,
    generator: CodeGenerator<'t>,
    max_word_len: usize,
    pending: Vec<Command>,
}

impl<'t> Writer<'t> {
    pub fn new(table: &'t GlyphTable, config: &LayoutConfig, pen_power: PenPower) -> Self {
        Self {
            table,
            layout: LayoutState::new(config),
            generator: CodeGenerator::new(table, pen_power),
            max_word_len: config.max_word_len,
            pending: Vec::new(),
        }
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    /// Write `text` to `sink`, then lift the pen and return to the origin.
    ///
    /// Commands reach the sink one word at a time, so a slow sink (such as a
    /// plotter) starts drawing before the whole document has been laid out.
    /// The cursor is back at the origin afterwards even if the sink failed,
    /// so the writer can be used for another document.
    pub fn write_document<S: CommandSink + ?Sized>(
        &mut self,
        text: impl IntoIterator<Item = u8>,
        sink: &mut S,
    ) -> Result<DocumentStats, SinkError> {
        let result = self.write_tokens(text, sink);
        self.layout.reset();

        match &result {
            Ok(stats) => info!(
                words = stats.words,
                lines = stats.lines,
                commands = stats.commands,
                "document written"
            ),
            Err(err) => {
                warn!(error = %err, "document abandoned");
                self.pending.clear();
                // The pen may have been left down.
                self.generator.forget_pen();
            }
        }
        result
    }

    fn write_tokens<S: CommandSink + ?Sized>(
        &mut self,
        text: impl IntoIterator<Item = u8>,
        sink: &mut S,
    ) -> Result<DocumentStats, SinkError> {
        let mut stats = DocumentStats {
            lines: 1,
            ..DocumentStats::default()
        };

        for token in Segmenter::new(text, self.max_word_len) {
            match token {
                Token::Word(word) => {
                    let width = word_width(self.table, &word, self.layout.scale_factor());
                    if self.layout.wrap_for(width) {
                        stats.lines += 1;
                    }

                    self.generator.word(&word, &mut self.layout, &mut self.pending);
                    stats.words += 1;
                    stats.commands += self.flush(sink)?;
                }
                Token::Space => self.layout.space(),
                Token::Tab => self.layout.tab(),
                Token::Newline => {
                    self.layout.line_break();
                    stats.lines += 1;
                }
            }
        }

        debug!("end of document, parking the pen");
        self.generator.park(&mut self.pending);
        stats.commands += self.flush(sink)?;
        sink.finish()?;
        Ok(stats)
    }

    fn flush<S: CommandSink + ?Sized>(&mut self, sink: &mut S) -> Result<usize, SinkError> {
        let count = self.pending.len();
        for command in self.pending.drain(..) {
            sink.emit(&command)?;
        }
        Ok(count)
    }
}
