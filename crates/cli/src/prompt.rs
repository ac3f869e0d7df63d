//! Interactive font size prompt.

use std::io::{self, BufRead, Write};

use stroke_writer::FontSize;
use tracing::debug;

/// Ask for a font size until a valid one is entered.
///
/// Fails with [io::ErrorKind::UnexpectedEof] if the input closes first.
pub fn font_size<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<FontSize> {
    let mut line = String::new();

    loop {
        writeln!(output, "Enter a font size between 4 and 10:")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no font size entered",
            ));
        }

        match line.parse::<FontSize>() {
            Ok(size) => {
                writeln!(output, "Selected font size: {}", size.get())?;
                return Ok(size);
            }
            Err(err) => {
                debug!(input = line.trim(), error = %err, "rejected font size");
                writeln!(output, "This is an invalid font size ({err})")?;
            }
        }
    }
}
