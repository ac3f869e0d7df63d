//! Parser for the single-stroke font description format.
//!
//! A description is a flat list of whitespace separated numbers. Each glyph
//! record is `999 <code> <count>` followed by `count` triples of
//! `<x> <y> <pen>`, where `pen` is 0 to travel and 1 to draw.

use alloc::string::ToString;
use alloc::vec::Vec;
use core::str::{FromStr, SplitAsciiWhitespace};

use crate::{GLYPH_COUNT, Glyph, GlyphTable, LoadError, Stroke};

const RECORD_MARKER: i64 = 999;

/// Tokens of a description along with the 1-based index of the last one read.
struct Fields<'a> {
    tokens: SplitAsciiWhitespace<'a>,
    position: usize,
}

impl<'a> Fields<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            tokens: source.split_ascii_whitespace(),
            position: 0,
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.tokens.next()?;
        self.position += 1;
        Some(token)
    }

    /// Read a required field, failing if the description has ended.
    fn field<T: FromStr>(&mut self, expected: &'static str) -> Result<T, LoadError> {
        let token = self.next_token().ok_or(LoadError::Truncated {
            expected,
            position: self.position + 1,
        })?;

        token.parse().map_err(|_| LoadError::InvalidNumber {
            expected,
            found: token.to_string(),
            position: self.position,
        })
    }
}

pub(crate) fn parse_table(source: &str) -> Result<GlyphTable, LoadError> {
    let mut table = GlyphTable::empty();
    let mut fields = Fields::new(source);

    while let Some(marker) = fields.next_token() {
        if marker.parse::<i64>() != Ok(RECORD_MARKER) {
            return Err(LoadError::UnexpectedMarker {
                found: marker.to_string(),
                position: fields.position,
            });
        }

        let (code, glyph) = parse_record(&mut fields)?;
        table.insert(code, glyph);
    }

    Ok(table)
}

/// Parse the remainder of a record once its marker has been consumed.
fn parse_record(fields: &mut Fields<'_>) -> Result<(usize, Glyph), LoadError> {
    let code: i64 = fields.field("character code")?;
    let code_position = fields.position;
    let count: usize = fields.field("stroke count")?;

    let code = usize::try_from(code)
        .ok()
        .filter(|&code| code < GLYPH_COUNT)
        .ok_or(LoadError::OutOfRange {
            code,
            position: code_position,
        })?;

    // The count comes from the file, so don't trust it for the allocation.
    let mut strokes = Vec::with_capacity(count.min(64));

    for _ in 0..count {
        let x: f32 = fields.field("x coordinate")?;
        let y: f32 = fields.field("y coordinate")?;
        let pen = match fields.field::<i64>("pen flag")? {
            0 => false,
            1 => true,
            found => {
                return Err(LoadError::InvalidPen {
                    found,
                    position: fields.position,
                });
            }
        };

        strokes.push(Stroke { x, y, pen });
    }

    Ok((code, Glyph::from_strokes(strokes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    const FONT: &str = "
        999 65 3
        0 0 0
        9 18 1
        18 0 1
        999 45 2
        2 9 0
        16 9 1
        999 32 0
    ";

    #[test]
    fn parses_records() {
        let table = parse_table(FONT).unwrap();

        let a = table.glyph(b'A');
        assert_eq!(a.strokes().len(), 3);
        assert_eq!(
            a.strokes()[1],
            Stroke {
                x: 9.0,
                y: 18.0,
                pen: true
            }
        );
        assert_eq!(a.advance(), 18.0);

        assert_eq!(table.glyph(b'-').strokes().len(), 2);
        assert!(table.glyph(b' ').is_empty());
        assert!(table.glyph(b'B').is_empty());
        assert_eq!(table.defined(), 2);
    }

    #[test]
    fn loading_twice_is_identical() {
        assert_eq!(parse_table(FONT).unwrap(), parse_table(FONT).unwrap());
    }

    #[test]
    fn later_record_replaces_earlier() {
        let table = parse_table("999 66 1 4 0 0 999 66 2 0 0 0 12 0 1").unwrap();
        assert_eq!(table.glyph(b'B').strokes().len(), 2);
        assert_eq!(table.glyph(b'B').advance(), 12.0);
    }

    #[test]
    fn accepts_fractional_coordinates() {
        let table = parse_table("999 46 2 1.5 0.25 0 2.5 0.25 1").unwrap();
        assert_eq!(table.glyph(b'.').advance(), 2.5);
    }

    #[test]
    fn empty_description_is_an_empty_table() {
        assert_eq!(parse_table("  \n").unwrap(), GlyphTable::empty());
    }

    #[test]
    fn rejects_truncated_strokes() {
        let err = parse_table("999 65 2 0 0 0 18").unwrap_err();
        assert_eq!(
            err,
            LoadError::Truncated {
                expected: "y coordinate",
                position: 8
            }
        );
    }

    #[test]
    fn rejects_truncated_header() {
        let err = parse_table("999 65").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Truncated {
                expected: "stroke count",
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_codes() {
        assert_eq!(
            parse_table("999 200 0").unwrap_err(),
            LoadError::OutOfRange {
                code: 200,
                position: 2
            }
        );
        assert!(matches!(
            parse_table("999 -1 0").unwrap_err(),
            LoadError::OutOfRange { code: -1, .. }
        ));
    }

    #[test]
    fn rejects_unexpected_marker() {
        let err = parse_table("999 32 0 998 65 0").unwrap_err();
        assert_eq!(
            err,
            LoadError::UnexpectedMarker {
                found: String::from("998"),
                position: 4
            }
        );
    }

    #[test]
    fn rejects_extra_fields_after_record() {
        // One stroke declared but two supplied: the spare triple lands where a
        // marker should be.
        let err = parse_table("999 65 1 0 0 0 18 0 1").unwrap_err();
        assert!(matches!(err, LoadError::UnexpectedMarker { position: 7, .. }));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = parse_table("999 A 0").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidNumber {
                expected: "character code",
                ..
            }
        ));

        let err = parse_table("999 65 -2").unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidNumber {
                expected: "stroke count",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_pen_flags() {
        assert_eq!(
            parse_table("999 65 1 0 0 2").unwrap_err(),
            LoadError::InvalidPen {
                found: 2,
                position: 6
            }
        );
    }
}
