//! Splitting input text into words and whitespace.

use std::iter::Peekable;

/// A unit of input text, as seen by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(Vec<u8>),
    Space,
    Tab,
    Newline,
}

/// Lazily splits a stream of bytes into [Token]s.
///
/// Words are delimited by space, tab, `\n` and `\r`; a `\r\n` pair is a
/// single newline. Bytes past `max_word_len` in one word are dropped.
pub struct Segmenter<I: Iterator<Item = u8>> {
    bytes: Peekable<I>,
    max_word_len: usize,
    word: Vec<u8>,
    pending: Option<Token>,
}

impl<I: Iterator<Item = u8>> Segmenter<I> {
    pub fn new(bytes: impl IntoIterator<IntoIter = I>, max_word_len: usize) -> Self {
        Self {
            bytes: bytes.into_iter().peekable(),
            max_word_len,
            word: Vec::new(),
            pending: None,
        }
    }

    fn delimiter(&mut self, byte: u8) -> Option<Token> {
        match byte {
            b' ' => Some(Token::Space),
            b'\t' => Some(Token::Tab),
            b'\n' => Some(Token::Newline),
            b'\r' => {
                self.bytes.next_if_eq(&b'\n');
                Some(Token::Newline)
            }
            _ => None,
        }
    }

    fn take_word(&mut self) -> Option<Token> {
        if self.word.is_empty() {
            None
        } else {
            Some(Token::Word(std::mem::take(&mut self.word)))
        }
    }
}

impl<I: Iterator<Item = u8>> Iterator for Segmenter<I> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        while let Some(byte) = self.bytes.next() {
            match self.delimiter(byte) {
                Some(delimiter) => match self.take_word() {
                    Some(word) => {
                        self.pending = Some(delimiter);
                        return Some(word);
                    }
                    None => return Some(delimiter),
                },
                None => {
                    if self.word.len() < self.max_word_len {
                        self.word.push(byte);
                    }
                }
            }
        }

        self.take_word()
    }
}
