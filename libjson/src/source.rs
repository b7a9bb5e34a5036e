//! Character sources for the scanner.
//!
//! The scanner pulls one Unicode scalar value at a time. In-memory input is
//! walked with `str::chars`; byte readers are decoded as UTF-8 on the fly so
//! that nothing beyond the current character has to be buffered by the
//! scanner itself.

use std::io::{self, BufReader, Bytes, Read};
use std::str::Chars;

/// A forward-only supply of characters.
pub trait CharSource {
    /// Return the next character, or `None` once the input is exhausted.
    ///
    /// Malformed UTF-8 is reported as [`io::ErrorKind::InvalidData`].
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

/// Characters of an in-memory string.
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars(),
        }
    }
}

impl CharSource for StrSource<'_> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Characters decoded from a UTF-8 byte stream.
pub struct ReaderSource<R> {
    bytes: Bytes<BufReader<R>>,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        self.bytes.next().transpose()
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let first = match self.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let width = utf8_width(first);
        if width == 0 {
            return Err(invalid_utf8());
        }

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self.next_byte()?.ok_or_else(invalid_utf8)?;
        }
        let decoded = std::str::from_utf8(&buf[..width]).map_err(|_| invalid_utf8())?;
        Ok(decoded.chars().next())
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, or 0 if `lead` cannot
/// start one.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<S: CharSource>(mut source: S) -> io::Result<String> {
        let mut out = String::new();
        while let Some(ch) = source.next_char()? {
            out.push(ch);
        }
        Ok(out)
    }

    #[test]
    fn test_str_source() {
        assert_eq!(drain(StrSource::new("[1, \"°\"]")).unwrap(), "[1, \"°\"]");
        assert_eq!(drain(StrSource::new("")).unwrap(), "");
    }

    #[test]
    fn test_reader_source_multibyte() {
        let text = "a°→😂z";
        assert_eq!(drain(ReaderSource::new(text.as_bytes())).unwrap(), text);
    }

    #[test]
    fn test_reader_source_invalid_lead_byte() {
        let err = drain(ReaderSource::new(&[b'a', 0xFF, b'b'][..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_reader_source_truncated_sequence() {
        // First two bytes of a three-byte sequence.
        let err = drain(ReaderSource::new(&[0xE2, 0x86][..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_reader_source_bad_continuation() {
        let err = drain(ReaderSource::new(&[0xC3, b'a'][..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_reader_source_encoded_surrogate() {
        // U+D800 encoded directly is not valid UTF-8.
        let err = drain(ReaderSource::new(&[0xED, 0xA0, 0x80][..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
