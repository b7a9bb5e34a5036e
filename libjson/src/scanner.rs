//! Scanner
//!
//! The scanner turns characters into tokens on demand. It performs:
//! - Whitespace skipping (space, tab, CR, LF)
//! - String unescaping, including `\u` escapes and surrogate pairs
//! - Number lexing (the lexeme is kept as text for the parser to convert)
//! - Literal matching for `true`, `false`, and `null`
//!
//! One character of pushback is kept between calls; nothing else is
//! buffered.

use std::io;

use tracing::trace;

use crate::error::{describe_char, Location, ParseError, Result};
use crate::source::CharSource;
use crate::token::{Token, TokenKind};

/// A 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: usize,
    column: usize,
}

impl Position {
    const START: Position = Position { line: 1, column: 1 };

    fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Position {
                line: self.line + 1,
                column: 1,
            }
        } else {
            Position {
                line: self.line,
                column: self.column + 1,
            }
        }
    }

    fn location(self) -> Location {
        Location::new(self.line, self.column)
    }
}

/// Result of decoding one escape sequence.
enum Escape {
    Char(char),
    /// A UTF-16 code unit from `\uXXXX`.
    Unit(u16),
}

/// Pull-based JSON tokenizer.
pub struct Scanner<S> {
    source: S,
    /// A character (or end of input) that was read and given back, with the
    /// position it was read at.
    pushback: Option<(Option<char>, Position)>,
    /// Position of the next character the source will produce.
    next_pos: Position,
    /// Position of the character most recently returned by `read`.
    last_pos: Position,
    /// Position of the first character of the most recent token.
    token_pos: Position,
}

impl<S: CharSource> Scanner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pushback: None,
            next_pos: Position::START,
            last_pos: Position::START,
            token_pos: Position::START,
        }
    }

    /// Where the most recently returned token started.
    pub fn token_location(&self) -> Location {
        self.token_pos.location()
    }

    /// Scan the next token. Returns [`Token::EOF`] once the input is
    /// exhausted, and keeps returning it on further calls.
    pub fn next_token(&mut self) -> Result<Token> {
        let ch = self.skip_whitespace()?;
        self.token_pos = self.last_pos;

        let token = match ch {
            None => Token::EOF,
            Some('[') => Token::START_LIST,
            Some(']') => Token::END_LIST,
            Some('{') => Token::START_MAP,
            Some('}') => Token::END_MAP,
            Some(',') => Token::COMMA,
            Some(':') => Token::COLON,
            Some('"') => self.read_string()?,
            Some(c @ ('-' | '0'..='9')) => self.read_number(c)?,
            Some('f') => {
                self.consume_literal("false literal", "alse")?;
                Token::FALSE
            }
            Some('t') => {
                self.consume_literal("true literal", "rue")?;
                Token::TRUE
            }
            Some('n') => {
                self.consume_literal("null literal", "ull")?;
                Token::NULL
            }
            Some(c) => {
                return Err(self.error(
                    "JSON",
                    "a valid JSON value start character",
                    Some(c),
                ))
            }
        };

        trace!(
            kind = %token.kind(),
            line = self.token_pos.line,
            column = self.token_pos.column,
            "token"
        );
        Ok(token)
    }

    fn skip_whitespace(&mut self) -> Result<Option<char>> {
        loop {
            match self.read()? {
                Some(' ' | '\t' | '\r' | '\n') => continue,
                other => return Ok(other),
            }
        }
    }

    /// Read the body of a string; the opening quote is already consumed.
    fn read_string(&mut self) -> Result<Token> {
        let mut text = String::new();
        // Consecutive `\u` escapes, decoded together so surrogate pairs combine.
        let mut units: Vec<u16> = Vec::new();

        loop {
            match self.read()? {
                None => return Err(self.error("string", "'\"'", None)),
                Some('"') => break,
                Some('\\') => match self.read_escape()? {
                    Escape::Unit(unit) => units.push(unit),
                    Escape::Char(c) => {
                        flush_units(&mut text, &mut units);
                        text.push(c);
                    }
                },
                Some(c) if c <= '\u{1F}' => {
                    return Err(self.error("string", "non-control character", Some(c)))
                }
                Some(c) => {
                    flush_units(&mut text, &mut units);
                    text.push(c);
                }
            }
        }

        flush_units(&mut text, &mut units);
        Ok(Token::with_text(TokenKind::String, text))
    }

    fn read_escape(&mut self) -> Result<Escape> {
        let escaped = match self.read()? {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{08}',
            Some('f') => '\u{0C}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => return self.read_unicode_escape().map(Escape::Unit),
            other => {
                return Err(self.error(
                    "string escape",
                    "one of \"\\/bfnrt or a unicode escape",
                    other,
                ))
            }
        };
        Ok(Escape::Char(escaped))
    }

    fn read_unicode_escape(&mut self) -> Result<u16> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let ch = self.read()?;
            let digit = ch
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("Unicode escape", "0-9, a-f or A-F", ch))?;
            unit = (unit << 4) | digit as u16;
        }
        Ok(unit)
    }

    /// Read a number whose first character (`-` or a digit) is already
    /// consumed.
    fn read_number(&mut self, first: char) -> Result<Token> {
        let mut lexeme = String::new();
        let mut lead = first;

        if first == '-' {
            lexeme.push('-');
            match self.read()? {
                Some(c) if c.is_ascii_digit() => lead = c,
                other => return Err(self.error("number", "[0-9]", other)),
            }
        }
        lexeme.push(lead);

        if lead == '0' {
            let next = self.read()?;
            if let Some(c) = next.filter(char::is_ascii_digit) {
                return Err(self.error(
                    "number",
                    "'.', 'e' or end of number after leading zero",
                    Some(c),
                ));
            }
            self.unread(next);
        } else {
            self.consume_digits(&mut lexeme)?;
        }

        let mut floating = false;
        if self.matches('.')? {
            floating = true;
            lexeme.push('.');
            if !self.consume_digits(&mut lexeme)? {
                let ch = self.read()?;
                return Err(self.error("number", "[0-9] after dot", ch));
            }
        }
        if self.consume_exponent(&mut lexeme)? {
            floating = true;
        }

        let kind = if floating {
            TokenKind::Double
        } else {
            TokenKind::Integer
        };
        Ok(Token::with_text(kind, lexeme))
    }

    fn consume_exponent(&mut self, lexeme: &mut String) -> Result<bool> {
        if !self.matches('e')? && !self.matches('E')? {
            return Ok(false);
        }
        lexeme.push('e');
        if self.matches('-')? {
            lexeme.push('-');
        } else if self.matches('+')? {
            lexeme.push('+');
        }
        if !self.consume_digits(lexeme)? {
            let ch = self.read()?;
            return Err(self.error("number", "[0-9] after exponent start", ch));
        }
        Ok(true)
    }

    /// Append a run of digits; returns whether there was at least one.
    fn consume_digits(&mut self, lexeme: &mut String) -> Result<bool> {
        let mut any = false;
        loop {
            match self.read()? {
                Some(c) if c.is_ascii_digit() => {
                    lexeme.push(c);
                    any = true;
                }
                other => {
                    self.unread(other);
                    return Ok(any);
                }
            }
        }
    }

    fn consume_literal(&mut self, element: &'static str, rest: &str) -> Result<()> {
        for expected in rest.chars() {
            let ch = self.read()?;
            if ch != Some(expected) {
                return Err(self.error(element, describe_char(expected), ch));
            }
        }
        Ok(())
    }

    /// Consume the next character if it is `expected`.
    fn matches(&mut self, expected: char) -> Result<bool> {
        let ch = self.read()?;
        if ch == Some(expected) {
            return Ok(true);
        }
        self.unread(ch);
        Ok(false)
    }

    fn unread(&mut self, ch: Option<char>) {
        self.pushback = Some((ch, self.last_pos));
    }

    fn read(&mut self) -> Result<Option<char>> {
        if let Some((ch, pos)) = self.pushback.take() {
            self.last_pos = pos;
            return Ok(ch);
        }

        let ch = self
            .source
            .next_char()
            .map_err(|e| self.source_error(e))?;
        self.last_pos = self.next_pos;
        if let Some(c) = ch {
            self.next_pos = self.next_pos.advance(c);
        }
        Ok(ch)
    }

    fn source_error(&self, err: io::Error) -> ParseError {
        if err.kind() == io::ErrorKind::InvalidData {
            ParseError::InvalidUtf8 {
                location: self.next_pos.location(),
            }
        } else {
            ParseError::Io(err)
        }
    }

    /// Build a lexical error at the most recently read character.
    fn error(
        &self,
        element: &'static str,
        expected: impl Into<String>,
        found: Option<char>,
    ) -> ParseError {
        let location = self.last_pos.location();
        match found {
            Some(c) => ParseError::Unexpected {
                element,
                expected: expected.into(),
                found: describe_char(c),
                location,
            },
            None => ParseError::EndOfInput {
                element,
                expected: expected.into(),
                location,
            },
        }
    }
}

/// Decode pending UTF-16 units into `text`. Unpaired surrogates cannot live in
/// a Rust string and become U+FFFD, so `\uD800` is accepted but not
/// preserved.
fn flush_units(text: &mut String, units: &mut Vec<u16>) {
    if units.is_empty() {
        return;
    }
    text.extend(
        char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}
