//! Value Parser
//!
//! Recursive descent over the scanner's tokens, one function per grammar
//! production. Tokens are pulled only when needed; the single token held by
//! each function is the only lookahead.

use num_bigint::BigInt;
use std::collections::HashMap;
use std::io::Read;
use tracing::debug;

use crate::decimal::BigDecimal;
use crate::error::{ParseError, Result};
use crate::options::ParseOptions;
use crate::scanner::Scanner;
use crate::source::{CharSource, ReaderSource, StrSource};
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Parses one JSON document into a [`Value`].
///
/// # Example
///
/// ```
/// use libjson::Parser;
///
/// let value = Parser::new("[{}, {}]").parse().unwrap();
/// assert_eq!(value.as_array().map(Vec::len), Some(2));
/// ```
pub struct Parser<S> {
    scanner: Scanner<S>,
    options: ParseOptions,
    depth: usize,
}

impl<'a> Parser<StrSource<'a>> {
    /// Parser over an in-memory string.
    pub fn new(json: &'a str) -> Self {
        Self::from_source(StrSource::new(json))
    }
}

impl<R: Read> Parser<ReaderSource<R>> {
    /// Parser over UTF-8 bytes from a reader.
    pub fn from_reader(reader: R) -> Self {
        Self::from_source(ReaderSource::new(reader))
    }
}

impl<S: CharSource> Parser<S> {
    pub fn from_source(source: S) -> Self {
        Self {
            scanner: Scanner::new(source),
            options: ParseOptions::default(),
            depth: 0,
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse the single top-level value. Anything but whitespace after it is
    /// an error.
    pub fn parse(mut self) -> Result<Value> {
        debug!(
            filename = ?self.options.filename,
            max_depth = ?self.options.max_depth,
            "parsing JSON document"
        );
        let result = self
            .parse_document()
            .map_err(|e| e.with_filename(self.options.filename.as_deref()));
        match &result {
            Ok(value) => debug!(kind = value.kind(), "parsed JSON document"),
            Err(e) => debug!(error = %e, "JSON document rejected"),
        }
        result
    }

    fn parse_document(&mut self) -> Result<Value> {
        let token = self.next()?;
        let value = self.parse_one_value(token)?;
        let token = self.next()?;
        if token.kind() != TokenKind::Eof {
            return Err(self.unexpected("json value", TokenKind::Eof.to_string(), &token));
        }
        Ok(value)
    }

    fn parse_one_value(&mut self, token: Token) -> Result<Value> {
        match token.kind() {
            TokenKind::Integer | TokenKind::Double => self.number_value(token),
            TokenKind::String => Ok(Value::String(token.into_text().unwrap_or_default())),
            TokenKind::Null => Ok(Value::Null),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::StartList => {
                self.enter()?;
                let items = self.parse_list()?;
                self.depth -= 1;
                Ok(Value::Array(items))
            }
            TokenKind::StartMap => {
                self.enter()?;
                let members = self.parse_map()?;
                self.depth -= 1;
                Ok(Value::Object(members))
            }
            _ => Err(self.unexpected("json value", "a json value", &token)),
        }
    }

    /// Parse list items after the opening `[`.
    fn parse_list(&mut self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut token = self.next()?;
        if token.kind() == TokenKind::EndList {
            return Ok(items);
        }

        loop {
            items.push(self.parse_one_value(token)?);
            token = self.next()?;
            match token.kind() {
                TokenKind::Comma => token = self.next()?,
                TokenKind::EndList => return Ok(items),
                _ => return Err(self.unexpected("list", "',' or ']'", &token)),
            }
        }
    }

    /// Parse map members after the opening `{`.
    fn parse_map(&mut self) -> Result<HashMap<String, Value>> {
        let mut members = HashMap::new();
        let mut token = self.next()?;
        if token.kind() == TokenKind::EndMap {
            return Ok(members);
        }

        loop {
            if token.kind() != TokenKind::String {
                return Err(self.unexpected("map", TokenKind::String.to_string(), &token));
            }
            let key = token.into_text().unwrap_or_default();

            let colon = self.next()?;
            if colon.kind() != TokenKind::Colon {
                return Err(self.unexpected("map", TokenKind::Colon.to_string(), &colon));
            }

            let value_token = self.next()?;
            let value = self.parse_one_value(value_token)?;
            members.insert(key, value);

            token = self.next()?;
            match token.kind() {
                TokenKind::Comma => token = self.next()?,
                TokenKind::EndMap => return Ok(members),
                _ => return Err(self.unexpected("map", "',' or '}'", &token)),
            }
        }
    }

    /// Convert a number lexeme, falling back to arbitrary precision when the
    /// machine type cannot hold it.
    fn number_value(&self, token: Token) -> Result<Value> {
        let kind = token.kind();
        let lexeme = token.into_text().unwrap_or_default();

        if kind == TokenKind::Integer {
            if let Ok(n) = lexeme.parse::<i64>() {
                return Ok(Value::Integer(n));
            }
            return lexeme
                .parse::<BigInt>()
                .map(Value::BigInteger)
                .map_err(|_| self.out_of_range(&lexeme));
        }

        let f: f64 = lexeme.parse().map_err(|_| self.out_of_range(&lexeme))?;
        if !f.is_infinite() {
            return Ok(Value::Float(f));
        }
        lexeme
            .parse::<BigDecimal>()
            .map(Value::BigDecimal)
            .map_err(|_| self.out_of_range(&lexeme))
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        match self.options.max_depth {
            Some(limit) if self.depth > limit => Err(ParseError::TooDeep {
                limit,
                location: self.scanner.token_location(),
            }),
            _ => Ok(()),
        }
    }

    fn next(&mut self) -> Result<Token> {
        self.scanner.next_token()
    }

    /// Build a structural error for `token`, found where `expected` was
    /// required.
    fn unexpected(
        &self,
        element: &'static str,
        expected: impl Into<String>,
        token: &Token,
    ) -> ParseError {
        let location = self.scanner.token_location();
        if token.kind() == TokenKind::Eof {
            ParseError::EndOfInput {
                element,
                expected: expected.into(),
                location,
            }
        } else {
            ParseError::Unexpected {
                element,
                expected: expected.into(),
                found: token.to_string(),
                location,
            }
        }
    }

    fn out_of_range(&self, lexeme: &str) -> ParseError {
        ParseError::NumberOutOfRange {
            lexeme: lexeme.to_string(),
            location: self.scanner.token_location(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Location;

    fn parse(input: &str) -> Result<Value> {
        Parser::new(input).parse()
    }

    fn int(n: i64) -> Value {
        Value::Integer(n)
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse("  \"foobar\"  ").unwrap(), Value::String("foobar".into()));
        assert_eq!(parse("123").unwrap(), int(123));
        assert_eq!(parse("123.456").unwrap(), Value::Float(123.456));
        assert_eq!(parse("true").unwrap(), Value::Bool(true));
        assert_eq!(parse("false").unwrap(), Value::Bool(false));
        assert_eq!(parse("null").unwrap(), Value::Null);
    }

    #[test]
    fn test_integral_floats_stay_floats() {
        assert_eq!(parse("1.0").unwrap(), Value::Float(1.0));
        assert_eq!(parse("1e2").unwrap(), Value::Float(100.0));
        assert_eq!(parse("0e-20").unwrap(), Value::Float(0.0));
        assert_eq!(parse("1").unwrap(), int(1));
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(parse("9223372036854775807").unwrap(), int(i64::MAX));
        assert_eq!(parse("-9223372036854775808").unwrap(), int(i64::MIN));

        let big: BigInt = "9223372036854775807000".parse().unwrap();
        assert_eq!(
            parse("9223372036854775807000").unwrap(),
            Value::BigInteger(big)
        );
        let below: BigInt = "-9223372036854775809".parse().unwrap();
        assert_eq!(
            parse("-9223372036854775809").unwrap(),
            Value::BigInteger(below)
        );
    }

    #[test]
    fn test_float_overflow_becomes_decimal() {
        let expected: BigDecimal = "2.5e308".parse().unwrap();
        assert_eq!(parse("2.5e308").unwrap(), Value::BigDecimal(expected));
        assert!(matches!(parse("-1e400").unwrap(), Value::BigDecimal(_)));
        // Underflow rounds to zero rather than falling back.
        assert_eq!(parse("1e-400").unwrap(), Value::Float(0.0));
    }

    #[test]
    fn test_decimal_exponent_out_of_range() {
        let err = parse("1e99999999999999999999").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Number out of range: 1e99999999999999999999 at 1:1"
        );
    }

    #[test]
    fn test_parse_lists() {
        assert_eq!(parse("[]").unwrap(), Value::Array(vec![]));
        assert_eq!(parse("[123]").unwrap(), Value::Array(vec![int(123)]));
        assert_eq!(
            parse("[123, true]").unwrap(),
            Value::Array(vec![int(123), Value::Bool(true)])
        );
    }

    #[test]
    fn test_parse_maps() {
        assert_eq!(parse("{}").unwrap(), Value::Object(HashMap::new()));

        let value = parse("{\"foo\": 123, \"bar\": \"Hello World\"}").unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj.get("foo"), Some(&int(123)));
        assert_eq!(obj.get("bar"), Some(&Value::String("Hello World".into())));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let value = parse("{\"a\": 1, \"b\": 2, \"a\": 3}").unwrap();
        assert_eq!(value.as_object().unwrap().len(), 2);
        assert_eq!(value.get("a"), Some(&int(3)));
    }

    #[test]
    fn test_parse_nested() {
        let value = parse("[{},{}]").unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert!(arr.iter().all(|v| v.as_object().map(HashMap::is_empty) == Some(true)));

        let value = parse("{\"zero\": [], \"one\": [1], \"two\": [1, 2]}").unwrap();
        assert_eq!(value.get("zero").and_then(Value::as_array).map(Vec::len), Some(0));
        assert_eq!(value.get("one").and_then(Value::as_array).map(Vec::len), Some(1));
        assert_eq!(value.get("two").and_then(Value::as_array).map(Vec::len), Some(2));

        let value = parse(
            "[{\"foo\": 123, \"bar\": \"Hello World\", \"baz\": false}, {\"foo\": 456, \"baz\": null}]",
        )
        .unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr[0].get("baz"), Some(&Value::Bool(false)));
        assert_eq!(arr[1].get("foo"), Some(&int(456)));
        assert_eq!(arr[1].get("baz"), Some(&Value::Null));
    }

    #[test]
    fn test_malformed_inputs_fail() {
        for input in [
            ",", "123 456", "[123 456]", "[123", "\"foo", "0.", ".32", "123e", "[123, :]", "[1,]",
            "{\"a\": 1,}", "{\"a\" 1}", "{1: 2}", "{\"a\": }", "", "   ", "[", "{", "]",
        ] {
            assert!(parse(input).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            parse("[123 456]").unwrap_err().to_string(),
            "Error while parsing 'list', expecting ',' or ']', got integer 456 at 1:6"
        );
        assert_eq!(
            parse("[123").unwrap_err().to_string(),
            "End of file found while parsing 'list', expecting ',' or ']' at 1:5"
        );
        assert_eq!(
            parse("123 456").unwrap_err().to_string(),
            "Error while parsing 'json value', expecting end of input, got integer 456 at 1:5"
        );
        assert_eq!(
            parse(",").unwrap_err().to_string(),
            "Error while parsing 'json value', expecting a json value, got ',' at 1:1"
        );
        assert_eq!(
            parse("{\"a\": 1 \"b\": 2}").unwrap_err().to_string(),
            "Error while parsing 'map', expecting ',' or '}', got string \"b\" at 1:9"
        );
        assert_eq!(
            parse("{\"a\" 1}").unwrap_err().to_string(),
            "Error while parsing 'map', expecting ':', got integer 1 at 1:6"
        );
        assert_eq!(
            parse("{true: 1}").unwrap_err().to_string(),
            "Error while parsing 'map', expecting string, got true at 1:2"
        );
        assert_eq!(
            parse("").unwrap_err().to_string(),
            "End of file found while parsing 'json value', expecting a json value at 1:1"
        );
    }

    #[test]
    fn test_error_location_on_later_line() {
        let err = parse("{\n  \"a\": [1,\n  2,,]\n}").unwrap_err();
        assert_eq!(err.location(), Some(&Location::new(3, 5)));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            parse("\"\\r\\n\\b\\f\\t\\\"\\\\\\/\"").unwrap(),
            Value::String("\r\n\u{08}\u{0C}\t\"\\/".into())
        );
        assert_eq!(parse("\"\\u00b0\"").unwrap(), Value::String("°".into()));
    }

    #[test]
    fn test_unpaired_surrogate_is_replaced() {
        assert_eq!(parse("\"\\uD800\"").unwrap(), Value::String("\u{FFFD}".into()));
        assert_eq!(
            parse("[\"a\\uDC00b\", \"\\uD83D\\uDE02\"]").unwrap(),
            Value::Array(vec![Value::String("a\u{FFFD}b".into()), Value::String("😂".into())])
        );
    }

    #[test]
    fn test_depth_limit() {
        let options = ParseOptions::new().with_max_depth(Some(3));
        let ok = Parser::new("[[[1]]]").with_options(options.clone()).parse();
        assert!(ok.is_ok());

        let err = Parser::new("[[[[1]]]]").with_options(options).parse().unwrap_err();
        assert_eq!(err.to_string(), "Nesting depth exceeds limit of 3 at 1:4");

        // Siblings do not accumulate depth.
        let options = ParseOptions::new().with_max_depth(Some(1));
        assert!(Parser::new("[[], []]").with_options(options.clone()).parse().is_err());
        assert!(Parser::new("{\"a\": 1}").with_options(options).parse().is_ok());
    }

    #[test]
    fn test_default_depth_limit() {
        let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
        assert!(matches!(
            parse(&deep),
            Err(ParseError::TooDeep { limit: 128, .. })
        ));
        let unbounded = ParseOptions::new().with_max_depth(None);
        assert!(Parser::new(&deep).with_options(unbounded).parse().is_ok());
    }

    #[test]
    fn test_filename_in_errors() {
        let options = ParseOptions::new().with_filename("config.json");
        let err = Parser::new("[1, 2").with_options(options).parse().unwrap_err();
        assert_eq!(
            err.to_string(),
            "End of file found while parsing 'list', expecting ',' or ']' at 1:6 of <config.json>"
        );
    }

    #[test]
    fn test_from_reader() {
        let input = "{\"temp\": \"32\\u00b0F → 0°C\", \"n\": [1, 2.5]}";
        let from_reader = Parser::from_reader(input.as_bytes()).parse().unwrap();
        assert_eq!(from_reader, parse(input).unwrap());
        assert_eq!(
            from_reader.get("temp").and_then(Value::as_str),
            Some("32°F → 0°C")
        );
    }
}
