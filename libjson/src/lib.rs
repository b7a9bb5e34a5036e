//! JSON (RFC 7159) parser implementation.
//!
//! Parses a single JSON document into an in-memory [`Value`] tree. Integers
//! that overflow `i64` are kept as big integers, and floats that overflow
//! `f64` are kept as big decimals, so no valid number is rejected or
//! silently rounded to infinity.
//!
//! # Parsing Pipeline
//!
//! 1. **Source**: Yields characters from a string or a UTF-8 byte reader.
//!
//! 2. **Scanner**: Converts characters into tokens on demand, with one
//!    character of pushback. Owns all lexical rules.
//!
//! 3. **Parser**: Pulls tokens as needed and builds values by recursive
//!    descent. Owns all structural rules.
//!
//! Every error names the construct being parsed, what was expected, what was
//! found, and the line and column where it happened.

mod decimal;
mod error;
mod options;
mod parser;
mod scanner;
mod source;
mod token;
mod value;

use std::io::Read;

pub use decimal::{BigDecimal, ParseDecimalError};
pub use error::{Location, ParseError, Result};
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};
pub use parser::Parser;
pub use scanner::Scanner;
pub use source::{CharSource, ReaderSource, StrSource};
pub use token::{Token, TokenKind};
pub use value::Value;

/// Parse a JSON document from a string.
///
/// # Example
///
/// ```
/// use libjson::{parse, Value};
///
/// let value = parse("{\"foo\": 123}").unwrap();
/// assert_eq!(value.get("foo"), Some(&Value::Integer(123)));
/// ```
pub fn parse(input: &str) -> Result<Value> {
    Parser::new(input).parse()
}

/// Parse a JSON document from a string with explicit options.
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Value> {
    Parser::new(input).with_options(options).parse()
}

/// Parse a JSON document from a UTF-8 byte reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<Value> {
    Parser::from_reader(reader).parse()
}
