//! Error types for JSON parsing.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type for JSON parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Where an error was detected.
///
/// Lines and columns are 1-based and count Unicode scalar values. The
/// filename is only present when the caller supplied one through
/// [`ParseOptions`](crate::ParseOptions).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub filename: Option<String>,
}

impl Location {
    /// Create a location without a filename.
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            filename: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) => write!(f, "at {}:{} of <{}>", self.line, self.column, name),
            None => write!(f, "at {}:{}", self.line, self.column),
        }
    }
}

/// Error type for JSON parsing.
///
/// Lexical and structural failures share the `Unexpected` and `EndOfInput`
/// variants: both name the grammar element being parsed and what was
/// expected there.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A concrete character or token that does not fit the grammar.
    #[error("Error while parsing '{element}', expecting {expected}, got {found} {location}")]
    Unexpected {
        element: &'static str,
        expected: String,
        found: String,
        location: Location,
    },

    /// The input ended in the middle of a construct.
    #[error("End of file found while parsing '{element}', expecting {expected} {location}")]
    EndOfInput {
        element: &'static str,
        expected: String,
        location: Location,
    },

    /// Arrays and objects nested deeper than the configured limit.
    #[error("Nesting depth exceeds limit of {limit} {location}")]
    TooDeep { limit: usize, location: Location },

    /// A decimal whose exponent cannot be represented.
    #[error("Number out of range: {lexeme} {location}")]
    NumberOutOfRange { lexeme: String, location: Location },

    /// The byte source did not contain valid UTF-8.
    #[error("Invalid UTF-8 in input {location}")]
    InvalidUtf8 { location: Location },

    /// Reading from the underlying source failed.
    #[error("I/O error while reading input: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// The position the error was detected at, if it has one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            ParseError::Unexpected { location, .. }
            | ParseError::EndOfInput { location, .. }
            | ParseError::TooDeep { location, .. }
            | ParseError::NumberOutOfRange { location, .. }
            | ParseError::InvalidUtf8 { location } => Some(location),
            ParseError::Io(_) => None,
        }
    }

    /// Attach the input's name to the error location.
    pub fn with_filename(mut self, filename: Option<&str>) -> Self {
        if let Some(location) = self.location_mut() {
            location.filename = filename.map(String::from);
        }
        self
    }

    fn location_mut(&mut self) -> Option<&mut Location> {
        match self {
            ParseError::Unexpected { location, .. }
            | ParseError::EndOfInput { location, .. }
            | ParseError::TooDeep { location, .. }
            | ParseError::NumberOutOfRange { location, .. }
            | ParseError::InvalidUtf8 { location } => Some(location),
            ParseError::Io(_) => None,
        }
    }
}

/// Render a character for an error message, escaping control characters.
/// A double quote needs no escape inside the single quotes.
pub(crate) fn describe_char(ch: char) -> String {
    match ch {
        '"' => "'\"'".to_string(),
        c => format!("'{}'", c.escape_debug()),
    }
}
