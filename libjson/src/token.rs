//! Tokens produced by the scanner.

use std::fmt;

/// Token type in the scanner output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input.
    Eof,
    /// `[`
    StartList,
    /// `]`
    EndList,
    /// `{`
    StartMap,
    /// `}`
    EndMap,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// String literal; the text is already unescaped.
    String,
    /// Number with a fraction or exponent.
    Double,
    /// Number without a fraction or exponent.
    Integer,
    /// `false`
    False,
    /// `true`
    True,
    /// `null`
    Null,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Eof => "end of input",
            TokenKind::StartList => "'['",
            TokenKind::EndList => "']'",
            TokenKind::StartMap => "'{'",
            TokenKind::EndMap => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::String => "string",
            TokenKind::Double => "double",
            TokenKind::Integer => "integer",
            TokenKind::False => "false",
            TokenKind::True => "true",
            TokenKind::Null => "null",
        };
        f.write_str(name)
    }
}

/// A single token.
///
/// Only string and number tokens carry text. Every other token is one of the
/// associated constants, so markers can be compared with `==` directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: Option<String>,
}

impl Token {
    pub const EOF: Token = Token::marker(TokenKind::Eof);
    pub const START_LIST: Token = Token::marker(TokenKind::StartList);
    pub const END_LIST: Token = Token::marker(TokenKind::EndList);
    pub const START_MAP: Token = Token::marker(TokenKind::StartMap);
    pub const END_MAP: Token = Token::marker(TokenKind::EndMap);
    pub const COMMA: Token = Token::marker(TokenKind::Comma);
    pub const COLON: Token = Token::marker(TokenKind::Colon);
    pub const FALSE: Token = Token::marker(TokenKind::False);
    pub const TRUE: Token = Token::marker(TokenKind::True);
    pub const NULL: Token = Token::marker(TokenKind::Null);

    const fn marker(kind: TokenKind) -> Self {
        Self { kind, text: None }
    }

    pub(crate) fn with_text(kind: TokenKind, text: String) -> Self {
        Self {
            kind,
            text: Some(text),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The unescaped string, or the number lexeme exactly as written (with the
    /// exponent marker lower-cased).
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn into_text(self) -> Option<String> {
        self.text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.text) {
            (TokenKind::String, Some(text)) => write!(f, "string {:?}", text),
            (kind, Some(text)) => write!(f, "{} {}", kind, text),
            (kind, None) => write!(f, "{}", kind),
        }
    }
}
