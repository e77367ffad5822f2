//! Token definitions produced by the scanner.

use std::fmt;

/// Token kinds produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input. Always the last token of a scan.
    Eof,
    /// Whitespace run. Scanned but never emitted.
    Whitespace,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// Double-quoted string (`"..."`).
    String,
    /// Backtick-quoted interpolated string (`` `...` ``).
    FString,
    /// Integer literal.
    Integer,
    /// Float literal (has a fraction or an exponent).
    Float,
    /// Bare identifier referencing a terminal generator.
    Ident,
    /// Slash-delimited regex literal (`/.../`).
    Regex,
    /// `null`
    Null,
    /// `true`
    True,
    /// `false`
    False,
}

impl TokenKind {
    /// Map an identifier lexeme to its keyword kind, if it is one.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "null" => Some(TokenKind::Null),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "<EOF>",
            TokenKind::Whitespace => "<WS>",
            TokenKind::LBrace => "\"{\"",
            TokenKind::RBrace => "\"}\"",
            TokenKind::LBracket => "\"[\"",
            TokenKind::RBracket => "\"]\"",
            TokenKind::LParen => "\"(\"",
            TokenKind::RParen => "\")\"",
            TokenKind::Colon => "\":\"",
            TokenKind::Comma => "\",\"",
            TokenKind::String => "<STRING>",
            TokenKind::FString => "<F STRING>",
            TokenKind::Integer => "<INTEGER>",
            TokenKind::Float => "<FLOAT>",
            TokenKind::Ident => "<IDENT>",
            TokenKind::Regex => "<REGEX>",
            TokenKind::Null => "null",
            TokenKind::True => "true",
            TokenKind::False => "false",
        };
        f.write_str(s)
    }
}

/// A single token: its kind, the exact matched text and where it starts.
///
/// For quoted and regex literals `literal` holds the content between the
/// delimiters, unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    /// Byte offset of the first character of the token in the source.
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            offset,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String
            | TokenKind::FString
            | TokenKind::Integer
            | TokenKind::Float
            | TokenKind::Ident
            | TokenKind::Regex => write!(f, "{}({:?})", self.kind, self.literal),
            _ => write!(f, "{}", self.kind),
        }
    }
}
