//! Error types for scanning, parsing and generation.

use crate::token::{Token, TokenKind};

/// Errors raised while scanning schema text. Scanning halts on the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// End of input reached before the closing quote or backtick.
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },

    /// End of input reached before the closing `/`.
    #[error("unterminated regex starting at byte {offset}")]
    UnterminatedRegex { offset: usize },

    /// Numeric literal with an invalid shape (leading zero, bare sign,
    /// missing fraction or exponent digits).
    #[error("invalid number {lexeme:?} at byte {offset}: {reason}")]
    InvalidNumber {
        lexeme: String,
        reason: &'static str,
        offset: usize,
    },

    /// A character that does not start any token.
    #[error("unexpected character {ch:?} at byte {offset}")]
    UnexpectedChar { ch: char, offset: usize },
}

/// Errors raised while parsing a schema. The first error aborts the parse.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The schema contained no tokens at all.
    #[error("empty input")]
    EmptyInput,

    #[error("expected {expected}, got {found} at byte {offset}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
    },

    /// Bare identifier or interpolation placeholder not in the registry.
    #[error("unknown terminal generator {name:?} at byte {offset}")]
    UnknownGenerator { name: String, offset: usize },

    #[error("range maximum {max} cannot be less than the minimum {min}")]
    InvalidRange { min: i64, max: i64 },

    /// Array repetition ranges count elements and cannot go below zero.
    #[error("array length range ({min},{max}) cannot be negative")]
    NegativeCount { min: i64, max: i64 },

    #[error("unterminated placeholder in formatted string {raw:?}")]
    UnterminatedPlaceholder { raw: String },

    #[error("integer {literal} at byte {offset} is out of range")]
    IntegerOutOfRange { literal: String, offset: usize },

    #[error("invalid float {literal} at byte {offset}")]
    InvalidFloat { literal: String, offset: usize },

    #[error("invalid regex /{pattern}/: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: Box<regex_syntax::Error>,
    },
}

impl ParseError {
    pub(crate) fn unexpected(expected: impl Into<String>, found: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.to_string(),
            offset: found.offset,
        }
    }

    pub(crate) fn expected_kind(expected: TokenKind, found: &Token) -> Self {
        Self::unexpected(expected.to_string(), found)
    }
}

/// Invalid regex generation settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_repeat must be at least 2, got {0}")]
    MaxRepeatTooSmall(u32),

    #[error("optional_probability must be within [0, 1], got {0}")]
    ProbabilityOutOfRange(f64),
}

/// Failure reported by a terminal generator.
///
/// Generation never fails on its own; this is the registry's failure
/// contract and is handed back to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl GeneratorError {
    pub fn msg(message: impl Into<String>) -> Self {
        GeneratorError::Message(message.into())
    }
}

/// Either half of the parse-then-generate pipeline failing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Generate(#[from] GeneratorError),
}
