//! Scanner turning schema text into a flat token sequence.
//!
//! The scanner is a single left-to-right pass with one character of
//! lookahead. It classifies each token by its first character:
//!
//! ```text
//! letter        → identifier / keyword
//! digit or '-'  → integer / float
//! '"'           → string
//! '`'           → interpolated string
//! '/'           → regex
//! { } [ ] ( ) : ,  → punctuation
//! whitespace    → discarded
//! ```

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use std::iter::Peekable;
use std::str::CharIndices;
use tracing::trace;

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Tokenize a complete schema.
///
/// Whitespace is dropped and the result always ends with an EOF token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = scanner.scan()?;
        match token.kind {
            TokenKind::Whitespace => continue,
            TokenKind::Eof => {
                tokens.push(token);
                break;
            }
            _ => tokens.push(token),
        }
    }

    trace!("Tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(tokens)
}

/// Character-level state machine producing one token per [`Scanner::scan`] call.
pub struct Scanner<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    /// Byte offset of the next unread character.
    fn pos(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(i, _)| i)
            .unwrap_or(self.source.len())
    }

    fn lexeme(&mut self, start: usize) -> &'a str {
        let end = self.pos();
        &self.source[start..end]
    }

    /// Scan the next token, including whitespace runs.
    ///
    /// Returns an EOF token once the input is exhausted.
    pub fn scan(&mut self) -> Result<Token, LexError> {
        let start = self.pos();
        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", start));
        };

        if is_whitespace(ch) {
            return Ok(self.scan_whitespace(start));
        }
        if ch.is_ascii_alphabetic() {
            return Ok(self.scan_ident(start));
        }
        if ch.is_ascii_digit() || ch == '-' {
            return self.scan_number(start);
        }

        self.bump();
        let kind = match ch {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '"' => return self.scan_quoted('"', TokenKind::String, start),
            '`' => return self.scan_quoted('`', TokenKind::FString, start),
            '/' => return self.scan_regex(start),
            _ => return Err(LexError::UnexpectedChar { ch, offset: start }),
        };

        Ok(Token::new(kind, ch.to_string(), start))
    }

    fn scan_whitespace(&mut self, start: usize) -> Token {
        while self.peek().is_some_and(is_whitespace) {
            self.bump();
        }
        Token::new(TokenKind::Whitespace, self.lexeme(start), start)
    }

    fn scan_ident(&mut self, start: usize) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.bump();
        }

        let ident = self.lexeme(start);
        let kind = TokenKind::keyword(ident).unwrap_or(TokenKind::Ident);
        Token::new(kind, ident, start)
    }

    /// Consume a run of ASCII digits, returning how many were read.
    fn eat_digits(&mut self) -> usize {
        let mut n = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            n += 1;
        }
        n
    }

    fn invalid_number(&mut self, start: usize, reason: &'static str) -> LexError {
        LexError::InvalidNumber {
            lexeme: self.lexeme(start).to_string(),
            reason,
            offset: start,
        }
    }

    fn scan_number(&mut self, start: usize) -> Result<Token, LexError> {
        let mut kind = TokenKind::Integer;

        if self.peek() == Some('-') {
            self.bump();
        }

        match self.peek() {
            Some('0') => {
                self.bump();
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                    return Err(self.invalid_number(start, "leading zero"));
                }
            }
            Some(c) if c.is_ascii_digit() => {
                self.eat_digits();
            }
            _ => return Err(self.invalid_number(start, "expected a digit")),
        }

        if self.peek() == Some('.') {
            self.bump();
            kind = TokenKind::Float;
            if self.eat_digits() == 0 {
                return Err(self.invalid_number(start, "expected a digit after '.'"));
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            kind = TokenKind::Float;
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.eat_digits() == 0 {
                return Err(self.invalid_number(start, "expected a digit in the exponent"));
            }
        }

        Ok(Token::new(kind, self.lexeme(start), start))
    }

    /// Scan the body of a quoted literal; the opening delimiter is already consumed.
    fn scan_quoted(
        &mut self,
        delim: char,
        kind: TokenKind,
        start: usize,
    ) -> Result<Token, LexError> {
        let content_start = self.pos();
        loop {
            match self.bump() {
                None => return Err(LexError::UnterminatedString { offset: start }),
                Some((i, c)) if c == delim => {
                    return Ok(Token::new(kind, &self.source[content_start..i], start));
                }
                Some(_) => {}
            }
        }
    }

    /// Scan a regex body up to the first `/` not preceded by `\`.
    fn scan_regex(&mut self, start: usize) -> Result<Token, LexError> {
        let content_start = self.pos();
        let mut prev = '/';
        loop {
            match self.bump() {
                None => return Err(LexError::UnterminatedRegex { offset: start }),
                Some((i, '/')) if prev != '\\' => {
                    return Ok(Token::new(
                        TokenKind::Regex,
                        &self.source[content_start..i],
                        start,
                    ));
                }
                Some((_, c)) => prev = c,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds_and_literals(source: &str) -> Vec<(TokenKind, std::string::String)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.literal))
            .collect()
    }

    fn tok(kind: TokenKind, literal: &str) -> (TokenKind, std::string::String) {
        (kind, literal.to_string())
    }

    #[test]
    fn test_tokenize_object() {
        let tokens = kinds_and_literals(r#"{"a": 123, "b": true, "c": "def", "g": -1.56e-6}"#);

        assert_eq!(
            tokens,
            vec![
                tok(LBrace, "{"),
                tok(String, "a"),
                tok(Colon, ":"),
                tok(Integer, "123"),
                tok(Comma, ","),
                tok(String, "b"),
                tok(Colon, ":"),
                tok(True, "true"),
                tok(Comma, ","),
                tok(String, "c"),
                tok(Colon, ":"),
                tok(String, "def"),
                tok(Comma, ","),
                tok(String, "g"),
                tok(Colon, ":"),
                tok(Float, "-1.56e-6"),
                tok(RBrace, "}"),
                tok(Eof, ""),
            ]
        );
    }

    #[test]
    fn test_whitespace_is_never_emitted() {
        let tokens = tokenize(" \t\r\n[ (1, 2) ,\n name ] \n").unwrap();
        assert!(tokens.iter().all(|t| t.kind != Whitespace));
        assert_eq!(tokens.len(), 10);
    }

    #[test]
    fn test_empty_input_is_only_eof() {
        assert_eq!(kinds_and_literals(""), vec![tok(Eof, "")]);
        assert_eq!(kinds_and_literals("   "), vec![tok(Eof, "")]);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds_and_literals("null true false phoneNumber user_id2"),
            vec![
                tok(Null, "null"),
                tok(True, "true"),
                tok(False, "false"),
                tok(Ident, "phoneNumber"),
                tok(Ident, "user_id2"),
                tok(Eof, ""),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds_and_literals("0 -0 42 -7 0.5 3.25 1e10 2E+3 -4.5e-2"),
            vec![
                tok(Integer, "0"),
                tok(Integer, "-0"),
                tok(Integer, "42"),
                tok(Integer, "-7"),
                tok(Float, "0.5"),
                tok(Float, "3.25"),
                tok(Float, "1e10"),
                tok(Float, "2E+3"),
                tok(Float, "-4.5e-2"),
                tok(Eof, ""),
            ]
        );
    }

    #[test]
    fn test_leading_zero_is_rejected() {
        let err = tokenize("012").unwrap_err();
        assert!(matches!(
            err,
            LexError::InvalidNumber {
                reason: "leading zero",
                offset: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(matches!(
            tokenize("-").unwrap_err(),
            LexError::InvalidNumber { .. }
        ));
        assert!(matches!(
            tokenize("-x").unwrap_err(),
            LexError::InvalidNumber { .. }
        ));
        assert!(matches!(
            tokenize("1.").unwrap_err(),
            LexError::InvalidNumber { .. }
        ));
        assert!(matches!(
            tokenize("1e").unwrap_err(),
            LexError::InvalidNumber { .. }
        ));
        assert!(matches!(
            tokenize("1e+").unwrap_err(),
            LexError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            tokenize(r#""abc"#).unwrap_err(),
            LexError::UnterminatedString { offset: 0 }
        );
        assert_eq!(
            tokenize("{ `abc").unwrap_err(),
            LexError::UnterminatedString { offset: 2 }
        );
    }

    #[test]
    fn test_unterminated_regex() {
        assert_eq!(
            tokenize("/ab").unwrap_err(),
            LexError::UnterminatedRegex { offset: 0 }
        );
        assert_eq!(
            tokenize(r"/ab\/").unwrap_err(),
            LexError::UnterminatedRegex { offset: 0 }
        );
    }

    #[test]
    fn test_regex_with_escaped_slash() {
        assert_eq!(
            kinds_and_literals(r"/a\/b+/"),
            vec![tok(Regex, r"a\/b+"), tok(Eof, "")]
        );
    }

    #[test]
    fn test_fstring_keeps_raw_content() {
        assert_eq!(
            kinds_and_literals("`Hi ${name}!`"),
            vec![tok(FString, "Hi ${name}!"), tok(Eof, "")]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("{ 'a' }").unwrap_err(),
            LexError::UnexpectedChar { ch: '\'', offset: 2 }
        );
        assert_eq!(
            tokenize("é").unwrap_err(),
            LexError::UnexpectedChar { ch: 'é', offset: 0 }
        );
    }

    #[test]
    fn test_offsets_are_byte_positions() {
        let tokens = tokenize("{\"ключ\": 1}").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        // "ключ" is four two-byte characters.
        assert_eq!(offsets, vec![0, 1, 11, 13, 14, 15]);
    }
}
