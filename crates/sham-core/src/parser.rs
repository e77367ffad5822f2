//! Recursive-descent parser producing a [`Schema`].
//!
//! Grammar (one function per production):
//!
//! ```text
//! schema  := value EOF
//! value   := object | array | range | ident | integer | float
//!          | string | fstring | regex | "null" | "true" | "false"
//! object  := "{" [ pair ("," pair)* ] "}"
//! pair    := string ":" value
//! array   := "[" [ (range ",")? value ] "]"
//! range   := "(" integer ["," integer] ")"
//! ```
//!
//! Identifiers and `${name}` placeholders are resolved against the parser's
//! registry while parsing; regex literals are compiled while parsing. The
//! first error aborts the parse.

use crate::ast::{Array, FormattedString, Literal, Node, Object, Range, Schema, Segment, TerminalRef};
use crate::error::{ConfigError, GeneratorError, ParseError};
use crate::regex::{Regex, RegexConfig};
use crate::registry::{GeneratorHandle, Registry};
use crate::scanner::tokenize;
use crate::token::{Token, TokenKind};
use crate::value::Value;
use rand::RngCore;
use tracing::debug;

/// Schema parser holding the terminal generators identifiers resolve to.
///
/// Register every generator before calling [`Parser::parse`]: handles are
/// copied into the AST, so registrations made afterwards never reach an
/// already parsed [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct Parser {
    registry: Registry,
    regex_config: RegexConfig,
}

impl Parser {
    /// Create a parser resolving identifiers against `registry`.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            regex_config: RegexConfig::default(),
        }
    }

    /// Use `config` for every regex literal parsed from now on.
    pub fn with_regex_config(mut self, config: RegexConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.regex_config = config;
        Ok(self)
    }

    /// Register or override a single generator.
    pub fn register(&mut self, name: impl Into<String>, generator: GeneratorHandle) -> &mut Self {
        self.registry.register(name, generator);
        self
    }

    /// Register or override a single generator from a function or closure.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&mut dyn RngCore) -> Result<Value, GeneratorError> + Send + Sync + 'static,
    {
        self.registry.register_fn(name, f);
        self
    }

    /// Merge a whole registry, overriding generators that already exist.
    pub fn register_all(&mut self, registry: Registry) -> &mut Self {
        self.registry.merge(registry);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn regex_config(&self) -> RegexConfig {
        self.regex_config
    }

    /// Tokenize and parse `source`.
    pub fn parse(&self, source: &str) -> Result<Schema, ParseError> {
        let tokens = tokenize(source)?;
        self.parse_tokens(&tokens)
    }

    /// Parse an already tokenized schema.
    pub fn parse_tokens(&self, tokens: &[Token]) -> Result<Schema, ParseError> {
        let mut state = ParseState::new(tokens, self);
        let schema = state.parse_schema()?;
        debug!(
            "Parsed schema from {} tokens ({} generators registered)",
            tokens.len(),
            self.registry.len()
        );
        Ok(schema)
    }
}

/// Cursor over the token slice for a single parse.
struct ParseState<'a> {
    tokens: &'a [Token],
    pos: usize,
    parser: &'a Parser,
    eof: Token,
}

impl<'a> ParseState<'a> {
    fn new(tokens: &'a [Token], parser: &'a Parser) -> Self {
        let end = tokens.last().map_or(0, |t| t.offset + t.literal.len());
        Self {
            tokens,
            pos: 0,
            parser,
            eof: Token::new(TokenKind::Eof, "", end),
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Consume and return the current token.
    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it is of `kind`.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.current().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.current().kind == kind {
            Ok(self.bump())
        } else {
            Err(ParseError::expected_kind(kind, self.current()))
        }
    }

    fn parse_schema(&mut self) -> Result<Schema, ParseError> {
        if self.current().kind == TokenKind::Eof {
            return Err(ParseError::EmptyInput);
        }

        let root = self.parse_value()?;
        self.expect(TokenKind::Eof)?;
        Ok(Schema::new(root))
    }

    fn parse_value(&mut self) -> Result<Node, ParseError> {
        match self.current().kind {
            TokenKind::LBrace => self.parse_object().map(Node::Object),
            TokenKind::LBracket => self.parse_array().map(Node::Array),
            TokenKind::LParen => self.parse_range().map(Node::Range),
            TokenKind::Ident => self.parse_ident().map(Node::Terminal),
            TokenKind::Integer => {
                let token = self.bump();
                Ok(Node::Literal(Literal::Int(parse_integer(&token)?)))
            }
            TokenKind::Float => self.parse_float(),
            TokenKind::String => Ok(Node::Literal(Literal::String(self.bump().literal))),
            TokenKind::FString => self.parse_fstring().map(Node::FormattedString),
            TokenKind::Regex => self.parse_regex().map(Node::Regex),
            TokenKind::Null => {
                self.bump();
                Ok(Node::Literal(Literal::Null))
            }
            TokenKind::True => {
                self.bump();
                Ok(Node::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.bump();
                Ok(Node::Literal(Literal::Bool(false)))
            }
            _ => Err(ParseError::unexpected("a value", self.current())),
        }
    }

    fn parse_object(&mut self) -> Result<Object, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut object = Object::new();

        if self.eat(TokenKind::RBrace) {
            return Ok(object);
        }

        loop {
            let key = self.expect(TokenKind::String)?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_value()?;
            object.push(key.literal, value);

            let separator = self.bump();
            match separator.kind {
                TokenKind::Comma => continue,
                TokenKind::RBrace => break,
                _ => return Err(ParseError::unexpected("\",\" or \"}\"", &separator)),
            }
        }

        Ok(object)
    }

    fn parse_array(&mut self) -> Result<Array, ParseError> {
        self.expect(TokenKind::LBracket)?;

        if self.eat(TokenKind::RBracket) {
            return Ok(Array::empty());
        }

        let range = if self.current().kind == TokenKind::LParen {
            let range = self.parse_range()?;
            if range.min() < 0 {
                return Err(ParseError::NegativeCount {
                    min: range.min(),
                    max: range.max(),
                });
            }
            self.expect(TokenKind::Comma)?;
            Some(range)
        } else {
            None
        };

        let inner = self.parse_value()?;
        self.expect(TokenKind::RBracket)?;

        Ok(Array::new(range, inner))
    }

    fn parse_range(&mut self) -> Result<Range, ParseError> {
        self.expect(TokenKind::LParen)?;
        let min = parse_integer(&self.expect(TokenKind::Integer)?)?;

        let separator = self.bump();
        match separator.kind {
            TokenKind::RParen => Ok(Range::fixed(min)),
            TokenKind::Comma => {
                let max = parse_integer(&self.expect(TokenKind::Integer)?)?;
                let range = Range::new(min, max)?;
                self.expect(TokenKind::RParen)?;
                Ok(range)
            }
            _ => Err(ParseError::unexpected("\",\" or \")\"", &separator)),
        }
    }

    fn resolve(&self, name: &str, offset: usize) -> Result<TerminalRef, ParseError> {
        self.parser
            .registry
            .get(name)
            .map(|handle| TerminalRef::new(name, handle))
            .ok_or_else(|| ParseError::UnknownGenerator {
                name: name.to_string(),
                offset,
            })
    }

    fn parse_ident(&mut self) -> Result<TerminalRef, ParseError> {
        let token = self.bump();
        self.resolve(&token.literal, token.offset)
    }

    fn parse_float(&mut self) -> Result<Node, ParseError> {
        let token = self.bump();
        match token.literal.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Node::Literal(Literal::Float(f))),
            _ => Err(ParseError::InvalidFloat {
                literal: token.literal,
                offset: token.offset,
            }),
        }
    }

    /// Split a backtick template into text and `${name}` placeholder segments.
    fn parse_fstring(&mut self) -> Result<FormattedString, ParseError> {
        let token = self.bump();
        let raw = token.literal.as_str();

        let mut segments = Vec::new();
        let mut params = Vec::new();
        let mut rest = raw;

        while let Some(start) = rest.find("${") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }

            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or_else(|| ParseError::UnterminatedPlaceholder {
                    raw: raw.to_string(),
                })?;

            let name = after[..end].trim();
            // byte position of `${` in the source, past the opening backtick
            let offset = token.offset + 1 + (raw.len() - rest.len()) + start;
            segments.push(Segment::Param(params.len()));
            params.push(self.resolve(name, offset)?);

            rest = &after[end + 1..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(FormattedString::new(raw, segments, params))
    }

    fn parse_regex(&mut self) -> Result<Regex, ParseError> {
        let token = self.bump();
        let pattern = token.literal.replace("\\/", "/");

        Regex::compile(&pattern, self.parser.regex_config).map_err(|e| ParseError::Regex {
            pattern: token.literal,
            source: Box::new(e),
        })
    }
}

fn parse_integer(token: &Token) -> Result<i64, ParseError> {
    token
        .literal
        .parse::<i64>()
        .map_err(|_| ParseError::IntegerOutOfRange {
            literal: token.literal.clone(),
            offset: token.offset,
        })
}
