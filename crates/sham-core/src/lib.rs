//! Core of the Sham mock data language.
//!
//! A Sham schema is a JSON-like template whose leaves describe how to produce
//! values instead of the values themselves:
//!
//! ```text
//! {
//!     "id": uuid,
//!     "name": `${firstName} ${lastName}`,
//!     "age": (18, 90),
//!     "tags": [(1, 3), /[a-z]{4,8}/]
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! source text
//!      │
//!      ▼
//! ┌───────────┐   Vec<Token>   ┌──────────┐    Schema (AST)
//! │  scanner  │ ─────────────▶ │  parser  │ ─────────────────┐
//! └───────────┘                └────┬─────┘                  │
//!                                   │ resolves identifiers   │
//!                                   ▼                        ▼
//!                             ┌──────────┐        Schema::generate(&mut rng)
//!                             │ Registry │                   │
//!                             └──────────┘                   ▼
//!                                                   Value (Null / Bool / Int /
//!                                                   Float / String / Array /
//!                                                   Object(OrderedMap))
//! ```
//!
//! Parsing happens once; a parsed [`Schema`] can be generated from any number
//! of times. All randomness comes from the `Rng` passed to `generate`, so a
//! seeded generator reproduces the same output for the same schema.
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::{Rng, SeedableRng};
//! use sham_core::{Parser, Registry, Value};
//!
//! let mut registry = Registry::new();
//! registry.register_fn("dice", |rng| Ok(Value::Int(rng.random_range(1..=6))));
//!
//! let schema = Parser::new(registry)
//!     .parse(r#"{"rolls": [(3), dice], "label": `roll ${dice}`}"#)
//!     .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let value = schema.generate(&mut rng).unwrap();
//! assert_eq!(value.as_object().unwrap().len(), 2);
//! ```

pub mod ast;
pub mod error;
pub mod ordered_map;
pub mod parser;
pub mod regex;
pub mod registry;
pub mod scanner;
pub mod token;
pub mod value;

// Re-exports for convenience
pub use ast::{Node, Schema};
pub use error::{ConfigError, Error, GeneratorError, LexError, ParseError};
pub use ordered_map::OrderedMap;
pub use parser::Parser;
pub use regex::{Regex, RegexConfig};
pub use registry::{from_fn, GeneratorHandle, Registry, TerminalGenerator};
pub use scanner::tokenize;
pub use token::{Token, TokenKind};
pub use value::Value;

use rand::Rng;

/// Parse `source` against `registry` and generate a single value.
pub fn generate<R: Rng>(source: &str, registry: Registry, rng: &mut R) -> Result<Value, Error> {
    let schema = Parser::new(registry).parse(source)?;
    Ok(schema.generate(rng)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_convenience() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate(r#"{"a": [(2), 1]}"#, Registry::new(), &mut rng).unwrap();
        assert_eq!(
            value.as_object().unwrap().get("a"),
            Some(&Value::Array(vec![Value::Int(1), Value::Int(1)]))
        );
    }

    #[test]
    fn test_same_seed_same_output() {
        let source = r#"{"code": /[A-Z]{3}-[0-9]{4}/, "n": (0, 1000), "xs": [(0, 5), (1, 9)]}"#;
        let schema = Parser::default().parse(source).unwrap();

        let a = schema.generate(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = schema.generate(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_errors_are_split_by_stage() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            generate("nope", Registry::new(), &mut rng).unwrap_err(),
            Error::Parse(ParseError::UnknownGenerator { .. })
        ));

        let mut registry = Registry::new();
        registry.register_fn("fail", |_| Err(GeneratorError::msg("boom")));
        assert!(matches!(
            generate("[fail]", registry, &mut rng).unwrap_err(),
            Error::Generate(_)
        ));
    }
}
