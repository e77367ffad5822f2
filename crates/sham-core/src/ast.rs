//! Schema AST and its generation semantics.
//!
//! Every node is built once by the parser and never mutated afterwards.
//! [`Node::generate`] evaluates a node against an explicit random source,
//! so one parsed [`Schema`] can be generated from any number of times, from
//! any number of threads, each holding its own RNG.

use crate::error::{GeneratorError, ParseError};
use crate::ordered_map::OrderedMap;
use crate::regex::Regex;
use crate::registry::GeneratorHandle;
use crate::value::Value;
use rand::Rng;
use std::fmt;

/// A parsed schema, ready for generation.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    root: Option<Node>,
}

impl Schema {
    pub fn new(root: Node) -> Self {
        Self { root: Some(root) }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Generate one value tree. A schema without a root yields `Null`.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Value, GeneratorError> {
        match &self.root {
            Some(root) => root.generate(rng),
            None => Ok(Value::Null),
        }
    }
}

/// The closed set of schema node kinds.
#[derive(Debug, Clone)]
pub enum Node {
    Object(Object),
    Array(Array),
    /// A bare range evaluates to an integer sampled from it.
    Range(Range),
    FormattedString(FormattedString),
    Literal(Literal),
    Terminal(TerminalRef),
    Regex(Regex),
}

impl Node {
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Value, GeneratorError> {
        match self {
            Node::Object(object) => object.generate(rng),
            Node::Array(array) => array.generate(rng),
            Node::Range(range) => Ok(Value::Int(range.value(rng))),
            Node::FormattedString(fstring) => fstring.generate(rng),
            Node::Literal(literal) => Ok(literal.generate()),
            Node::Terminal(terminal) => terminal.generate(rng),
            Node::Regex(regex) => Ok(Value::String(regex.generate(rng))),
        }
    }
}

/// Ordered `key: value` pairs. Duplicate keys are kept as separate pairs.
#[derive(Debug, Clone, Default)]
pub struct Object {
    pairs: Vec<(String, Node)>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: Node) {
        self.pairs.push((key.into(), value));
    }

    pub fn pairs(&self) -> &[(String, Node)] {
        &self.pairs
    }

    /// Set every pair in source order. A repeated key keeps the position of
    /// its first occurrence and the value of its last.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Value, GeneratorError> {
        let mut map = OrderedMap::with_capacity(self.pairs.len());
        for (key, node) in &self.pairs {
            map.set(key.clone(), node.generate(rng)?);
        }
        Ok(Value::Object(map))
    }
}

/// An element template repeated a (possibly random) number of times.
#[derive(Debug, Clone)]
pub struct Array {
    range: Option<Range>,
    inner: Option<Box<Node>>,
}

impl Array {
    /// Array of `inner`, one element unless a range is given.
    pub fn new(range: Option<Range>, inner: Node) -> Self {
        Self {
            range,
            inner: Some(Box::new(inner)),
        }
    }

    /// The `[]` literal: always generates an empty sequence.
    pub fn empty() -> Self {
        Self {
            range: None,
            inner: None,
        }
    }

    pub fn range(&self) -> Option<Range> {
        self.range
    }

    pub fn inner(&self) -> Option<&Node> {
        self.inner.as_deref()
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Value, GeneratorError> {
        let Some(inner) = &self.inner else {
            return Ok(Value::Array(Vec::new()));
        };

        // The parser rejects negative array ranges.
        let count = self.range.map_or(1, |range| range.value(rng));
        let count = usize::try_from(count).unwrap_or(0);

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(inner.generate(rng)?);
        }
        Ok(Value::Array(items))
    }
}

/// Inclusive integer interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    min: i64,
    max: i64,
}

impl Range {
    pub fn new(min: i64, max: i64) -> Result<Self, ParseError> {
        if max < min {
            return Err(ParseError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// A range that always yields `n`.
    pub fn fixed(n: i64) -> Self {
        Self { min: n, max: n }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// `min` when the bounds are equal, otherwise a uniform draw from `[min, max]`.
    pub fn value<R: Rng>(&self, rng: &mut R) -> i64 {
        if self.min == self.max {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// A piece of a rewritten interpolation template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    /// Index into the template's resolved generators.
    Param(usize),
}

/// Backtick template with `${name}` placeholders resolved at parse time.
#[derive(Debug, Clone)]
pub struct FormattedString {
    raw: String,
    segments: Vec<Segment>,
    params: Vec<TerminalRef>,
}

impl FormattedString {
    pub fn new(raw: impl Into<String>, segments: Vec<Segment>, params: Vec<TerminalRef>) -> Self {
        Self {
            raw: raw.into(),
            segments,
            params,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn params(&self) -> &[TerminalRef] {
        &self.params
    }

    /// Invoke each placeholder's generator once, left to right, and splice
    /// the results into the template.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Value, GeneratorError> {
        if self.params.is_empty() {
            return Ok(Value::String(self.raw.clone()));
        }

        let values = self
            .params
            .iter()
            .map(|param| param.generate(rng))
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Param(i) => {
                    if let Some(value) = values.get(*i) {
                        out.push_str(&value.to_string());
                    }
                }
            }
        }
        Ok(Value::String(out))
    }
}

/// Scalar constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    pub fn generate(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::Int(*i),
            Literal::Float(f) => Value::Float(*f),
            Literal::String(s) => Value::String(s.clone()),
        }
    }
}

/// A registry generator resolved by name at parse time.
#[derive(Clone)]
pub struct TerminalRef {
    name: String,
    handle: GeneratorHandle,
}

impl TerminalRef {
    pub fn new(name: impl Into<String>, handle: GeneratorHandle) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Value, GeneratorError> {
        self.handle.generate(rng)
    }
}

impl fmt::Debug for TerminalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TerminalRef").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::from_fn;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn counter() -> TerminalRef {
        let next = AtomicI64::new(0);
        TerminalRef::new(
            "counter",
            from_fn(move |_| Ok(Value::Int(next.fetch_add(1, Ordering::SeqCst)))),
        )
    }

    #[test]
    fn test_range_value_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let range = Range::new(-3, 5).unwrap();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..2000 {
            let v = range.value(&mut rng);
            assert!((-3..=5).contains(&v));
            seen.insert(v);
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_fixed_range_is_constant() {
        let mut rng = StdRng::seed_from_u64(42);
        let range = Range::new(4, 4).unwrap();
        for _ in 0..500 {
            assert_eq!(range.value(&mut rng), 4);
        }
        assert_eq!(Range::fixed(7).value(&mut rng), 7);
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            Range::new(2, 1),
            Err(ParseError::InvalidRange { min: 2, max: 1 })
        ));
    }

    #[test]
    fn test_array_fixed_length_generates_independently() {
        let mut rng = StdRng::seed_from_u64(42);
        let array = Array::new(Some(Range::fixed(5)), Node::Terminal(counter()));

        let value = array.generate(&mut rng).unwrap();
        assert_eq!(
            value,
            Value::Array((0..5).map(Value::Int).collect::<Vec<_>>())
        );
    }

    #[test]
    fn test_array_defaults_to_one_element() {
        let mut rng = StdRng::seed_from_u64(42);
        let array = Array::new(None, Node::Literal(Literal::Bool(true)));
        assert_eq!(
            array.generate(&mut rng).unwrap(),
            Value::Array(vec![Value::Bool(true)])
        );
    }

    #[test]
    fn test_array_random_length() {
        let mut rng = StdRng::seed_from_u64(42);
        let array = Array::new(Some(Range::new(1, 3).unwrap()), Node::Literal(Literal::Null));
        for _ in 0..200 {
            let len = array.generate(&mut rng).unwrap().as_array().unwrap().len();
            assert!((1..=3).contains(&len));
        }
    }

    #[test]
    fn test_empty_array() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(
            Array::empty().generate(&mut rng).unwrap(),
            Value::Array(vec![])
        );
    }

    #[test]
    fn test_object_keeps_first_seen_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut object = Object::new();
        object.push("b", Node::Literal(Literal::Int(1)));
        object.push("c", Node::Literal(Literal::Int(2)));
        object.push("a", Node::Literal(Literal::Int(3)));
        object.push("b", Node::Literal(Literal::Int(4)));

        let value = object.generate(&mut rng).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "c", "a"]);
        assert_eq!(map.get("b"), Some(&Value::Int(4)));
    }

    #[test]
    fn test_literal_is_idempotent() {
        let literal = Literal::String("same".into());
        assert_eq!(literal.generate(), literal.generate());
        assert_eq!(Literal::Float(2.5).generate(), Value::Float(2.5));
    }

    #[test]
    fn test_formatted_string_substitutes_in_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let fstring = FormattedString::new(
            "${counter}-${counter}!",
            vec![
                Segment::Param(0),
                Segment::Text("-".into()),
                Segment::Param(1),
                Segment::Text("!".into()),
            ],
            {
                let c = counter();
                vec![c.clone(), c]
            },
        );

        assert_eq!(fstring.generate(&mut rng).unwrap(), Value::from("0-1!"));
        assert_eq!(fstring.generate(&mut rng).unwrap(), Value::from("2-3!"));
    }

    #[test]
    fn test_formatted_string_without_params_is_raw() {
        let mut rng = StdRng::seed_from_u64(42);
        let fstring = FormattedString::new("plain text", vec![], vec![]);
        assert_eq!(fstring.generate(&mut rng).unwrap(), Value::from("plain text"));
    }

    #[test]
    fn test_terminal_error_propagates() {
        let mut rng = StdRng::seed_from_u64(42);
        let broken = TerminalRef::new(
            "broken",
            from_fn(|_| Err(GeneratorError::msg("exhausted"))),
        );

        let mut object = Object::new();
        object.push("ok", Node::Literal(Literal::Null));
        object.push("bad", Node::Terminal(broken));

        let err = Node::Object(object).generate(&mut rng).unwrap_err();
        assert_eq!(err.to_string(), "exhausted");
    }

    #[test]
    fn test_default_schema_generates_null() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(Schema::default().generate(&mut rng).unwrap(), Value::Null);
    }

    #[test]
    fn test_schema_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
    }
}
