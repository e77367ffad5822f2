//! Terminal generator registry.
//!
//! A registry maps names such as `firstName` to shared generator handles.
//! The parser resolves every identifier and interpolation placeholder against
//! a registry once, at parse time; the resulting [`GeneratorHandle`]s are then
//! invoked on every generation.

use crate::error::GeneratorError;
use crate::value::Value;
use rand::RngCore;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A named, zero-argument value producer.
///
/// Implementations draw all randomness from the supplied source so that a
/// seeded source yields reproducible output.
pub trait TerminalGenerator: Send + Sync {
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GeneratorError>;
}

impl<F> TerminalGenerator for F
where
    F: Fn(&mut dyn RngCore) -> Result<Value, GeneratorError> + Send + Sync,
{
    fn generate(&self, rng: &mut dyn RngCore) -> Result<Value, GeneratorError> {
        self(rng)
    }
}

/// Shared, read-only reference to a registered generator.
pub type GeneratorHandle = Arc<dyn TerminalGenerator>;

/// Wrap a function or closure into a [`GeneratorHandle`].
pub fn from_fn<F>(f: F) -> GeneratorHandle
where
    F: Fn(&mut dyn RngCore) -> Result<Value, GeneratorError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Mapping from generator name to handle.
#[derive(Clone, Default)]
pub struct Registry {
    generators: HashMap<String, GeneratorHandle>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator, returning the one it replaced, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        generator: GeneratorHandle,
    ) -> Option<GeneratorHandle> {
        self.generators.insert(name.into(), generator)
    }

    /// Register a plain function or closure as a generator.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F) -> Option<GeneratorHandle>
    where
        F: Fn(&mut dyn RngCore) -> Result<Value, GeneratorError> + Send + Sync + 'static,
    {
        self.register(name, from_fn(f))
    }

    /// Merge every entry of `other` into this registry, overriding on conflict.
    pub fn merge(&mut self, other: Registry) {
        debug!("Merging {} generators into registry", other.len());
        self.generators.extend(other.generators);
    }

    pub fn get(&self, name: &str) -> Option<GeneratorHandle> {
        self.generators.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("generators", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn constant(rng: &mut dyn RngCore) -> Result<Value, GeneratorError> {
        let _ = rng;
        Ok(Value::from("constant"))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry.register_fn("constant", constant);
        registry.register_fn("dice", |rng: &mut dyn RngCore| {
            Ok(Value::Int(rng.random_range(1..=6)))
        });

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["constant", "dice"]);

        let mut rng = StdRng::seed_from_u64(42);
        let dice = registry.get("dice").unwrap();
        for _ in 0..50 {
            let roll = dice.generate(&mut rng).unwrap().as_i64().unwrap();
            assert!((1..=6).contains(&roll));
        }
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_register_overrides() {
        let mut registry = Registry::new();
        assert!(registry.register_fn("x", constant).is_none());
        let replaced = registry.register_fn("x", |_: &mut dyn RngCore| Ok(Value::Int(1)));
        assert!(replaced.is_some());

        let mut rng = StdRng::seed_from_u64(1);
        let value = registry.get("x").unwrap().generate(&mut rng).unwrap();
        assert_eq!(value, Value::Int(1));
    }

    #[test]
    fn test_merge_overrides_existing_entries() {
        let mut base = Registry::new();
        base.register_fn("a", constant);
        base.register_fn("b", constant);

        let mut extra = Registry::new();
        extra.register_fn("b", |_: &mut dyn RngCore| Ok(Value::Bool(true)));
        extra.register_fn("c", constant);

        base.merge(extra);

        assert_eq!(base.names(), vec!["a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            base.get("b").unwrap().generate(&mut rng).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_generator_errors_are_returned() {
        let mut registry = Registry::new();
        registry.register_fn("broken", |_: &mut dyn RngCore| {
            Err(GeneratorError::msg("backend unavailable"))
        });

        let mut rng = StdRng::seed_from_u64(1);
        let err = registry
            .get("broken")
            .unwrap()
            .generate(&mut rng)
            .unwrap_err();
        assert_eq!(err.to_string(), "backend unavailable");
    }
}
