//! Terminal generators for the Sham data generation language.
//!
//! [`default_registry`] builds the registry every schema can use out of the
//! box. [`GeneratorFile`] loads further generators from YAML and merges them
//! on top, overriding defaults with the same name.
//!
//! # Default generators
//!
//! - `name` - `"First Last"`
//! - `firstName` - a first name
//! - `lastName` - a last name
//! - `phoneNumber` - `ddd-ddd-dddd`
//! - `timestamp` - RFC 3339 UTC timestamp between the Unix epoch and now
//! - `uuid` - random UUID v4
//! - `email` - `first.last@domain`
//!
//! # Custom generator types
//!
//! - `uuid_v4` - Random UUID v4
//! - `int_range` - Random integers in a range
//! - `float_range` - Random floats in a range
//! - `timestamp_range` - Random timestamps in a date range
//! - `timestamp_now` - Current time
//! - `weighted_bool` - Boolean with configurable true probability
//! - `one_of` - Random selection from a list
//! - `static` - Static value
//! - `null` - Null value
//! - `regex` - Strings matching a pattern

pub mod config;
pub mod names;
pub mod phone;
pub mod timestamp;
pub mod uuid;

// Re-exports for convenience
pub use config::{ConfigError, GeneratorConfig, GeneratorFile};

use rand::RngCore;
use sham_core::{Registry, Value};
use tracing::debug;

/// Registry holding every built-in terminal generator.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();

    registry.register_fn("name", |rng: &mut dyn RngCore| {
        Ok(Value::from(names::full_name(rng)))
    });
    registry.register_fn("firstName", |rng: &mut dyn RngCore| {
        Ok(Value::from(names::first_name(rng)))
    });
    registry.register_fn("lastName", |rng: &mut dyn RngCore| {
        Ok(Value::from(names::last_name(rng)))
    });
    registry.register_fn("phoneNumber", |rng: &mut dyn RngCore| {
        Ok(Value::from(phone::phone_number(rng)))
    });
    registry.register_fn("timestamp", |rng: &mut dyn RngCore| {
        let dt = timestamp::timestamp_until_now(rng);
        Ok(Value::from(timestamp::format_timestamp(&dt)))
    });
    registry.register_fn("uuid", |rng: &mut dyn RngCore| {
        Ok(Value::from(crate::uuid::uuid_v4(rng).to_string()))
    });
    registry.register_fn("email", |rng: &mut dyn RngCore| {
        Ok(Value::from(names::email(rng)))
    });

    debug!("Built default registry with {} generators", registry.len());
    registry
}
