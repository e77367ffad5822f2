//! Custom terminal generators declared in YAML.
//!
//! ```yaml
//! generators:
//!   age:
//!     type: int_range
//!     min: 18
//!     max: 90
//!   status:
//!     type: one_of
//!     values: [active, suspended, deleted]
//!   sku:
//!     type: regex
//!     pattern: "[A-Z]{3}-[0-9]{5}"
//! ```
//!
//! Every entry becomes a terminal generator under its key, usable as a bare
//! identifier or as a `${name}` placeholder in a schema.

use crate::timestamp::{format_timestamp, parse_timestamp, timestamp_between};
use chrono::Utc;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use sham_core::registry::from_fn;
use sham_core::regex::{DEFAULT_MAX_REPEAT, DEFAULT_OPTIONAL_PROBABILITY};
use sham_core::{GeneratorHandle, OrderedMap, Regex, RegexConfig, Registry, TokenKind, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Error type for generator files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the generator file
    #[error("Failed to read generator file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A definition that parsed but cannot produce values
    #[error("Invalid generator '{name}': {reason}")]
    InvalidGenerator { name: String, reason: String },
}

/// Generator configuration for a custom terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Generate UUIDs (v4)
    UuidV4,

    /// Generate random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Generate random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate timestamps in a range
    TimestampRange {
        /// Start timestamp (RFC 3339 or YYYY-MM-DD)
        start: String,
        /// End timestamp (RFC 3339 or YYYY-MM-DD)
        end: String,
    },

    /// Current timestamp at generation time.
    ///
    /// Not deterministic: ignores the random source.
    TimestampNow,

    /// Generate weighted boolean values
    WeightedBool {
        /// Probability of `true` (0.0 to 1.0)
        true_weight: f64,
    },

    /// Random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<YamlValue>,
    },

    /// Generate a static value
    Static {
        /// The static value to use
        value: YamlValue,
    },

    /// Always null
    Null,

    /// Strings matching a regular expression
    Regex {
        pattern: String,
        #[serde(default)]
        max_repeat: Option<u32>,
        #[serde(default)]
        optional_probability: Option<f64>,
    },
}

impl GeneratorConfig {
    /// Validate the definition and build a handle for it.
    pub fn to_handle(&self, name: &str) -> Result<GeneratorHandle, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidGenerator {
            name: name.to_string(),
            reason,
        };

        let handle = match self {
            GeneratorConfig::UuidV4 => from_fn(|rng: &mut dyn RngCore| {
                Ok(Value::from(crate::uuid::uuid_v4(rng).to_string()))
            }),

            GeneratorConfig::IntRange { min, max } => {
                if min > max {
                    return Err(invalid(format!("min {min} is greater than max {max}")));
                }
                let (min, max) = (*min, *max);
                from_fn(move |rng: &mut dyn RngCore| Ok(Value::Int(rng.random_range(min..=max))))
            }

            GeneratorConfig::FloatRange { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(invalid("float bounds must be finite".to_string()));
                }
                if min > max {
                    return Err(invalid(format!("min {min} is greater than max {max}")));
                }
                if !(max - min).is_finite() {
                    return Err(invalid(format!(
                        "range from {min} to {max} is too wide to sample"
                    )));
                }
                let (min, max) = (*min, *max);
                from_fn(move |rng: &mut dyn RngCore| {
                    Ok(Value::Float(rng.random_range(min..=max)))
                })
            }

            GeneratorConfig::TimestampRange { start, end } => {
                let start_dt = parse_timestamp(start)
                    .ok_or_else(|| invalid(format!("cannot parse start timestamp {start:?}")))?;
                let end_dt = parse_timestamp(end)
                    .ok_or_else(|| invalid(format!("cannot parse end timestamp {end:?}")))?;
                if start_dt > end_dt {
                    return Err(invalid(format!("start {start} is after end {end}")));
                }
                from_fn(move |rng: &mut dyn RngCore| {
                    let dt = timestamp_between(rng, start_dt, end_dt);
                    Ok(Value::from(format_timestamp(&dt)))
                })
            }

            GeneratorConfig::TimestampNow => {
                from_fn(|_: &mut dyn RngCore| Ok(Value::from(format_timestamp(&Utc::now()))))
            }

            GeneratorConfig::WeightedBool { true_weight } => {
                if !(0.0..=1.0).contains(true_weight) {
                    return Err(invalid(format!(
                        "true_weight must be within [0, 1], got {true_weight}"
                    )));
                }
                let weight = *true_weight;
                from_fn(move |rng: &mut dyn RngCore| Ok(Value::Bool(rng.random_bool(weight))))
            }

            GeneratorConfig::OneOf { values } => {
                if values.is_empty() {
                    return Err(invalid("one_of requires at least one value".to_string()));
                }
                let pool = values
                    .iter()
                    .map(yaml_to_value)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(invalid)?;
                from_fn(move |rng: &mut dyn RngCore| {
                    let idx = rng.random_range(0..pool.len());
                    Ok(pool[idx].clone())
                })
            }

            GeneratorConfig::Static { value } => {
                let value = yaml_to_value(value).map_err(invalid)?;
                from_fn(move |_: &mut dyn RngCore| Ok(value.clone()))
            }

            GeneratorConfig::Null => from_fn(|_: &mut dyn RngCore| Ok(Value::Null)),

            GeneratorConfig::Regex {
                pattern,
                max_repeat,
                optional_probability,
            } => {
                let config = RegexConfig::new(
                    max_repeat.unwrap_or(DEFAULT_MAX_REPEAT),
                    optional_probability.unwrap_or(DEFAULT_OPTIONAL_PROBABILITY),
                )
                .map_err(|e| invalid(e.to_string()))?;
                let regex = Regex::compile(pattern, config)
                    .map_err(|e| invalid(format!("invalid regex /{pattern}/: {e}")))?;
                from_fn(move |rng: &mut dyn RngCore| Ok(Value::from(regex.generate(rng))))
            }
        };

        Ok(handle)
    }
}

/// A YAML document declaring custom generators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorFile {
    /// Generators keyed by the identifier schemas refer to them by
    #[serde(default)]
    pub generators: BTreeMap<String, GeneratorConfig>,
}

impl GeneratorFile {
    /// Load generators from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let file = Self::from_yaml(&content)?;
        debug!(
            "Loaded {} generator definitions from {}",
            file.generators.len(),
            path.display()
        );
        Ok(file)
    }

    /// Parse generators from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate every definition and collect the handles into a new registry.
    pub fn to_registry(&self) -> Result<Registry, ConfigError> {
        let mut registry = Registry::new();
        for (name, config) in &self.generators {
            validate_name(name)?;
            registry.register(name.as_str(), config.to_handle(name)?);
        }
        Ok(registry)
    }

    /// Merge into `registry`, overriding entries with the same name.
    ///
    /// Nothing is merged unless every definition is valid.
    pub fn register_into(&self, registry: &mut Registry) -> Result<usize, ConfigError> {
        let custom = self.to_registry()?;
        let count = custom.len();
        registry.merge(custom);
        Ok(count)
    }
}

/// Generator names must be usable as schema identifiers.
fn validate_name(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && TokenKind::keyword(name).is_none();

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidGenerator {
            name: name.to_string(),
            reason: "name is not a usable identifier".to_string(),
        })
    }
}

/// Convert a YAML value to a generated [`Value`], keeping mapping order.
pub fn yaml_to_value(yaml: &YamlValue) -> Result<Value, String> {
    Ok(match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                return Err(format!("unsupported number {n}"));
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => Value::Array(
            items
                .iter()
                .map(yaml_to_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(map) => {
            let mut object = OrderedMap::with_capacity(map.len());
            for (k, v) in map {
                let key = match k {
                    YamlValue::String(s) => s.clone(),
                    YamlValue::Number(n) => n.to_string(),
                    YamlValue::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported mapping key {other:?}")),
                };
                object.set(key, yaml_to_value(v)?);
            }
            Value::Object(object)
        }
        YamlValue::Tagged(tagged) => yaml_to_value(&tagged.value)?,
    })
}
