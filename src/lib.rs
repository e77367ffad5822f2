//! Sham Library
//!
//! Generate random structured data from schemas written in the Sham language.
//!
//! # Crates
//!
//! - `sham_core` - scanner, parser, AST, regex string generator and value tree
//! - `sham_generators` - built-in terminal generators and YAML-declared ones
//! - `sham_encode` - JSON and XML output
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let schema = sham::parser()
//!     .parse(r#"{"name": name, "age": (18, 65), "tags": [(2), /[a-z]{5}/]}"#)
//!     .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let value = schema.generate(&mut rng).unwrap();
//! println!("{}", sham::encode(&value, sham::OutputFormat::Json, true).unwrap());
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # One JSON document
//! sham '{"id": uuid, "email": email}'
//!
//! # Ten XML documents, schema from stdin, reproducible
//! echo '{"user": {"name": name}}' | sham -f xml -n 10 --seed 7
//!
//! # Custom generators
//! sham --generators generators.yaml '{"status": status}'
//! ```

use anyhow::Context;
use clap::Parser as ClapParser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing::{debug, info};

pub use sham_core::regex::{DEFAULT_MAX_REPEAT, DEFAULT_OPTIONAL_PROBABILITY};
pub use sham_core::{
    ast, Error, GeneratorError, Node, OrderedMap, ParseError, Parser, RegexConfig, Registry,
    Schema, TerminalGenerator, Value,
};
pub use sham_encode::{encode, EncodeError, OutputFormat};
pub use sham_generators::{default_registry, GeneratorFile};

/// Parser preloaded with the default terminal generators.
pub fn parser() -> Parser {
    Parser::new(default_registry())
}

/// Parse `source` with the default generators and generate one value from OS entropy.
///
/// Parse once with [`parser`] instead when generating repeatedly.
pub fn generate(source: &str) -> Result<Value, Error> {
    let mut rng = StdRng::from_os_rng();
    generate_with_rng(source, &mut rng)
}

/// Like [`generate`], drawing from the given random source.
pub fn generate_with_rng<R: Rng>(source: &str, rng: &mut R) -> Result<Value, Error> {
    sham_core::generate(source, default_registry(), rng)
}

/// Generation options shared by the CLI.
#[derive(ClapParser, Clone, Debug)]
pub struct GenerateOpts {
    /// Seed for reproducible output (random when omitted)
    #[arg(long, env = "SHAM_SEED")]
    pub seed: Option<u64>,

    /// YAML file declaring custom generators
    #[arg(long, env = "SHAM_GENERATORS", value_name = "PATH")]
    pub generators: Option<PathBuf>,

    /// Upper bound (exclusive) for unbounded regex repetition
    #[arg(long, env = "SHAM_MAX_REPEAT", default_value_t = DEFAULT_MAX_REPEAT)]
    pub max_repeat: u32,

    /// Probability that an optional regex element (`?`) is emitted
    #[arg(
        long,
        env = "SHAM_OPTIONAL_PROBABILITY",
        default_value_t = DEFAULT_OPTIONAL_PROBABILITY
    )]
    pub optional_probability: f64,
}

impl Default for GenerateOpts {
    fn default() -> Self {
        Self {
            seed: None,
            generators: None,
            max_repeat: DEFAULT_MAX_REPEAT,
            optional_probability: DEFAULT_OPTIONAL_PROBABILITY,
        }
    }
}

impl GenerateOpts {
    /// Build a parser with the default generators, any custom generators and
    /// the configured regex bounds.
    pub fn build_parser(&self) -> anyhow::Result<Parser> {
        let mut registry = default_registry();

        if let Some(path) = &self.generators {
            let file = GeneratorFile::from_file(path)
                .with_context(|| format!("Failed to load generators from {path:?}"))?;
            let count = file
                .register_into(&mut registry)
                .with_context(|| format!("Invalid generators in {path:?}"))?;
            info!("Registered {count} custom generators from {path:?}");
        }

        let regex_config = RegexConfig::new(self.max_repeat, self.optional_probability)
            .context("Invalid regex generation settings")?;

        Ok(Parser::new(registry).with_regex_config(regex_config)?)
    }

    /// Seeded RNG when a seed was given, otherwise seeded from OS entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => {
                debug!("Using seed {seed}");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        }
    }
}
