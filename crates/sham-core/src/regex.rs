//! Random string generation from regular expressions.
//!
//! A pattern is parsed into a `regex_syntax` HIR once; generation walks the
//! HIR and takes a random path through it:
//!
//! - literals are emitted verbatim
//! - `*` repeats `[0, max_repeat)` times, `+` repeats `[1, max_repeat)` times
//! - `?` emits its operand with probability `optional_probability`
//! - `{m,n}` repeats a uniform count in `[m, n]`; `{m,}` uses `[m, m + max_repeat)`
//! - alternation picks one branch uniformly
//! - a class emits one character drawn uniformly over all of its ranges
//! - captures are transparent
//! - look-around assertions (`^`, `$`, `\b`, ...) are zero-width and emit nothing
//!
//! Backreferences and lookahead/lookbehind are not part of the supported
//! syntax and fail at compile time. A class that matches nothing emits nothing.

use crate::error::ConfigError;
use rand::Rng;
use regex_syntax::hir::{Class, ClassBytesRange, ClassUnicodeRange, Hir, HirKind};
use regex_syntax::ParserBuilder;

/// Default bound for unbounded repetition (`*`, `+`, `{m,}`).
pub const DEFAULT_MAX_REPEAT: u32 = 10;

/// Default probability that an optional (`?`) sub-expression is emitted.
pub const DEFAULT_OPTIONAL_PROBABILITY: f64 = 0.75;

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_END: u32 = 0xDFFF;
const SURROGATE_COUNT: u32 = SURROGATE_END - SURROGATE_START + 1;

/// Knobs that shape the length distribution of generated strings.
///
/// Only obtainable through [`RegexConfig::new`] or `Default`, so every
/// instance handed to [`Regex::compile`] is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegexConfig {
    max_repeat: u32,
    optional_probability: f64,
}

impl Default for RegexConfig {
    fn default() -> Self {
        Self {
            max_repeat: DEFAULT_MAX_REPEAT,
            optional_probability: DEFAULT_OPTIONAL_PROBABILITY,
        }
    }
}

impl RegexConfig {
    /// Build a validated configuration.
    pub fn new(max_repeat: u32, optional_probability: f64) -> Result<Self, ConfigError> {
        let config = Self {
            max_repeat,
            optional_probability,
        };
        config.validate()?;
        Ok(config)
    }

    /// Exclusive upper bound on the repeat count of unbounded quantifiers.
    pub fn max_repeat(&self) -> u32 {
        self.max_repeat
    }

    /// Probability in `[0, 1]` that `?` emits its operand.
    pub fn optional_probability(&self) -> f64 {
        self.optional_probability
    }

    /// `+` needs at least one admissible count, so `max_repeat` must be 2 or more.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_repeat < 2 {
            return Err(ConfigError::MaxRepeatTooSmall(self.max_repeat));
        }
        if !(0.0..=1.0).contains(&self.optional_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.optional_probability));
        }
        Ok(())
    }
}

/// A compiled pattern ready for generation.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    hir: Hir,
    config: RegexConfig,
}

impl Regex {
    /// Parse `pattern` with the default regex-syntax flags.
    pub fn compile(pattern: &str, config: RegexConfig) -> Result<Self, regex_syntax::Error> {
        let hir = ParserBuilder::new().build().parse(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            hir,
            config,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn config(&self) -> RegexConfig {
        self.config
    }

    /// Produce one string drawn from the pattern's language.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut out = String::new();
        self.emit(&self.hir, rng, &mut out);
        out
    }

    fn emit<R: Rng + ?Sized>(&self, hir: &Hir, rng: &mut R, out: &mut String) {
        match hir.kind() {
            HirKind::Empty | HirKind::Look(_) => {}
            HirKind::Literal(lit) => out.push_str(&String::from_utf8_lossy(&lit.0)),
            HirKind::Class(Class::Unicode(class)) => {
                if let Some(c) = sample_unicode(class.ranges(), rng) {
                    out.push(c);
                }
            }
            HirKind::Class(Class::Bytes(class)) => {
                if let Some(b) = sample_bytes(class.ranges(), rng) {
                    out.push(char::from(b));
                }
            }
            HirKind::Repetition(rep) => {
                let count = self.repeat_count(rep.min, rep.max, rng);
                for _ in 0..count {
                    self.emit(&rep.sub, rng, out);
                }
            }
            HirKind::Capture(capture) => self.emit(&capture.sub, rng, out),
            HirKind::Concat(subs) => {
                for sub in subs {
                    self.emit(sub, rng, out);
                }
            }
            HirKind::Alternation(branches) => {
                if !branches.is_empty() {
                    let pick = rng.random_range(0..branches.len());
                    self.emit(&branches[pick], rng, out);
                }
            }
        }
    }

    fn repeat_count<R: Rng + ?Sized>(&self, min: u32, max: Option<u32>, rng: &mut R) -> u32 {
        let max_repeat = self.config.max_repeat;
        match (min, max) {
            (0, Some(1)) => u32::from(rng.random_bool(self.config.optional_probability)),
            (0, None) => rng.random_range(0..max_repeat),
            (1, None) => rng.random_range(1..max_repeat),
            (min, None) => rng.random_range(min..min.saturating_add(max_repeat)),
            (min, Some(max)) => rng.random_range(min..=max),
        }
    }
}

/// Number of Unicode scalar values in `[start, end]`.
fn scalar_count(range: &ClassUnicodeRange) -> u32 {
    let (start, end) = (range.start() as u32, range.end() as u32);
    let count = end - start + 1;
    if start < SURROGATE_START && end > SURROGATE_END {
        count - SURROGATE_COUNT
    } else {
        count
    }
}

fn nth_scalar(range: &ClassUnicodeRange, offset: u32) -> Option<char> {
    let start = range.start() as u32;
    let mut code = start + offset;
    if start < SURROGATE_START && code >= SURROGATE_START {
        code += SURROGATE_COUNT;
    }
    char::from_u32(code)
}

fn sample_unicode<R: Rng + ?Sized>(ranges: &[ClassUnicodeRange], rng: &mut R) -> Option<char> {
    let total: u32 = ranges.iter().map(scalar_count).sum();
    if total == 0 {
        return None;
    }

    let mut pick = rng.random_range(0..total);
    for range in ranges {
        let count = scalar_count(range);
        if pick < count {
            return nth_scalar(range, pick);
        }
        pick -= count;
    }
    None
}

fn sample_bytes<R: Rng + ?Sized>(ranges: &[ClassBytesRange], rng: &mut R) -> Option<u8> {
    let total: u32 = ranges
        .iter()
        .map(|r| u32::from(r.end()) - u32::from(r.start()) + 1)
        .sum();
    if total == 0 {
        return None;
    }

    let mut pick = rng.random_range(0..total);
    for range in ranges {
        let count = u32::from(range.end()) - u32::from(range.start()) + 1;
        if pick < count {
            return u8::try_from(u32::from(range.start()) + pick).ok();
        }
        pick -= count;
    }
    None
}
