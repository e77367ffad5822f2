//! Output encoders for Sham generated values.
//!
//! Both encoders walk objects in key order, so the first-seen order of a
//! schema's object keys is the order they appear in the output.

pub mod json;
pub mod xml;

pub use json::to_json;
pub use xml::to_xml;

use serde::{Deserialize, Serialize};
use sham_core::Value;
use std::fmt;
use std::str::FromStr;

/// Error type for encoding operations.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// Error serializing JSON
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Serializer produced bytes that are not UTF-8
    #[error("Encoded output is not valid UTF-8: {0}")]
    Utf8(String),

    /// Object key that cannot be an XML element name
    #[error("Invalid XML element name: {0:?}")]
    InvalidXmlName(String),

    #[error("Unknown output format: {0} (expected json or xml)")]
    UnknownFormat(String),
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Xml => write!(f, "xml"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(EncodeError::UnknownFormat(s.to_string())),
        }
    }
}

/// Encode one generated value as a single document.
pub fn encode(value: &Value, format: OutputFormat, pretty: bool) -> Result<String, EncodeError> {
    match format {
        OutputFormat::Json => to_json(value, pretty),
        OutputFormat::Xml => to_xml(value, pretty),
    }
}
