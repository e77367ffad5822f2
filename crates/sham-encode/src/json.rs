//! JSON encoding.

use crate::EncodeError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use sham_core::Value;

const INDENT: &[u8] = b"    ";

/// Encode `value` as JSON, indenting four spaces per level when `pretty`.
pub fn to_json(value: &Value, pretty: bool) -> Result<String, EncodeError> {
    if !pretty {
        return Ok(serde_json::to_string(value)?);
    }

    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;

    String::from_utf8(out).map_err(|e| EncodeError::Utf8(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sham_core::OrderedMap;

    fn sample() -> Value {
        let mut inner = OrderedMap::new();
        inner.set("z", Value::Null);
        let mut map = OrderedMap::new();
        map.set("b", Value::Int(1));
        map.set("a", Value::Array(vec![Value::Bool(true), Value::Float(0.5)]));
        map.set("c", Value::Object(inner));
        Value::Object(map)
    }

    #[test]
    fn test_compact_keeps_key_order() {
        assert_eq!(
            to_json(&sample(), false).unwrap(),
            r#"{"b":1,"a":[true,0.5],"c":{"z":null}}"#
        );
    }

    #[test]
    fn test_pretty_uses_four_spaces() {
        let expected = "{\n    \"b\": 1,\n    \"a\": [\n        true,\n        0.5\n    ],\n    \"c\": {\n        \"z\": null\n    }\n}";
        assert_eq!(to_json(&sample(), true).unwrap(), expected);
    }

    #[test]
    fn test_scalar_roots() {
        assert_eq!(to_json(&Value::from("hi \"x\""), false).unwrap(), r#""hi \"x\"""#);
        assert_eq!(to_json(&Value::Null, true).unwrap(), "null");
        assert_eq!(to_json(&Value::Array(vec![]), false).unwrap(), "[]");
    }
}
