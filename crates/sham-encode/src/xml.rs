//! XML encoding.
//!
//! Mapping from the value tree:
//!
//! ```text
//! {"user": {"name": "Ann", "tags": ["a", "b"], "age": null}}
//!
//! <user><name>Ann</name><tags>a</tags><tags>b</tags><age/></user>
//! ```
//!
//! - an object root emits its members with no wrapper element
//! - any other root is wrapped in `<value>`
//! - arrays repeat the enclosing element once per item; nested arrays flatten
//! - null and empty objects become self-closing elements

use crate::EncodeError;
use sham_core::Value;

const ROOT_ELEMENT: &str = "value";
const INDENT: &str = "    ";

/// Encode `value` as XML, one element per line when `pretty`.
pub fn to_xml(value: &Value, pretty: bool) -> Result<String, EncodeError> {
    let mut writer = XmlWriter::new(pretty);

    match value {
        Value::Object(map) => {
            for (key, item) in map.iter() {
                writer.element(key, item, 0)?;
            }
        }
        other => writer.element(ROOT_ELEMENT, other, 0)?,
    }

    Ok(writer.finish())
}

struct XmlWriter {
    out: String,
    pretty: bool,
}

impl XmlWriter {
    fn new(pretty: bool) -> Self {
        Self {
            out: String::new(),
            pretty,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn start_line(&mut self, depth: usize) {
        if !self.pretty {
            return;
        }
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    fn element(&mut self, name: &str, value: &Value, depth: usize) -> Result<(), EncodeError> {
        if !is_valid_name(name) {
            return Err(EncodeError::InvalidXmlName(name.to_string()));
        }

        match value {
            Value::Array(items) => {
                for item in items {
                    self.element(name, item, depth)?;
                }
            }
            Value::Null => {
                self.start_line(depth);
                self.out.push_str(&format!("<{name}/>"));
            }
            Value::Object(map) if map.is_empty() => {
                self.start_line(depth);
                self.out.push_str(&format!("<{name}/>"));
            }
            Value::Object(map) => {
                self.start_line(depth);
                self.out.push_str(&format!("<{name}>"));
                for (key, item) in map.iter() {
                    self.element(key, item, depth + 1)?;
                }
                self.start_line(depth);
                self.out.push_str(&format!("</{name}>"));
            }
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
                self.start_line(depth);
                self.out.push_str(&format!("<{name}>"));
                escape_into(&mut self.out, &value.to_string());
                self.out.push_str(&format!("</{name}>"));
            }
        }

        Ok(())
    }
}

/// Element names: a letter or `_` first, then letters, digits, `-`, `.` or `_`.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}
