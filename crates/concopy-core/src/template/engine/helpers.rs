//! Helper functions for template rendering

use serde_json::Value;

/// Resolve a dotted key from JSON data
pub(crate) fn resolve_key<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = data;

    for part in key.split('.') {
        current = match current {
            Value::Object(map) => map.get(part)?,
            _ => return None,
        };
    }

    Some(current)
}

/// Stringify a JSON value for template output
///
/// Only scalars have a textual form; null, arrays and objects render empty.
pub(crate) fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Neutralize characters meaningful to HTML markup (`& < > " '`)
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}
