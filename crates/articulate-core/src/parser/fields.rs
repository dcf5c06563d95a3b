//! Lenient field access over untyped JSON
//!
//! Every accessor is total: a missing key, a `null`, or a value of the wrong
//! type yields the empty default instead of an error.

use serde_json::Value;

use crate::Conjunction;

/// String field; numbers are rendered in their JSON form, anything else is empty.
pub fn string(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// String field, `None` when absent or not textual
pub fn opt_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Uppercased string field, used for node type tags
pub fn tag(value: &Value, key: &str) -> String {
    string(value, key).to_uppercase()
}

/// Array field, or an empty slice
pub fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Array of strings; non-string entries are skipped
pub fn strings(value: &Value, key: &str) -> Vec<String> {
    array(value, key)
        .iter()
        .filter_map(|v| v.as_str().map(str::to_owned))
        .collect()
}

/// Integer field; accepts JSON integers, floats (truncated) and numeric strings.
pub fn integer(value: &Value, key: &str) -> Option<i64> {
    match value.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Float field; accepts JSON numbers and numeric strings.
pub fn float(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Conjunction field.
///
/// `None` when the value is absent or falsy (`null`, `""`, `false`, `0`);
/// otherwise `AND` in any case is `And` and every other value is `Or`.
pub fn conjunction(value: &Value, key: &str) -> Option<Conjunction> {
    value.get(key).and_then(conjunction_value)
}

/// Per-edge conjunction list; `None` unless `key` holds an array.
///
/// Entries that carry no conjunction are read as `Or`.
pub fn conjunction_list(value: &Value, key: &str) -> Option<Vec<Conjunction>> {
    let entries = value.get(key)?.as_array()?;
    Some(
        entries
            .iter()
            .map(|entry| conjunction_value(entry).unwrap_or(Conjunction::Or))
            .collect(),
    )
}

fn conjunction_value(value: &Value) -> Option<Conjunction> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(Conjunction::from_token(s)),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        _ => Some(Conjunction::Or),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_defaults() {
        let v = json!({"a": "x", "b": 42, "c": null, "d": [1]});
        assert_eq!(string(&v, "a"), "x");
        assert_eq!(string(&v, "b"), "42");
        assert_eq!(string(&v, "c"), "");
        assert_eq!(string(&v, "d"), "");
        assert_eq!(string(&v, "missing"), "");
        assert_eq!(string(&Value::Null, "a"), "");
    }

    #[test]
    fn test_array_defaults() {
        let v = json!({"items": [1, 2], "bad": "nope"});
        assert_eq!(array(&v, "items").len(), 2);
        assert!(array(&v, "bad").is_empty());
        assert!(array(&json!("scalar"), "items").is_empty());
    }

    #[test]
    fn test_strings_skip_non_strings() {
        let v = json!({"notes": ["a", 1, null, "b"]});
        assert_eq!(strings(&v, "notes"), vec!["a", "b"]);
        assert!(strings(&json!({"notes": "a"}), "notes").is_empty());
    }

    #[test]
    fn test_conjunction_presence() {
        assert_eq!(conjunction(&json!({"c": "AND"}), "c"), Some(Conjunction::And));
        assert_eq!(conjunction(&json!({"c": "and"}), "c"), Some(Conjunction::And));
        assert_eq!(conjunction(&json!({"c": "Or"}), "c"), Some(Conjunction::Or));
        assert_eq!(conjunction(&json!({"c": "xor"}), "c"), Some(Conjunction::Or));
        assert_eq!(conjunction(&json!({"c": ""}), "c"), None);
        assert_eq!(conjunction(&json!({"c": null}), "c"), None);
        assert_eq!(conjunction(&json!({}), "c"), None);
    }

    #[test]
    fn test_conjunction_list() {
        let v = json!({"cs": ["AND", null, "or"]});
        assert_eq!(
            conjunction_list(&v, "cs"),
            Some(vec![Conjunction::And, Conjunction::Or, Conjunction::Or])
        );
        assert_eq!(conjunction_list(&json!({"cs": "AND"}), "cs"), None);
    }

    #[test]
    fn test_numeric_fields() {
        let v = json!({"p": 3, "q": "7", "r": 2.5, "s": "x"});
        assert_eq!(integer(&v, "p"), Some(3));
        assert_eq!(integer(&v, "q"), Some(7));
        assert_eq!(integer(&v, "r"), Some(2));
        assert_eq!(integer(&v, "s"), None);
        assert_eq!(float(&v, "r"), Some(2.5));
        assert_eq!(float(&v, "q"), Some(7.0));
    }
}
