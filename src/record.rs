//! Record abstraction - the query engine's view of an entity
//!
//! Every collection holds one concrete struct type. The query engine never
//! touches those structs directly; it reads fields by name through
//! [`Record::field`], which yields a [`FieldValue`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dynamically typed field value, as seen by operators, sorting and projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Permissive numeric reading.
    ///
    /// Numbers pass through; strings are read like a leading-prefix float
    /// parse (`"95.5%"` is 95.5, `"<0.1"` is not a number). Anything else
    /// is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if !n.is_nan() => Some(*n),
            FieldValue::Text(s) => parse_float_prefix(s),
            _ => None,
        }
    }

    /// String form used by substring operators, `count_by` and `distinct`.
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::Null => "null".to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::to_display_string)
                .collect::<Vec<_>>()
                .join(","),
            FieldValue::Object(_) => "[object]".to_string(),
        }
    }

    /// Strict equality: same variant and same content. Numbers compare as floats.
    pub fn strict_eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::List(a), FieldValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strict_eq(y))
            }
            _ => self == other,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Parse the longest numeric prefix of `s`, ignoring leading whitespace.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Null),
            serde_json::Value::String(s) => FieldValue::Text(s),
            serde_json::Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Object(
                map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for FieldValue {
    fn from(value: &serde_json::Value) -> Self {
        FieldValue::from(value.clone())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Text(s.clone())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<usize> for FieldValue {
    fn from(n: usize) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Convert any serializable value into a field value (used for nested objects).
pub fn to_field_value<T: Serialize>(value: &T) -> Option<FieldValue> {
    serde_json::to_value(value).ok().map(FieldValue::from)
}

/// Text field helper: absent stays absent.
pub fn text(value: &Option<String>) -> Option<FieldValue> {
    value.as_ref().map(FieldValue::from)
}

/// List field helper: string lists are always present, possibly empty.
pub fn text_list(values: &[String]) -> Option<FieldValue> {
    Some(FieldValue::List(values.iter().map(FieldValue::from).collect()))
}

/// An entity stored in a collection.
///
/// Records are immutable after normalization. `id` is unique within its
/// collection; `slug` and `category` feed the adapter's lookup maps.
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Unique identifier within the collection
    fn id(&self) -> &str;

    /// URL-safe identifier, if the record kind has one
    fn slug(&self) -> Option<&str> {
        None
    }

    /// Category tag, if the record kind has one
    fn category(&self) -> Option<&str> {
        None
    }

    /// Read a field by its serialized (camelCase) name
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("95.5%"), Some(95.5));
        assert_eq!(parse_float_prefix("  42"), Some(42.0));
        assert_eq!(parse_float_prefix("-3.5e2 copies"), Some(-350.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("<0.1"), None);
        assert_eq!(parse_float_prefix("n/a"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn test_display_string() {
        assert_eq!(FieldValue::Number(3.0).to_display_string(), "3");
        assert_eq!(FieldValue::Number(2.5).to_display_string(), "2.5");
        assert_eq!(FieldValue::from(vec!["A", "B"]).to_display_string(), "A,B");
        assert_eq!(FieldValue::Bool(true).to_display_string(), "true");
    }

    #[test]
    fn test_from_json() {
        let value = FieldValue::from(serde_json::json!({"a": [1, "x", null]}));
        let FieldValue::Object(map) = value else {
            panic!("expected object");
        };
        assert_eq!(
            map["a"],
            FieldValue::List(vec![
                FieldValue::Number(1.0),
                FieldValue::Text("x".into()),
                FieldValue::Null
            ])
        );
    }

    #[test]
    fn test_strict_eq_is_type_sensitive() {
        assert!(FieldValue::from("1").strict_eq(&FieldValue::from("1")));
        assert!(!FieldValue::from("1").strict_eq(&FieldValue::Number(1.0)));
        assert!(FieldValue::Number(1.0).strict_eq(&FieldValue::Number(1.0)));
    }
}
