//! Multi-key ordering
//!
//! Missing values always sort last, whichever direction is requested.

use crate::record::{FieldValue, Record};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(Error::InvalidQuery(format!("Unknown sort direction: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered list of sort keys, primary first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderSpec {
    keys: Vec<SortKey>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new().then(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new().then(field, SortDirection::Desc)
    }

    /// Append a lower-priority key
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.keys.push(SortKey {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Parse `"name:asc,vendor:desc"`. A key without a direction is ascending.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut order = Self::new();
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (field, direction) = match part.split_once(':') {
                Some((field, dir)) => (field.trim(), dir.parse()?),
                None => (part, SortDirection::Asc),
            };
            order = order.then(field, direction);
        }
        Ok(order)
    }

    /// Parse `{"field": "asc"}` or `[{"a": "desc"}, {"b": "asc"}]`.
    /// Keys of one object apply in the order they were written.
    pub fn from_json(value: &Value) -> Result<Self> {
        let mut order = Self::new();
        match value {
            Value::Null => {}
            Value::String(s) => order = Self::parse(s)?,
            Value::Object(map) => {
                for (field, dir) in map {
                    order = order.then(field, direction_from_json(dir)?);
                }
            }
            Value::Array(items) => {
                for item in items {
                    order.keys.extend(Self::from_json(item)?.keys);
                }
            }
            other => {
                return Err(Error::InvalidQuery(format!("Invalid orderBy: {}", other)));
            }
        }
        Ok(order)
    }
}

fn direction_from_json(value: &Value) -> Result<SortDirection> {
    match value {
        Value::String(s) => s.parse(),
        other => Err(Error::InvalidQuery(format!("Invalid sort direction: {}", other))),
    }
}

/// Return a sorted copy of `records`. Stable: ties keep input order.
pub fn order_by<R: Record>(records: &[R], spec: &OrderSpec) -> Vec<R> {
    if spec.is_empty() {
        return records.to_vec();
    }

    // Extract each key once per record rather than once per comparison
    let mut keyed: Vec<(Vec<Option<FieldValue>>, &R)> = records
        .iter()
        .map(|r| {
            let values = spec
                .keys
                .iter()
                .map(|k| r.field(&k.field).filter(|v| !v.is_null()))
                .collect();
            (values, r)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        for (i, key) in spec.keys.iter().enumerate() {
            let ordering = compare_values(a[i].as_ref(), b[i].as_ref(), key.direction);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

/// Compare two optional values for one sort key.
pub fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = compare_present(a, b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

fn compare_present(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (FieldValue::Text(x), FieldValue::Text(y)) => locale_compare(x, y),
        _ => locale_compare(&a.to_display_string(), &b.to_display_string()),
    }
}

/// Base letters only: decomposed, combining marks dropped, lowercased.
fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-style ordering. Accents and case are ignored at first; ties go
/// unaccented before accented, then lowercase before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_support::{item, Item};

    fn ids(records: &[Item]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_missing_values_sort_last_in_both_directions() {
        let records = vec![
            item("none", "Natera", None, &[]),
            item("low", "Natera", Some(50.0), &[]),
            item("high", "Natera", Some(90.0), &[]),
        ];

        let asc = order_by(&records, &OrderSpec::asc("sensitivity"));
        assert_eq!(ids(&asc), vec!["low", "high", "none"]);

        let desc = order_by(&records, &OrderSpec::desc("sensitivity"));
        assert_eq!(ids(&desc), vec!["high", "low", "none"]);
    }

    #[test]
    fn test_multi_key_and_stability() {
        let records = vec![
            item("1", "natera", Some(80.0), &[]),
            item("2", "Guardant", Some(80.0), &[]),
            item("3", "Natera", Some(90.0), &[]),
            item("4", "guardant", Some(80.0), &[]),
        ];
        let spec = OrderSpec::asc("vendor").then("sensitivity", SortDirection::Desc);
        let sorted = order_by(&records, &spec);
        assert_eq!(ids(&sorted), vec!["4", "2", "1", "3"]);

        let by_sensitivity = order_by(&records, &OrderSpec::asc("sensitivity"));
        assert_eq!(ids(&by_sensitivity), vec!["1", "2", "4", "3"]);
    }

    #[test]
    fn test_order_by_does_not_mutate() {
        let records = vec![
            item("b", "B", None, &[]),
            item("a", "A", None, &[]),
        ];
        let sorted = order_by(&records, &OrderSpec::asc("vendor"));
        assert_eq!(ids(&records), vec!["b", "a"]);
        assert_eq!(ids(&sorted), vec!["a", "b"]);
        assert_eq!(sorted.len(), records.len());
    }

    #[test]
    fn test_mixed_types_compare_as_strings() {
        let a = FieldValue::Number(10.0);
        let b = FieldValue::from("9");
        assert_eq!(compare_values(Some(&a), Some(&b), SortDirection::Asc), Ordering::Less);
    }

    #[test]
    fn test_parse_order_spec() {
        let spec = OrderSpec::parse("name:desc, vendor").unwrap();
        assert_eq!(spec.keys().len(), 2);
        assert_eq!(spec.keys()[0].direction, SortDirection::Desc);
        assert_eq!(spec.keys()[1].field, "vendor");
        assert!(OrderSpec::parse("name:sideways").is_err());

        let json = serde_json::json!([{ "category": "asc" }, { "name": "desc" }]);
        let spec = OrderSpec::from_json(&json).unwrap();
        assert_eq!(spec.keys()[0].field, "category");
        assert_eq!(spec.keys()[1].direction, SortDirection::Desc);
    }

    #[test]
    fn test_object_order_keeps_written_key_order() {
        let json = serde_json::json!({ "vendor": "asc", "sensitivity": "desc" });
        let spec = OrderSpec::from_json(&json).unwrap();
        let fields: Vec<_> = spec.keys().iter().map(|k| k.field.as_str()).collect();
        assert_eq!(fields, vec!["vendor", "sensitivity"]);

        let records = vec![
            item("1", "Natera", Some(99.0), &[]),
            item("2", "Guardant", Some(50.0), &[]),
        ];
        assert_eq!(ids(&order_by(&records, &spec)), vec!["2", "1"]);
    }

    #[test]
    fn test_locale_compare_folds_accents() {
        let mut names = vec!["Zymo Research", "Épigenomics", "Guardant Health"];
        names.sort_by(|a, b| locale_compare(a, b));
        assert_eq!(names, vec!["Épigenomics", "Guardant Health", "Zymo Research"]);

        assert_eq!(locale_compare("resume", "résumé"), Ordering::Less);
        assert_eq!(locale_compare("Ärzte", "Arzt"), Ordering::Greater);
        assert_eq!(locale_compare("natera", "Natera"), Ordering::Less);
    }
}
