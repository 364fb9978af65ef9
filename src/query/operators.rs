//! Leaf predicates of the where-clause language
//!
//! Every operator is total: absent fields, wrong shapes and unparseable
//! numbers resolve to `false` rather than an error.

use crate::record::{parse_float_prefix, FieldValue};

#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Strict equality; `Equals(Null)` also matches an absent field
    Equals(FieldValue),
    /// Negated `Equals`
    Not(FieldValue),
    /// Field value is one of the targets
    In(Vec<FieldValue>),
    /// Field value is none of the targets
    NotIn(Vec<FieldValue>),
    /// Case-insensitive substring
    Contains(String),
    /// Case-insensitive prefix
    StartsWith(String),
    /// Case-insensitive suffix
    EndsWith(String),
    Gt(f64),
    Gte(f64),
    Lt(f64),
    Lte(f64),
    /// List field holds the value
    Has(FieldValue),
    /// List field holds at least one of the values
    HasAny(Vec<FieldValue>),
    /// List field holds every value
    HasAll(Vec<FieldValue>),
    /// Some list element contains the target (substring for text, equality otherwise)
    ArrayContains(FieldValue),
    /// `IsNull(true)`: absent or null. `IsNull(false)`: present and non-null
    IsNull(bool),
}

impl Operator {
    /// Operator name in the JSON where-clause syntax
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Equals(_) => "equals",
            Operator::Not(_) => "not",
            Operator::In(_) => "in",
            Operator::NotIn(_) => "notIn",
            Operator::Contains(_) => "contains",
            Operator::StartsWith(_) => "startsWith",
            Operator::EndsWith(_) => "endsWith",
            Operator::Gt(_) => "gt",
            Operator::Gte(_) => "gte",
            Operator::Lt(_) => "lt",
            Operator::Lte(_) => "lte",
            Operator::Has(_) => "has",
            Operator::HasAny(_) => "hasAny",
            Operator::HasAll(_) => "hasAll",
            Operator::ArrayContains(_) => "arrayContains",
            Operator::IsNull(_) => "isNull",
        }
    }

    /// Build an operator from its JSON name and target.
    ///
    /// Returns `None` for an unknown name. Targets are coerced rather than
    /// rejected: a scalar where a list is expected becomes a one-element list,
    /// a non-numeric range bound never matches.
    pub fn from_json(name: &str, target: &serde_json::Value) -> Option<Operator> {
        let value = FieldValue::from(target);
        let op = match name {
            "equals" => Operator::Equals(value),
            "not" => Operator::Not(value),
            "in" => Operator::In(into_list(value)),
            "notIn" => Operator::NotIn(into_list(value)),
            "contains" => Operator::Contains(value.to_display_string()),
            "startsWith" => Operator::StartsWith(value.to_display_string()),
            "endsWith" => Operator::EndsWith(value.to_display_string()),
            "gt" => Operator::Gt(bound(&value)),
            "gte" => Operator::Gte(bound(&value)),
            "lt" => Operator::Lt(bound(&value)),
            "lte" => Operator::Lte(bound(&value)),
            "has" => Operator::Has(value),
            "hasAny" | "hasSome" => Operator::HasAny(into_list(value)),
            "hasAll" | "hasEvery" => Operator::HasAll(into_list(value)),
            "arrayContains" => Operator::ArrayContains(value),
            "isNull" => Operator::IsNull(!matches!(value, FieldValue::Bool(false))),
            "isNotNull" => Operator::IsNull(matches!(value, FieldValue::Bool(false))),
            _ => return None,
        };
        Some(op)
    }

    /// Evaluate against a field value (`None` when the record lacks the field).
    pub fn matches(&self, field: Option<&FieldValue>) -> bool {
        let present = field.filter(|v| !v.is_null());
        match self {
            Operator::Equals(target) => equals(field, target),
            Operator::Not(target) => !equals(field, target),
            Operator::In(targets) => targets.iter().any(|t| equals(field, t)),
            Operator::NotIn(targets) => !targets.iter().any(|t| equals(field, t)),
            Operator::Contains(needle) => {
                text_test(present, needle, |hay, needle| hay.contains(needle))
            }
            Operator::StartsWith(needle) => {
                text_test(present, needle, |hay, needle| hay.starts_with(needle))
            }
            Operator::EndsWith(needle) => {
                text_test(present, needle, |hay, needle| hay.ends_with(needle))
            }
            Operator::Gt(bound) => numeric_test(present, |n| n > *bound),
            Operator::Gte(bound) => numeric_test(present, |n| n >= *bound),
            Operator::Lt(bound) => numeric_test(present, |n| n < *bound),
            Operator::Lte(bound) => numeric_test(present, |n| n <= *bound),
            Operator::Has(target) => {
                list_of(present).is_some_and(|items| items.iter().any(|i| i.strict_eq(target)))
            }
            Operator::HasAny(targets) => list_of(present).is_some_and(|items| {
                targets.iter().any(|t| items.iter().any(|i| i.strict_eq(t)))
            }),
            Operator::HasAll(targets) => list_of(present).is_some_and(|items| {
                targets.iter().all(|t| items.iter().any(|i| i.strict_eq(t)))
            }),
            Operator::ArrayContains(target) => {
                list_of(present).is_some_and(|items| array_contains(items, target))
            }
            Operator::IsNull(want_null) => present.is_none() == *want_null,
        }
    }
}

fn into_list(value: FieldValue) -> Vec<FieldValue> {
    match value {
        FieldValue::List(items) => items,
        other => vec![other],
    }
}

fn bound(value: &FieldValue) -> f64 {
    value.as_f64().unwrap_or(f64::NAN)
}

fn equals(field: Option<&FieldValue>, target: &FieldValue) -> bool {
    match field {
        Some(value) => value.strict_eq(target),
        None => target.is_null(),
    }
}

fn text_test(field: Option<&FieldValue>, needle: &str, test: impl Fn(&str, &str) -> bool) -> bool {
    match field {
        Some(value) => test(
            &value.to_display_string().to_lowercase(),
            &needle.to_lowercase(),
        ),
        None => false,
    }
}

fn numeric_test(field: Option<&FieldValue>, test: impl Fn(f64) -> bool) -> bool {
    let parsed = match field {
        Some(FieldValue::Number(n)) => Some(*n),
        Some(FieldValue::Text(s)) => parse_float_prefix(s),
        _ => None,
    };
    // NaN bounds and NaN values fail every comparison
    parsed.is_some_and(test)
}

fn list_of(field: Option<&FieldValue>) -> Option<&[FieldValue]> {
    field.and_then(FieldValue::as_list)
}

fn array_contains(items: &[FieldValue], target: &FieldValue) -> bool {
    match target {
        FieldValue::Text(needle) => {
            let needle = needle.to_lowercase();
            items.iter().any(|item| {
                item.as_str()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
        }
        other => items.iter().any(|item| item.strict_eq(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> FieldValue {
        FieldValue::from(s)
    }

    fn list(items: &[&str]) -> FieldValue {
        FieldValue::from(items.to_vec())
    }

    #[test]
    fn test_equals_and_not() {
        let op = Operator::Equals(text("Natera"));
        assert!(op.matches(Some(&text("Natera"))));
        assert!(!op.matches(Some(&text("natera"))));
        assert!(!op.matches(None));

        assert!(Operator::Equals(FieldValue::Null).matches(None));
        assert!(Operator::Not(text("x")).matches(None));
        assert!(!Operator::Not(text("x")).matches(Some(&text("x"))));
    }

    #[test]
    fn test_in_and_not_in() {
        let op = Operator::In(vec![text("MRD"), text("ECD")]);
        assert!(op.matches(Some(&text("ECD"))));
        assert!(!op.matches(Some(&text("CGP"))));
        assert!(!op.matches(None));
        assert!(Operator::NotIn(vec![text("MRD")]).matches(Some(&text("CGP"))));
    }

    #[test]
    fn test_substring_operators_are_null_safe() {
        let value = text("Guardant Health");
        assert!(Operator::Contains("health".into()).matches(Some(&value)));
        assert!(Operator::StartsWith("GUARD".into()).matches(Some(&value)));
        assert!(Operator::EndsWith("Health".into()).matches(Some(&value)));
        assert!(!Operator::Contains("natera".into()).matches(Some(&value)));

        assert!(!Operator::Contains("x".into()).matches(None));
        assert!(!Operator::StartsWith("x".into()).matches(Some(&FieldValue::Null)));
        assert!(!Operator::EndsWith("x".into()).matches(None));
    }

    #[test]
    fn test_numeric_operators_parse_permissively() {
        assert!(Operator::Gt(90.0).matches(Some(&text("94.5%"))));
        assert!(Operator::Gte(94.5).matches(Some(&FieldValue::Number(94.5))));
        assert!(Operator::Lt(1.0).matches(Some(&text("0.01"))));
        assert!(Operator::Lte(10.0).matches(Some(&FieldValue::Number(10.0))));

        assert!(!Operator::Gt(0.0).matches(Some(&text("not reported"))));
        assert!(!Operator::Gt(0.0).matches(None));
        assert!(!Operator::Gt(0.0).matches(Some(&FieldValue::Bool(true))));
        assert!(!Operator::Gt(f64::NAN).matches(Some(&FieldValue::Number(5.0))));
    }

    #[test]
    fn test_array_operators_require_lists() {
        let types = list(&["Colorectal", "Breast"]);
        assert!(Operator::Has(text("Breast")).matches(Some(&types)));
        assert!(Operator::HasAny(vec![text("Lung"), text("Breast")]).matches(Some(&types)));
        assert!(!Operator::HasAll(vec![text("Lung"), text("Breast")]).matches(Some(&types)));
        assert!(Operator::HasAll(vec![text("Colorectal"), text("Breast")]).matches(Some(&types)));

        assert!(!Operator::HasAny(vec![text("Breast")]).matches(Some(&text("Breast"))));
        assert!(!Operator::ArrayContains(text("breast")).matches(Some(&text("Breast"))));
        assert!(!Operator::HasAll(vec![]).matches(None));
    }

    #[test]
    fn test_array_contains() {
        let types = list(&["Colorectal", "Multi-cancer"]);
        assert!(Operator::ArrayContains(text("colo")).matches(Some(&types)));
        assert!(Operator::ArrayContains(text("CANCER")).matches(Some(&types)));
        assert!(!Operator::ArrayContains(text("lung")).matches(Some(&types)));

        let numbers = FieldValue::from(vec![1.0, 2.0]);
        assert!(Operator::ArrayContains(FieldValue::Number(2.0)).matches(Some(&numbers)));
        assert!(!Operator::ArrayContains(FieldValue::Number(3.0)).matches(Some(&numbers)));
    }

    #[test]
    fn test_is_null() {
        assert!(Operator::IsNull(true).matches(None));
        assert!(Operator::IsNull(true).matches(Some(&FieldValue::Null)));
        assert!(!Operator::IsNull(true).matches(Some(&text("x"))));
        assert!(Operator::IsNull(false).matches(Some(&text("x"))));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(
            Operator::from_json("in", &json!("MRD")),
            Some(Operator::In(vec![text("MRD")]))
        );
        assert_eq!(Operator::from_json("gt", &json!(5)), Some(Operator::Gt(5.0)));
        assert_eq!(
            Operator::from_json("isNotNull", &json!(true)),
            Some(Operator::IsNull(false))
        );
        assert_eq!(Operator::from_json("fuzzy", &json!("x")), None);

        let Some(Operator::Gt(bound)) = Operator::from_json("gt", &json!("abc")) else {
            panic!("expected gt");
        };
        assert!(bound.is_nan());
    }
}
