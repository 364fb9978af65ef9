//! Query pipeline: filter, count, sort, paginate, project
//!
//! The order is fixed. `total` is snapshotted after filtering and before
//! pagination so that `meta.total` and `meta.hasMore` describe the whole
//! filtered set, not the returned page.

use crate::query::clause::Where;
use crate::query::sort::{order_by, OrderSpec};
use crate::record::Record;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Arguments of a `find_many` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindManyArgs {
    pub filter: Where,
    pub order_by: Option<OrderSpec>,
    pub skip: Option<usize>,
    pub take: Option<usize>,
}

impl FindManyArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Where) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order: OrderSpec) -> Self {
        self.order_by = Some(order);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    /// Parse `{"where": {...}, "orderBy": ..., "skip": n, "take": n}`.
    /// Negative `skip` is treated as zero; negative `take` is rejected.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidQuery("query arguments must be an object".to_string()));
        };

        let filter = match map.get("where") {
            Some(w) => Where::from_json(w)?,
            None => Where::new(),
        };
        let order_by = match map.get("orderBy") {
            Some(o) => Some(OrderSpec::from_json(o)?).filter(|o| !o.is_empty()),
            None => None,
        };
        let skip = match map.get("skip") {
            Some(Value::Null) | None => None,
            Some(v) => Some(
                v.as_i64()
                    .ok_or_else(|| Error::InvalidQuery(format!("skip must be an integer, got {}", v)))?
                    .max(0) as usize,
            ),
        };
        let take = match map.get("take") {
            Some(Value::Null) | None => None,
            Some(v) => Some(
                v.as_u64()
                    .ok_or_else(|| Error::InvalidQuery(format!("take must be a non-negative integer, got {}", v)))?
                    as usize,
            ),
        };

        Ok(Self {
            filter,
            order_by,
            skip,
            take,
        })
    }
}

/// Field selection map: only fields mapped to `true` survive projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection(BTreeMap<String, bool>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(|f| (f.into(), true)).collect())
    }

    pub fn set(mut self, field: impl Into<String>, enabled: bool) -> Self {
        self.0.insert(field.into(), enabled);
        self
    }

    pub fn is_enabled(&self, field: &str) -> bool {
        self.0.get(field).copied().unwrap_or(false)
    }

    pub fn enabled_fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter(|(_, on)| **on).map(|(f, _)| f.as_str())
    }
}

/// Keep only the enabled fields of each record. `id` is not implied.
pub fn select<R: Record>(records: &[R], selection: &Selection) -> Result<Vec<Map<String, Value>>> {
    records
        .iter()
        .map(|record| {
            let mut projected = Map::new();
            if let Value::Object(full) = serde_json::to_value(record)? {
                for (key, value) in full {
                    if selection.is_enabled(&key) {
                        projected.insert(key, value);
                    }
                }
            }
            Ok(projected)
        })
        .collect()
}

/// Apply `skip` then `take`.
pub fn paginate<T: Clone>(records: &[T], skip: Option<usize>, take: Option<usize>) -> Vec<T> {
    let start = skip.unwrap_or(0).min(records.len());
    let rest = &records[start..];
    match take {
        Some(n) => rest.iter().take(n).cloned().collect(),
        None => rest.to_vec(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMeta {
    /// Size of the filtered set before pagination
    pub total: usize,
    pub returned: usize,
    /// Only meaningful when `take` was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
    pub skip: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult<T> {
    pub data: Vec<T>,
    pub meta: QueryMeta,
}

impl<T> QueryResult<T> {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Transform each returned item, keeping `meta`
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> QueryResult<U> {
        QueryResult {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

impl<R: Record> QueryResult<R> {
    /// Project the returned page onto a selection
    pub fn project(&self, selection: &Selection) -> Result<QueryResult<Map<String, Value>>> {
        Ok(QueryResult {
            data: select(&self.data, selection)?,
            meta: self.meta.clone(),
        })
    }
}

/// Assemble the result envelope from the pre-pagination total.
pub fn build_result<T>(data: Vec<T>, total: usize, skip: Option<usize>, take: Option<usize>) -> QueryResult<T> {
    let skip = skip.unwrap_or(0);
    let returned = data.len();
    let has_more = take.map(|_| skip + returned < total);
    QueryResult {
        data,
        meta: QueryMeta {
            total,
            returned,
            has_more,
            skip,
            take,
        },
    }
}

/// Runs the `find_many` pipeline over a slice of records.
pub struct QueryBuilder;

impl QueryBuilder {
    /// Records matching `filter`, in input order
    pub fn filter<R: Record>(records: &[R], filter: &Where) -> Vec<R> {
        if filter.is_empty() {
            return records.to_vec();
        }
        records.iter().filter(|r| filter.matches(*r)).cloned().collect()
    }

    pub fn execute<R: Record>(records: &[R], args: &FindManyArgs) -> QueryResult<R> {
        let filtered = Self::filter(records, &args.filter);
        Self::finish(filtered, args.order_by.as_ref(), args.skip, args.take)
    }

    /// Sort and paginate an already-filtered set
    pub fn finish<R: Record>(
        filtered: Vec<R>,
        order: Option<&OrderSpec>,
        skip: Option<usize>,
        take: Option<usize>,
    ) -> QueryResult<R> {
        let total = filtered.len();
        let sorted = match order {
            Some(spec) if !spec.is_empty() => order_by(&filtered, spec),
            _ => filtered,
        };
        let page = paginate(&sorted, skip, take);
        tracing::debug!(total, returned = page.len(), "query executed");
        build_result(page, total, skip, take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_support::{item, Item};
    use serde_json::json;

    fn items() -> Vec<Item> {
        vec![
            item("a", "Natera", Some(94.0), &["Colorectal"]),
            item("b", "Guardant Health", Some(81.0), &["Lung"]),
            item("c", "Natera", Some(88.0), &[]),
            item("d", "Exact Sciences", None, &[]),
        ]
    }

    #[test]
    fn test_paginate_identity() {
        let records = items();
        assert_eq!(paginate(&records, Some(0), Some(records.len())), records);
        assert_eq!(paginate(&records, None, None), records);
    }

    #[test]
    fn test_paginate_bounds() {
        let records = items();
        assert_eq!(paginate(&records, Some(3), None).len(), 1);
        assert_eq!(paginate(&records, Some(10), Some(2)).len(), 0);
        assert_eq!(paginate(&records, Some(1), Some(2))[0].id, "b");
    }

    #[test]
    fn test_build_result_meta() {
        let result = build_result(vec![1, 2], 5, Some(1), Some(2));
        assert_eq!(result.meta.total, 5);
        assert_eq!(result.meta.returned, 2);
        assert_eq!(result.meta.has_more, Some(true));

        let last = build_result(vec![5], 5, Some(4), Some(2));
        assert_eq!(last.meta.has_more, Some(false));

        let unbounded = build_result(vec![1, 2, 3], 3, None, None);
        assert_eq!(unbounded.meta.has_more, None);
        assert_eq!(unbounded.meta.skip, 0);
    }

    #[test]
    fn test_execute_total_is_pre_pagination() {
        let records = items();
        let args = FindManyArgs::new()
            .filter(Where::new().equals("vendor", "Natera"))
            .order_by(OrderSpec::desc("sensitivity"))
            .take(1);
        let result = QueryBuilder::execute(&records, &args);
        assert_eq!(result.meta.total, 2);
        assert_eq!(result.meta.returned, 1);
        assert_eq!(result.meta.has_more, Some(true));
        assert_eq!(result.data[0].id, "a");
    }

    #[test]
    fn test_select_never_adds_id() {
        let records = items();
        let projected = select(&records[..1], &Selection::fields(["vendor"])).unwrap();
        assert_eq!(projected[0].len(), 1);
        assert_eq!(projected[0]["vendor"], json!("Natera"));
        assert!(!projected[0].contains_key("id"));

        let disabled = Selection::fields(["vendor"]).set("id", false);
        let projected = select(&records[..1], &disabled).unwrap();
        assert!(!projected[0].contains_key("id"));
    }

    #[test]
    fn test_result_serialization_shape() {
        let result = build_result(vec!["x"], 1, None, None);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["meta"]["total"], json!(1));
        assert!(value["meta"].get("hasMore").is_none());

        let paged = build_result(vec!["x"], 3, Some(0), Some(1));
        let value = serde_json::to_value(&paged).unwrap();
        assert_eq!(value["meta"]["hasMore"], json!(true));
    }

    #[test]
    fn test_args_from_json() {
        let args = FindManyArgs::from_json(&json!({
            "where": { "vendor": "Natera" },
            "orderBy": { "sensitivity": "desc" },
            "skip": -5,
            "take": 10
        }))
        .unwrap();
        assert_eq!(args.skip, Some(0));
        assert_eq!(args.take, Some(10));
        assert!(args.order_by.is_some());
        assert!(!args.filter.is_empty());

        assert!(FindManyArgs::from_json(&json!({ "take": -1 })).is_err());
        assert!(FindManyArgs::from_json(&json!([])).is_err());
    }
}
