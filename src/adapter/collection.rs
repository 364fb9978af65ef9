//! Typed record storage with lookup indices
//!
//! A [`Collection`] owns one record type. The indices hold positions into
//! the record vector, so lookups never clone until a hit is returned.

use crate::query::sort::locale_compare;
use crate::query::{FindManyArgs, QueryBuilder, QueryResult, Selection, Where};
use crate::record::{FieldValue, Record};
use crate::Result;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Point-lookup indices, built in one pass over a collection.
#[derive(Debug, Default)]
pub struct LookupMaps {
    /// Record id → position; first occurrence wins
    by_id: HashMap<String, usize>,
    /// Slug → positions, in insertion order
    by_slug: HashMap<String, Vec<usize>>,
    /// Slug → category → position
    by_slug_and_category: HashMap<String, HashMap<String, usize>>,
}

impl LookupMaps {
    pub fn build<R: Record>(collection: &str, records: &[R]) -> Self {
        let mut maps = Self::default();

        for (pos, record) in records.iter().enumerate() {
            let id = record.id();
            if maps.by_id.contains_key(id) {
                tracing::warn!("Duplicate id '{}' in {}; keeping first occurrence", id, collection);
            } else {
                maps.by_id.insert(id.to_string(), pos);
            }

            let Some(slug) = record.slug() else {
                continue;
            };
            maps.by_slug.entry(slug.to_string()).or_default().push(pos);

            if let Some(category) = record.category() {
                maps.by_slug_and_category
                    .entry(slug.to_string())
                    .or_default()
                    .entry(category.to_string())
                    .or_insert(pos);
            }
        }

        tracing::debug!(
            "Indexed {}: {} ids, {} slugs",
            collection,
            maps.by_id.len(),
            maps.by_slug.len()
        );
        maps
    }

    pub fn id(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn slug(&self, slug: &str) -> &[usize] {
        self.by_slug.get(slug).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn slug_in_category(&self, slug: &str, category: &str) -> Option<usize> {
        self.by_slug_and_category
            .get(slug)
            .and_then(|by_category| by_category.get(category))
            .copied()
    }
}

/// One named collection of a single record type.
#[derive(Debug)]
pub struct Collection<R> {
    records: Arc<Vec<R>>,
    maps: LookupMaps,
}

impl<R: Record> Collection<R> {
    pub fn new(name: &str, records: Vec<R>) -> Self {
        let maps = LookupMaps::build(name, &records);
        Self {
            records: Arc::new(records),
            maps,
        }
    }

    pub fn records(&self) -> &Arc<Vec<R>> {
        &self.records
    }

    pub fn maps(&self) -> &LookupMaps {
        &self.maps
    }

    pub fn by_id(&self, id: &str) -> Option<&R> {
        self.maps.id(id).map(|pos| &self.records[pos])
    }

    /// Without a category, the first record carrying the slug.
    pub fn by_slug(&self, slug: &str, category: Option<&str>) -> Option<&R> {
        let pos = match category {
            Some(category) => self.maps.slug_in_category(slug, category),
            None => self.maps.slug(slug).first().copied(),
        };
        pos.map(|pos| &self.records[pos])
    }

    pub fn first(&self, filter: &Where) -> Option<&R> {
        self.records.iter().find(|r| filter.matches(*r))
    }

    fn filtered(&self, filter: &Where) -> impl Iterator<Item = &R> {
        self.records.iter().filter(move |r| filter.matches(*r))
    }
}

/// Type-erased view of a collection. Operations that never hand out a
/// record live here, so callers need not know the record type.
pub(crate) trait ErasedCollection: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn record_type(&self) -> &'static str;

    fn len(&self) -> usize;

    fn count(&self, filter: &Where) -> usize;

    fn distinct(&self, field: &str, filter: &Where) -> Vec<String>;

    fn count_by(&self, field: &str, filter: &Where) -> BTreeMap<String, usize>;

    fn find_many_selected(
        &self,
        args: &FindManyArgs,
        selection: &Selection,
    ) -> Result<QueryResult<Map<String, Value>>>;

    fn find_many_json(&self, args: &FindManyArgs) -> Result<QueryResult<Value>>;

    fn find_by_id_json(&self, id: &str) -> Result<Option<Value>>;
}

impl<R: Record> ErasedCollection for Collection<R> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn record_type(&self) -> &'static str {
        std::any::type_name::<R>()
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn count(&self, filter: &Where) -> usize {
        if filter.is_empty() {
            return self.records.len();
        }
        self.filtered(filter).count()
    }

    fn distinct(&self, field: &str, filter: &Where) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for record in self.filtered(filter) {
            let Some(value) = record.field(field) else {
                continue;
            };
            let scalars = match value {
                FieldValue::List(items) => items,
                other => vec![other],
            };
            for scalar in scalars.into_iter().filter(|v| !v.is_null()) {
                let key = scalar.to_display_string();
                if seen.insert(key.clone()) {
                    values.push(key);
                }
            }
        }
        values.sort_by(|a, b| locale_compare(a, b));
        values
    }

    fn count_by(&self, field: &str, filter: &Where) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in self.filtered(filter) {
            match record.field(field) {
                Some(value) if !value.is_null() => {
                    *counts.entry(value.to_display_string()).or_insert(0) += 1;
                }
                _ => {}
            }
        }
        counts
    }

    fn find_many_selected(
        &self,
        args: &FindManyArgs,
        selection: &Selection,
    ) -> Result<QueryResult<Map<String, Value>>> {
        QueryBuilder::execute(&self.records, args).project(selection)
    }

    fn find_many_json(&self, args: &FindManyArgs) -> Result<QueryResult<Value>> {
        let result = QueryBuilder::execute(&self.records, args);
        let data = result
            .data
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(QueryResult {
            data,
            meta: result.meta,
        })
    }

    fn find_by_id_json(&self, id: &str) -> Result<Option<Value>> {
        Ok(self.by_id(id).map(serde_json::to_value).transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::test_support::{item, Item};
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    struct Slugged {
        id: String,
        slug: String,
        category: String,
    }

    impl Record for Slugged {
        fn id(&self) -> &str {
            &self.id
        }

        fn slug(&self) -> Option<&str> {
            Some(&self.slug)
        }

        fn category(&self) -> Option<&str> {
            Some(&self.category)
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(FieldValue::from(&self.id)),
                "slug" => Some(FieldValue::from(&self.slug)),
                "category" => Some(FieldValue::from(&self.category)),
                _ => None,
            }
        }
    }

    fn slugged(id: &str, slug: &str, category: &str) -> Slugged {
        Slugged {
            id: id.to_string(),
            slug: slug.to_string(),
            category: category.to_string(),
        }
    }

    fn slugged_records() -> Vec<Slugged> {
        vec![
            slugged("mrd-1", "signatera", "MRD"),
            slugged("trm-1", "signatera", "TRM"),
            slugged("ecd-1", "shield", "ECD"),
            slugged("mrd-1", "duplicate", "MRD"),
        ]
    }

    #[test]
    fn test_lookups_agree_with_linear_scan() {
        let records = slugged_records();
        let collection = Collection::new("tests", records.clone());

        for id in ["mrd-1", "trm-1", "ecd-1", "missing"] {
            let scanned = records.iter().find(|r| r.id == id).map(|r| r.slug.clone());
            let indexed = collection.by_id(id).map(|r| r.slug.clone());
            assert_eq!(indexed, scanned, "id {}", id);
        }

        for slug in ["signatera", "shield", "duplicate", "missing"] {
            let scanned = records.iter().find(|r| r.slug == slug).map(|r| r.id.clone());
            let indexed = collection.by_slug(slug, None).map(|r| r.id.clone());
            assert_eq!(indexed, scanned, "slug {}", slug);

            for category in ["MRD", "TRM", "ECD"] {
                let scanned = records
                    .iter()
                    .find(|r| r.slug == slug && r.category == category)
                    .map(|r| r.id.clone());
                let indexed = collection.by_slug(slug, Some(category)).map(|r| r.id.clone());
                assert_eq!(indexed, scanned, "slug {} in {}", slug, category);
            }
        }
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let collection = Collection::new("tests", slugged_records());
        assert_eq!(collection.by_id("mrd-1").unwrap().slug, "signatera");
        assert_eq!(collection.maps().slug("signatera").to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_distinct_flattens_lists() {
        let collection = Collection::new(
            "items",
            vec![
                item("1", "V", None, &["A", "B"]),
                item("2", "V", None, &["B", "C"]),
            ],
        );
        assert_eq!(collection.distinct("cancerTypes", &Where::new()), vec!["A", "B", "C"]);
        assert_eq!(collection.distinct("vendor", &Where::new()), vec!["V"]);
        assert!(collection.distinct("missing", &Where::new()).is_empty());
    }

    #[test]
    fn test_count_by_ignores_absent() {
        let records: Vec<Item> = vec![
            item("1", "Natera", Some(90.0), &[]),
            item("2", "Natera", None, &[]),
            item("3", "Guardant", Some(90.0), &[]),
        ];
        let collection = Collection::new("items", records);

        let by_vendor = collection.count_by("vendor", &Where::new());
        assert_eq!(by_vendor.get("Natera"), Some(&2));
        assert_eq!(by_vendor.get("Guardant"), Some(&1));

        let by_sensitivity = collection.count_by("sensitivity", &Where::new());
        assert_eq!(by_sensitivity.len(), 1);
        assert_eq!(by_sensitivity.get("90"), Some(&2));

        let filtered = collection.count(&Where::new().equals("vendor", "Natera"));
        assert_eq!(filtered, 2);
    }
}
