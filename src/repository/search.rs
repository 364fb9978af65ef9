//! Full-text search shared by the repositories
//!
//! A record matches when any configured field contains the query,
//! case-insensitively. List fields match per element. The optional
//! where-clause narrows the set first; totals are taken before pagination.

use crate::adapter::DataAdapter;
use crate::query::{FindManyArgs, OrderSpec, QueryBuilder, QueryResult, Where};
use crate::record::{FieldValue, Record};
use crate::Result;

/// Default searchable fields of the test collection.
pub const DEFAULT_TEST_FIELDS: &[&str] = &[
    "name",
    "vendor",
    "cancerTypes",
    "method",
    "sampleCategory",
    "productType",
    "categoryName",
];

pub const DEFAULT_VENDOR_FIELDS: &[&str] = &["name", "id"];

pub const DEFAULT_GLOSSARY_FIELDS: &[&str] = &["term", "definition", "relatedTerms"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Overrides the repository's default field list
    pub fields: Option<Vec<String>>,
    pub filter: Where,
    pub order_by: Option<OrderSpec>,
    pub skip: Option<usize>,
    pub take: Option<usize>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
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
}

impl From<FindManyArgs> for SearchOptions {
    fn from(args: FindManyArgs) -> Self {
        Self {
            fields: None,
            filter: args.filter,
            order_by: args.order_by,
            skip: args.skip,
            take: args.take,
        }
    }
}

/// Does any of `fields` contain `needle`? `needle` must already be lowercase.
pub fn text_matches<R: Record>(record: &R, needle: &str, fields: &[String]) -> bool {
    fields.iter().any(|field| match record.field(field) {
        Some(FieldValue::Text(s)) => s.to_lowercase().contains(needle),
        Some(FieldValue::List(items)) => items.iter().any(|item| {
            item.as_str()
                .is_some_and(|s| s.to_lowercase().contains(needle))
        }),
        _ => false,
    })
}

/// Run a text search over one collection. A blank query matches everything.
pub async fn search_collection<A, R>(
    adapter: &A,
    collection: &str,
    query: &str,
    default_fields: &[String],
    options: &SearchOptions,
) -> Result<QueryResult<R>>
where
    A: DataAdapter,
    R: Record,
{
    let records = adapter.get_raw_data::<R>(collection).await?;
    let fields = options.fields.as_deref().unwrap_or(default_fields);
    let needle = query.trim().to_lowercase();

    let matched: Vec<R> = records
        .iter()
        .filter(|r| options.filter.matches(*r))
        .filter(|r| needle.is_empty() || text_matches(*r, &needle, fields))
        .cloned()
        .collect();

    tracing::debug!("Search '{}' in {}: {} matches", query, collection, matched.len());
    Ok(QueryBuilder::finish(
        matched,
        options.order_by.as_ref(),
        options.skip,
        options.take,
    ))
}

pub(crate) fn owned_fields(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::InMemoryAdapter;
    use crate::query::test_support::{item, Item};

    fn adapter() -> InMemoryAdapter {
        InMemoryAdapter::new().with_collection(
            "items",
            vec![
                item("a", "Natera", Some(94.0), &["Colorectal"]),
                item("b", "Guardant Health", Some(81.0), &["Lung", "Colorectal"]),
                item("c", "Natera", None, &["Bladder"]),
            ],
        )
    }

    fn fields() -> Vec<String> {
        owned_fields(&["vendor", "cancerTypes"])
    }

    fn ids(result: &QueryResult<Item>) -> Vec<&str> {
        result.data.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_text_matches_lists_per_element() {
        let record = item("x", "Adaptive", Some(9.0), &["Multiple Myeloma", "ALL"]);
        assert!(text_matches(&record, "myeloma", &fields()));
        assert!(text_matches(&record, "adapt", &fields()));
        assert!(!text_matches(&record, "lung", &fields()));
        // sensitivity is numeric and never text-matched
        assert!(!text_matches(&record, "9", &owned_fields(&["sensitivity"])));
    }

    #[tokio::test]
    async fn test_search_case_insensitive() {
        let adapter = adapter();
        let result: QueryResult<Item> =
            search_collection(&adapter, "items", "GUARDANT", &fields(), &SearchOptions::new())
                .await
                .unwrap();
        assert_eq!(ids(&result), vec!["b"]);
    }

    #[tokio::test]
    async fn test_blank_query_matches_all() {
        let adapter = adapter();
        let result: QueryResult<Item> =
            search_collection(&adapter, "items", "  ", &fields(), &SearchOptions::new())
                .await
                .unwrap();
        assert_eq!(result.meta.total, 3);
    }

    #[tokio::test]
    async fn test_total_before_pagination() {
        let adapter = adapter();
        let options = SearchOptions::new()
            .filter(Where::new().equals("vendor", "Natera"))
            .order_by(OrderSpec::asc("id"))
            .take(1);
        let result: QueryResult<Item> = search_collection(&adapter, "items", "", &fields(), &options)
            .await
            .unwrap();
        assert_eq!(result.meta.total, 2);
        assert_eq!(result.meta.has_more, Some(true));
        assert_eq!(ids(&result), vec!["a"]);

        let options = SearchOptions::new().fields(["cancerTypes"]).skip(1);
        let result: QueryResult<Item> =
            search_collection(&adapter, "items", "colorectal", &fields(), &options)
                .await
                .unwrap();
        assert_eq!(result.meta.total, 2);
        assert_eq!(ids(&result), vec!["b"]);
    }
}
