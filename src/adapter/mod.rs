//! Data Adapter Layer
//!
//! Repositories talk to storage only through [`DataAdapter`]. Collections are
//! addressed by name; record-returning methods are generic over the record
//! type the caller expects, and a mismatch is reported rather than coerced.
//!
//! [`InMemoryAdapter`] is the only backend. The async signatures leave room
//! for one that does I/O.

pub mod collection;
pub mod memory;

pub use collection::{Collection, LookupMaps};
pub use memory::InMemoryAdapter;

use crate::query::{FindManyArgs, QueryResult, Selection, Where};
use crate::record::Record;
use crate::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Names of the collections the catalog registers.
pub mod collections {
    pub const TESTS: &str = "tests";
    pub const VENDORS: &str = "vendors";
    pub const INSURANCE: &str = "insurance";
    pub const CHANGELOG: &str = "changelog";
    pub const GLOSSARY: &str = "glossary";

    pub const ALL: &[&str] = &[TESTS, VENDORS, INSURANCE, CHANGELOG, GLOSSARY];
}

/// Storage contract for named collections.
#[async_trait]
pub trait DataAdapter: Send + Sync {
    /// Filter, count, sort, paginate
    async fn find_many<R: Record>(&self, collection: &str, args: &FindManyArgs) -> Result<QueryResult<R>>;

    /// `find_many` followed by projection onto `selection`
    async fn find_many_selected(
        &self,
        collection: &str,
        args: &FindManyArgs,
        selection: &Selection,
    ) -> Result<QueryResult<Map<String, Value>>>;

    async fn find_by_id<R: Record>(&self, collection: &str, id: &str) -> Result<Option<R>>;

    /// With `category`, the record holding the slug within that category;
    /// otherwise the first record holding it.
    async fn find_by_slug<R: Record>(
        &self,
        collection: &str,
        slug: &str,
        category: Option<&str>,
    ) -> Result<Option<R>>;

    /// First match in insertion order
    async fn find_first<R: Record>(&self, collection: &str, filter: &Where) -> Result<Option<R>>;

    async fn count(&self, collection: &str, filter: &Where) -> Result<usize>;

    /// Unique values of a field, list fields flattened, sorted ascending
    async fn distinct(&self, collection: &str, field: &str, filter: &Where) -> Result<Vec<String>>;

    /// Record counts grouped by the string form of a field; absent and null skipped
    async fn count_by(
        &self,
        collection: &str,
        field: &str,
        filter: &Where,
    ) -> Result<BTreeMap<String, usize>>;

    /// The whole collection, unfiltered
    async fn get_raw_data<R: Record>(&self, collection: &str) -> Result<Arc<Vec<R>>>;

    fn collection_names(&self) -> Vec<String>;
}
