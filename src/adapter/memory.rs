//! In-memory adapter
//!
//! Every collection is an immutable, indexed vector built once at load time.
//! All operations are synchronous underneath the async signatures.

use super::collection::{Collection, ErasedCollection};
use super::DataAdapter;
use crate::query::{FindManyArgs, QueryBuilder, QueryResult, Selection, Where};
use crate::record::Record;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct InMemoryAdapter {
    collections: HashMap<String, Arc<dyn ErasedCollection>>,
}

impl std::fmt::Debug for InMemoryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, collection) in &self.collections {
            map.entry(name, &collection.len());
        }
        map.finish()
    }
}

impl InMemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection, indexing it. Replaces any collection of the same name.
    pub fn insert<R: Record>(&mut self, name: impl Into<String>, records: Vec<R>) {
        let name = name.into();
        let collection = Collection::new(&name, records);
        self.collections.insert(name, Arc::new(collection));
    }

    pub fn with_collection<R: Record>(mut self, name: impl Into<String>, records: Vec<R>) -> Self {
        self.insert(name, records);
        self
    }

    /// Number of records in a collection
    pub fn len(&self, collection: &str) -> Result<usize> {
        Ok(self.erased(collection)?.len())
    }

    fn erased(&self, collection: &str) -> Result<&dyn ErasedCollection> {
        self.collections
            .get(collection)
            .map(|c| c.as_ref())
            .ok_or_else(|| Error::UnknownCollection(collection.to_string()))
    }

    fn typed<R: Record>(&self, collection: &str) -> Result<&Collection<R>> {
        let erased = self.erased(collection)?;
        erased
            .as_any()
            .downcast_ref::<Collection<R>>()
            .ok_or_else(|| Error::CollectionType {
                collection: collection.to_string(),
                expected: std::any::type_name::<R>(),
                found: erased.record_type(),
            })
    }

    /// Query a collection by name alone, returning full JSON records.
    pub fn find_many_json(&self, collection: &str, args: &FindManyArgs) -> Result<QueryResult<Value>> {
        self.erased(collection)?.find_many_json(args)
    }

    /// Id lookup by collection name alone, through the id index.
    pub fn find_by_id_json(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        self.erased(collection)?.find_by_id_json(id)
    }
}

#[async_trait]
impl DataAdapter for InMemoryAdapter {
    async fn find_many<R: Record>(&self, collection: &str, args: &FindManyArgs) -> Result<QueryResult<R>> {
        let typed = self.typed::<R>(collection)?;
        Ok(QueryBuilder::execute(typed.records(), args))
    }

    async fn find_many_selected(
        &self,
        collection: &str,
        args: &FindManyArgs,
        selection: &Selection,
    ) -> Result<QueryResult<Map<String, Value>>> {
        self.erased(collection)?.find_many_selected(args, selection)
    }

    async fn find_by_id<R: Record>(&self, collection: &str, id: &str) -> Result<Option<R>> {
        Ok(self.typed::<R>(collection)?.by_id(id).cloned())
    }

    async fn find_by_slug<R: Record>(
        &self,
        collection: &str,
        slug: &str,
        category: Option<&str>,
    ) -> Result<Option<R>> {
        Ok(self.typed::<R>(collection)?.by_slug(slug, category).cloned())
    }

    async fn find_first<R: Record>(&self, collection: &str, filter: &Where) -> Result<Option<R>> {
        Ok(self.typed::<R>(collection)?.first(filter).cloned())
    }

    async fn count(&self, collection: &str, filter: &Where) -> Result<usize> {
        Ok(self.erased(collection)?.count(filter))
    }

    async fn distinct(&self, collection: &str, field: &str, filter: &Where) -> Result<Vec<String>> {
        Ok(self.erased(collection)?.distinct(field, filter))
    }

    async fn count_by(
        &self,
        collection: &str,
        field: &str,
        filter: &Where,
    ) -> Result<BTreeMap<String, usize>> {
        Ok(self.erased(collection)?.count_by(field, filter))
    }

    async fn get_raw_data<R: Record>(&self, collection: &str) -> Result<Arc<Vec<R>>> {
        Ok(Arc::clone(self.typed::<R>(collection)?.records()))
    }

    fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        names
    }
}
