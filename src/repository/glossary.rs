//! Glossary repository

use super::search::{owned_fields, search_collection, SearchOptions, DEFAULT_GLOSSARY_FIELDS};
use crate::adapter::{collections, DataAdapter};
use crate::model::GlossaryTerm;
use crate::query::{FindManyArgs, OrderSpec, QueryResult};
use crate::Result;
use std::sync::Arc;

pub struct GlossaryRepository<A> {
    adapter: Arc<A>,
    search_fields: Vec<String>,
}

impl<A: DataAdapter> GlossaryRepository<A> {
    pub fn new(adapter: Arc<A>) -> Self {
        Self {
            adapter,
            search_fields: owned_fields(DEFAULT_GLOSSARY_FIELDS),
        }
    }

    /// All terms, alphabetical
    pub async fn find_all(&self) -> Result<Vec<GlossaryTerm>> {
        let args = FindManyArgs::new().order_by(OrderSpec::asc("term"));
        Ok(self.adapter.find_many(collections::GLOSSARY, &args).await?.data)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<GlossaryTerm>> {
        self.adapter.find_by_id(collections::GLOSSARY, id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<GlossaryTerm>> {
        self.adapter.find_by_slug(collections::GLOSSARY, slug, None).await
    }

    /// Terms mentioning `query` in the term, definition or related terms
    pub async fn search(&self, query: &str) -> Result<QueryResult<GlossaryTerm>> {
        let options = SearchOptions::new().order_by(OrderSpec::asc("term"));
        search_collection(
            self.adapter.as_ref(),
            collections::GLOSSARY,
            query,
            &self.search_fields,
            &options,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dal::fixtures;

    fn repo() -> GlossaryRepository<crate::InMemoryAdapter> {
        GlossaryRepository::new(fixtures::adapter())
    }

    #[tokio::test]
    async fn test_find_all_sorted_by_term() {
        let repo = repo();
        let terms: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.term)
            .collect();
        assert_eq!(terms, vec!["Circulating Tumor DNA", "Limit of Detection", "Tumor-Informed"]);
    }

    #[tokio::test]
    async fn test_lookups_and_search() {
        let repo = repo();
        let lod = repo.find_by_slug("limit-of-detection").await.unwrap().unwrap();
        assert_eq!(lod.id, "lod");
        assert!(repo.find_by_id("ctdna").await.unwrap().is_some());

        // matches the related term of one entry and the definition of another
        let result = repo.search("ctdna").await.unwrap();
        let ids: Vec<_> = result.data.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["ctdna", "tumor-informed"]);
    }
}
