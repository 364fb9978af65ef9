//! Changelog repository

use crate::adapter::{collections, DataAdapter};
use crate::model::ChangelogEntry;
use crate::query::{FindManyArgs, OrderSpec, QueryResult, Where};
use crate::Result;
use std::sync::Arc;

pub struct ChangelogRepository<A> {
    adapter: Arc<A>,
}

impl<A: DataAdapter> ChangelogRepository<A> {
    pub fn new(adapter: Arc<A>) -> Self {
        Self { adapter }
    }

    /// Newest first unless `args` asks for another order
    pub async fn find_all(&self, args: &FindManyArgs) -> Result<QueryResult<ChangelogEntry>> {
        let mut args = args.clone();
        if args.order_by.is_none() {
            args.order_by = Some(newest_first());
        }
        self.adapter.find_many(collections::CHANGELOG, &args).await
    }

    pub async fn find_recent(&self, limit: usize) -> Result<Vec<ChangelogEntry>> {
        let args = FindManyArgs::new().take(limit);
        Ok(self.find_all(&args).await?.data)
    }

    pub async fn find_by_test(&self, test_id: &str) -> Result<Vec<ChangelogEntry>> {
        let args = FindManyArgs::new().filter(Where::new().equals("testId", test_id));
        Ok(self.find_all(&args).await?.data)
    }

    /// Entries of one change type (`added`, `updated`, ...)
    pub async fn find_by_type(&self, kind: &str) -> Result<Vec<ChangelogEntry>> {
        let args = FindManyArgs::new().filter(Where::new().equals("type", kind));
        Ok(self.find_all(&args).await?.data)
    }
}

fn newest_first() -> OrderSpec {
    OrderSpec::desc("date").then("id", crate::query::SortDirection::Asc)
}
