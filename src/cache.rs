//! Load-once cache
//!
//! Holds one lazily built value, typically the [`Dal`]. Concurrent first
//! callers share a single load; `reset` discards the value so the next call
//! loads again. Nothing invalidates it automatically.

use crate::dal::Dal;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

pub type DalCache = Cache<Dal>;

pub struct Cache<T> {
    cell: Mutex<Arc<OnceCell<Arc<T>>>>,
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self {
            cell: Mutex::new(Arc::new(OnceCell::new())),
        }
    }
}

impl<T> Cache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> Arc<OnceCell<Arc<T>>> {
        Arc::clone(&self.cell.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Return the cached value, running `loader` if there is none yet.
    /// A failed load leaves the cache empty.
    pub async fn get_or_init<F, Fut, E>(&self, loader: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = self.current();
        let value = cell
            .get_or_try_init(|| async {
                tracing::debug!("Cache empty; loading");
                loader().await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(value))
    }

    /// The cached value, if loaded
    pub fn get(&self) -> Option<Arc<T>> {
        self.current().get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.current().initialized()
    }

    /// Drop the cached value. Loads already in flight finish into the old cell.
    pub fn reset(&self) {
        let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        *cell = Arc::new(OnceCell::new());
        tracing::debug!("Cache reset");
    }
}
