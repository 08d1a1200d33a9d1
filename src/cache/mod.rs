//! Per-kind snapshots of the remote collections.
//!
//! # Invariants
//! - A snapshot is only ever replaced whole; readers see the old or the new
//!   `Arc<Vec<T>>`, never a mix.
//! - A failed fetch leaves the previous snapshot in place.
//! - Fetch results that arrive after [`Collections::dispose`] are dropped.

pub mod collections;

use std::sync::Arc;
use tokio::sync::watch;

use crate::error::{FetchError, StoreError};
use crate::model::{decode_all, Entity};
use crate::store::DocumentStore;

pub use collections::{Collections, PageLoad, RefreshOutcome};

/// Reactive holder of one collection's latest snapshot
pub struct CollectionCache<T> {
    tx: watch::Sender<Arc<Vec<T>>>,
}

impl<T: Send + Sync + 'static> CollectionCache<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self { tx }
    }

    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.tx.borrow().clone()
    }

    /// Swap in a new full snapshot and notify subscribers
    pub fn replace(&self, items: Vec<T>) {
        self.tx.send_replace(Arc::new(items));
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<T>>> {
        self.tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Send + Sync + 'static> Default for CollectionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One full read of a collection, decoded into typed records in store order
pub async fn fetch_all<T: Entity>(store: &dyn DocumentStore) -> Result<Vec<T>, FetchError> {
    let documents = store
        .list(T::KIND)
        .await
        .map_err(|source: StoreError| FetchError::Store { kind: T::KIND, source })?;
    Ok(decode_all::<T>(&documents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_swaps_whole_snapshot() {
        let cache = CollectionCache::new();
        cache.replace(vec![1, 2, 3]);
        let before = cache.snapshot();

        cache.replace(vec![9]);

        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*cache.snapshot(), vec![9]);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_each_replacement() {
        let cache = CollectionCache::new();
        let mut rx = cache.subscribe();

        cache.replace(vec!["a"]);
        rx.changed().await.unwrap();
        assert_eq!(**rx.borrow_and_update(), vec!["a"]);
    }
}
