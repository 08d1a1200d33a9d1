use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{Document, DocumentStore, Fields};
use crate::types::EntityKind;

/// Store primitive, used for call accounting and fault injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    List,
    Create,
    Update,
    Delete,
}

/// One call made against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List(EntityKind),
    Create(EntityKind),
    Update(EntityKind, String),
    Delete(EntityKind, String),
}

impl StoreCall {
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::List(_) => StoreOp::List,
            StoreCall::Create(_) => StoreOp::Create,
            StoreCall::Update(..) => StoreOp::Update,
            StoreCall::Delete(..) => StoreOp::Delete,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            StoreCall::List(kind) | StoreCall::Create(kind) => *kind,
            StoreCall::Update(kind, _) | StoreCall::Delete(kind, _) => *kind,
        }
    }
}

/// In-process document store.
///
/// Backs the dev API server and integration tests. Collections keep insertion
/// order, ids are random v4 UUIDs. An instrumented store also records every
/// call and can be told to fail the next call of a given shape.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<EntityKind, Vec<Document>>>>,
    calls: Option<Arc<RwLock<Vec<StoreCall>>>>,
    faults: Arc<RwLock<HashSet<(StoreOp, EntityKind)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that keeps a log of every call made against it
    pub fn instrumented() -> Self {
        Self {
            calls: Some(Arc::new(RwLock::new(Vec::new()))),
            ..Self::default()
        }
    }

    /// Insert a document with a known id without recording a call
    pub async fn seed(&self, kind: EntityKind, document: Document) {
        let mut collections = self.collections.write().await;
        collections.entry(kind).or_default().push(document);
    }

    /// Calls recorded so far (empty for a non-instrumented store)
    pub async fn calls(&self) -> Vec<StoreCall> {
        match &self.calls {
            Some(calls) => calls.read().await.clone(),
            None => Vec::new(),
        }
    }

    pub async fn clear_calls(&self) {
        if let Some(calls) = &self.calls {
            calls.write().await.clear();
        }
    }

    /// Make the next `op` against `kind` fail with a transport error
    pub async fn fail_next(&self, op: StoreOp, kind: EntityKind) {
        self.faults.write().await.insert((op, kind));
    }

    /// Current document count of a collection, bypassing call accounting
    pub async fn count(&self, kind: EntityKind) -> usize {
        self.collections.read().await.get(&kind).map_or(0, Vec::len)
    }

    async fn enter(&self, call: StoreCall) -> Result<(), StoreError> {
        let fault = (call.op(), call.kind());
        if let Some(calls) = &self.calls {
            calls.write().await.push(call);
        }
        if self.faults.write().await.remove(&fault) {
            debug!("Injected failure for {:?} on {}", fault.0, fault.1);
            return Err(StoreError::Transport(format!(
                "{} is temporarily unavailable",
                fault.1
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Document>, StoreError> {
        self.enter(StoreCall::List(kind)).await?;
        let collections = self.collections.read().await;
        Ok(collections.get(&kind).cloned().unwrap_or_default())
    }

    async fn create(&self, kind: EntityKind, mut fields: Fields) -> Result<String, StoreError> {
        self.enter(StoreCall::Create(kind)).await?;
        fields.remove("id");
        let id = Uuid::new_v4().simple().to_string();
        let mut collections = self.collections.write().await;
        collections.entry(kind).or_default().push(Document::new(id.clone(), fields));
        debug!("Created {}/{}", kind, id);
        Ok(id)
    }

    async fn update(&self, kind: EntityKind, id: &str, mut fields: Fields) -> Result<(), StoreError> {
        self.enter(StoreCall::Update(kind, id.to_string())).await?;
        fields.remove("id");
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(&kind)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound {
                kind,
                id: id.to_string(),
            })?;
        document.fields = fields;
        debug!("Updated {}/{}", kind, id);
        Ok(())
    }

    /// Deleting a missing id succeeds, matching the hosted store
    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), StoreError> {
        self.enter(StoreCall::Delete(kind, id.to_string())).await?;
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(&kind) {
            docs.retain(|doc| doc.id != id);
        }
        debug!("Deleted {}/{}", kind, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn crud_keeps_insertion_order() {
        let store = MemoryStore::new();
        let a = store.create(EntityKind::Courses, fields(json!({"title": "React"}))).await.unwrap();
        let b = store.create(EntityKind::Courses, fields(json!({"title": "Angular"}))).await.unwrap();

        let listed = store.list(EntityKind::Courses).await.unwrap();
        assert_eq!(listed.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec![a.as_str(), b.as_str()]);

        store.update(EntityKind::Courses, &a, fields(json!({"title": "React 19"}))).await.unwrap();
        store.delete(EntityKind::Courses, &b).await.unwrap();

        let listed = store.list(EntityKind::Courses).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].fields["title"], "React 19");
    }

    #[tokio::test]
    async fn update_of_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(EntityKind::Students, "nope", Fields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(store.delete(EntityKind::Students, "nope").await.is_ok());
    }

    #[tokio::test]
    async fn injected_fault_fires_once_and_is_recorded() {
        let store = MemoryStore::instrumented();
        store.fail_next(StoreOp::List, EntityKind::Students).await;

        assert!(store.list(EntityKind::Students).await.is_err());
        assert!(store.list(EntityKind::Students).await.is_ok());
        assert_eq!(
            store.calls().await,
            vec![StoreCall::List(EntityKind::Students), StoreCall::List(EntityKind::Students)]
        );
    }
}
