//! Remote store seam.
//!
//! Collections are addressed by [`EntityKind`] and documents by an opaque id
//! assigned by the store. A document on the wire is `{ "id": ..., ...fields }`.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::types::EntityKind;

pub use http::HttpStore;
pub use memory::{MemoryStore, StoreCall, StoreOp};

/// Field set of a document, without its id
pub type Fields = Map<String, Value>;

/// A document as returned by a store list call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self { id: id.into(), fields }
    }
}

/// Collection-scoped CRUD primitives of the remote document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of the collection, in the store's native order
    async fn list(&self, kind: EntityKind) -> Result<Vec<Document>, StoreError>;

    /// Insert a document and return the id the store assigned
    async fn create(&self, kind: EntityKind, fields: Fields) -> Result<String, StoreError>;

    /// Rewrite every field of an existing document
    async fn update(&self, kind: EntityKind, id: &str, fields: Fields) -> Result<(), StoreError>;

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), StoreError>;
}

/// Serialize a field struct into the map a store write expects
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Malformed(format!("expected a JSON object, got {}", other))),
        Err(e) => Err(StoreError::Malformed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_wire_form_is_flat() {
        let doc: Document = serde_json::from_value(json!({
            "id": "s1",
            "name": "John Doe",
            "courseId": "c1"
        }))
        .unwrap();

        assert_eq!(doc.id, "s1");
        assert_eq!(doc.fields.len(), 2);
        assert!(!doc.fields.contains_key("id"));
        assert_eq!(serde_json::to_value(&doc).unwrap()["courseId"], "c1");
    }

    #[test]
    fn to_fields_rejects_non_objects() {
        assert!(to_fields(&"plain string").is_err());
        assert_eq!(to_fields(&json!({"title": "React"})).unwrap()["title"], "React");
    }
}
