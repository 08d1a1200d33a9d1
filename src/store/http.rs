use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::client::{ApiClient, ApiFailure};
use crate::error::StoreError;
use crate::store::{Document, DocumentStore, Fields};
use crate::types::EntityKind;

const DATA_PREFIX: [&str; 2] = ["api", "data"];

/// Document store reached over the dev server's `/api/data/:kind` routes
#[derive(Clone)]
pub struct HttpStore {
    client: ApiClient,
}

impl HttpStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn map_failure(kind: EntityKind, id: Option<&str>, failure: ApiFailure) -> StoreError {
        match (failure.status, id) {
            (None, _) => StoreError::Transport(failure.message),
            (Some(401), _) => StoreError::Unauthorized(failure.message),
            (Some(404), Some(id)) => StoreError::NotFound {
                kind,
                id: id.to_string(),
            },
            (Some(404), None) => StoreError::UnknownCollection(kind.to_string()),
            (Some(status), _) => StoreError::Status {
                status,
                message: failure.message,
            },
        }
    }

    async fn call(
        &self,
        method: Method,
        kind: EntityKind,
        id: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, StoreError> {
        let mut segments = DATA_PREFIX.to_vec();
        segments.push(kind.collection());
        if let Some(id) = id {
            segments.push(id);
        }
        self.client
            .send(method, &segments, body)
            .await
            .map_err(|failure| Self::map_failure(kind, id, failure))
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Document>, StoreError> {
        let data = self.call(Method::GET, kind, None, None).await?;
        serde_json::from_value(data).map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn create(&self, kind: EntityKind, fields: Fields) -> Result<String, StoreError> {
        let data = self
            .call(Method::POST, kind, None, Some(&Value::Object(fields)))
            .await?;
        data.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Malformed("create response carries no id".to_string()))
    }

    async fn update(&self, kind: EntityKind, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.call(Method::PUT, kind, Some(id), Some(&Value::Object(fields)))
            .await
            .map(|_| ())
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> Result<(), StoreError> {
        self.call(Method::DELETE, kind, Some(id), None).await.map(|_| ())
    }
}
