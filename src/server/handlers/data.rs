// Collection CRUD over the in-memory store
use axum::{
    body::Bytes,
    extract::{Path, State},
    Extension,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::server::auth::AuthUser;
use crate::server::error::ApiError;
use crate::server::response::{ApiResponse, ApiResult};
use crate::server::AppState;
use crate::store::{Document, DocumentStore, Fields};
use crate::types::EntityKind;

#[derive(Debug, Serialize)]
pub struct DocumentRef {
    pub id: String,
}

fn parse_kind(kind: &str) -> Result<EntityKind, ApiError> {
    kind.parse::<EntityKind>()
        .map_err(|_| ApiError::not_found(format!("Unknown collection: {}", kind)))
}

/// Writes must be a JSON object and may not set the store-assigned id
fn parse_fields(body: &Bytes) -> Result<Fields, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| ApiError::invalid_json(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(ApiError::bad_request("Request body must be a JSON object"));
    };
    if fields.contains_key("id") {
        return Err(ApiError::bad_request("System field 'id' cannot be set via API"));
    }
    Ok(fields)
}

/// GET /api/data/:kind
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<String>,
) -> ApiResult<Vec<Document>> {
    let kind = parse_kind(&kind)?;
    let documents = state.store.list(kind).await?;
    debug!("{} listed {} ({} documents)", user.uid, kind, documents.len());
    Ok(ApiResponse::success(documents))
}

/// POST /api/data/:kind
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(kind): Path<String>,
    body: Bytes,
) -> ApiResult<DocumentRef> {
    let kind = parse_kind(&kind)?;
    let fields = parse_fields(&body)?;
    let id = state.store.create(kind, fields).await?;
    debug!("{} created {}/{}", user.uid, kind, id);
    Ok(ApiResponse::created(DocumentRef { id }))
}

/// PUT /api/data/:kind/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((kind, id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<DocumentRef> {
    let kind = parse_kind(&kind)?;
    let fields = parse_fields(&body)?;
    state.store.update(kind, &id, fields).await?;
    debug!("{} updated {}/{}", user.uid, kind, id);
    Ok(ApiResponse::success(DocumentRef { id }))
}

/// DELETE /api/data/:kind/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<DocumentRef> {
    let kind = parse_kind(&kind)?;
    state.store.delete(kind, &id).await?;
    debug!("{} deleted {}/{}", user.uid, kind, id);
    Ok(ApiResponse::success(DocumentRef { id }))
}
