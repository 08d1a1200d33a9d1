// Error taxonomy for the sync layer
use thiserror::Error;

use crate::types::EntityKind;

/// Identity provider failure. The message is shown to the user verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Remote store failure for any list/create/update/delete call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Store responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Document not found: {kind}/{id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Malformed store payload: {0}")]
    Malformed(String),
}

/// A fetched document did not have the shape its entity kind requires
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Cannot decode {kind} document '{id}': field '{field}' {reason}")]
pub struct DecodeError {
    pub kind: EntityKind,
    pub id: String,
    pub field: String,
    pub reason: String,
}

/// Failure of a fetch-all; never fatal, the previous snapshot stays in place
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Fetching {kind} failed: {source}")]
    Store {
        kind: EntityKind,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl FetchError {
    pub fn kind(&self) -> EntityKind {
        match self {
            FetchError::Store { kind, .. } => *kind,
            FetchError::Decode(err) => err.kind,
        }
    }
}

/// Client-side pre-submit check, raised before any remote call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub missing_fields: Vec<&'static str>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            missing_fields: Vec::new(),
        }
    }

    pub fn missing(message: impl Into<String>, missing_fields: Vec<&'static str>) -> Self {
        Self {
            message: message.into(),
            missing_fields,
        }
    }
}

/// Errors from console lifecycle calls
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Console has been disposed")]
    Disposed,

    #[error("Identity provider closed before the session resolved")]
    ProviderClosed,
}
