use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(uid: impl Into<String>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
            signed_in_at: Utc::now(),
        }
    }
}

/// What an identity provider currently knows about the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub session: Option<Session>,
    /// True until the provider has decided whether a session exists
    pub loading: bool,
}

impl SessionState {
    pub fn resolving() -> Self {
        Self { session: None, loading: true }
    }

    pub fn signed_out() -> Self {
        Self { session: None, loading: false }
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.session.is_some()
    }
}
