use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

use crate::auth::provider::IdentityProvider;
use crate::auth::{check_credentials, password_digest};
use crate::error::AuthError;
use crate::model::{Session, SessionState};

struct Account {
    uid: String,
    digest: String,
}

/// In-process identity provider.
///
/// Starts in the resolving state; call [`resolve`](Self::resolve) to finish
/// restoring (or not restoring) a previous session, as a hosted provider does
/// on page load.
pub struct LocalIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    state: watch::Sender<SessionState>,
    federated: Option<Session>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        let (state, _rx) = watch::channel(SessionState::resolving());
        Self {
            accounts: RwLock::new(HashMap::new()),
            state,
            federated: None,
        }
    }

    /// Provider whose resolution already completed with nobody signed in
    pub fn signed_out() -> Self {
        let provider = Self::new();
        provider.resolve(None);
        provider
    }

    /// Principal returned by federated sign-in; without one it is refused
    pub fn with_federated_principal(mut self, uid: impl Into<String>, email: impl Into<String>) -> Self {
        self.federated = Some(Session::new(uid, Some(email.into())));
        self
    }

    /// Complete session resolution
    pub fn resolve(&self, session: Option<Session>) {
        let state = match session {
            Some(session) => SessionState::signed_in(session),
            None => SessionState::signed_out(),
        };
        self.state.send_replace(state);
    }

    fn key(email: &str) -> String {
        email.trim().to_ascii_lowercase()
    }

    fn publish(&self, session: &Session) {
        self.state.send_replace(SessionState::signed_in(session.clone()));
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn observe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let key = Self::key(email);
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(&key)
            .filter(|account| account.digest == password_digest(&key, password))
            .ok_or_else(|| AuthError::new("Invalid email or password"))?;

        let session = Session::new(account.uid.clone(), Some(key.clone()));
        self.publish(&session);
        Ok(session)
    }

    async fn register_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        check_credentials(email, password).map_err(|e| AuthError::new(e.message))?;

        let key = Self::key(email);
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(AuthError::new("Email address is already in use"));
        }
        let uid = Uuid::new_v4().simple().to_string();
        accounts.insert(
            key.clone(),
            Account {
                uid: uid.clone(),
                digest: password_digest(&key, password),
            },
        );
        drop(accounts);

        let session = Session::new(uid, Some(key));
        self.publish(&session);
        Ok(session)
    }

    async fn sign_in_with_federated_provider(&self) -> Result<Session, AuthError> {
        let principal = self
            .federated
            .as_ref()
            .ok_or_else(|| AuthError::new("Federated sign-in is not configured"))?;
        let session = Session::new(principal.uid.clone(), principal.email.clone());
        self.publish(&session);
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.send_replace(SessionState::signed_out());
        Ok(())
    }
}
