use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::AuthError;
use crate::model::{Session, SessionState};

/// Source of truth for who is signed in.
///
/// `observe` hands out a receiver that starts in the resolving state until
/// the provider knows whether a session exists, then follows every sign-in
/// and sign-out.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn observe(&self) -> watch::Receiver<SessionState>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn register_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_in_with_federated_provider(&self) -> Result<Session, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}
