use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::provider::IdentityProvider;
use crate::error::AuthError;
use crate::model::{Session, SessionState};

/// Tracks the current session for the console and its route guard
#[derive(Clone)]
pub struct AuthGate {
    provider: Arc<dyn IdentityProvider>,
    live: Arc<AtomicUsize>,
}

impl AuthGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Subscribe to session changes. Dropping the subscription releases it.
    pub fn observe_session(&self) -> SessionSubscription {
        let count = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Session subscription opened ({} live)", count);
        SessionSubscription {
            rx: self.provider.observe(),
            live: Arc::clone(&self.live),
            primed: false,
        }
    }

    /// Number of subscriptions that have not been released yet
    pub fn live_subscriptions(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SessionState {
        self.provider.observe().borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let result = self.provider.sign_in_with_password(email, password).await;
        log_auth_result("Sign-in", &result);
        result
    }

    pub async fn register_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let result = self.provider.register_with_password(email, password).await;
        log_auth_result("Registration", &result);
        result
    }

    pub async fn sign_in_with_federated_provider(&self) -> Result<Session, AuthError> {
        let result = self.provider.sign_in_with_federated_provider().await;
        log_auth_result("Federated sign-in", &result);
        result
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await?;
        info!("Signed out");
        Ok(())
    }
}

fn log_auth_result(action: &str, result: &Result<Session, AuthError>) {
    match result {
        Ok(session) => info!("{} succeeded for {}", action, session.uid),
        Err(e) => warn!("{} failed: {}", action, e),
    }
}

/// Live view of the session state.
///
/// The first [`next`](Self::next) call yields as soon as resolution has
/// completed (immediately if it already has); later calls yield on each
/// sign-in or sign-out.
pub struct SessionSubscription {
    rx: watch::Receiver<SessionState>,
    live: Arc<AtomicUsize>,
    primed: bool,
}

impl SessionSubscription {
    pub fn current(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Next notification, or `None` once the provider has gone away
    pub async fn next(&mut self) -> Option<SessionState> {
        if !self.primed {
            self.primed = true;
            let state = self.rx.borrow_and_update().clone();
            if !state.loading {
                return Some(state);
            }
        }
        self.rx.changed().await.ok()?;
        let state = self.rx.borrow_and_update().clone();
        Some(state)
    }

    pub fn unsubscribe(self) {}
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        let remaining = self.live.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        debug!("Session subscription released ({} live)", remaining);
    }
}
