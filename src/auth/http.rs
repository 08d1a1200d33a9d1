use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::auth::provider::IdentityProvider;
use crate::client::ApiClient;
use crate::error::AuthError;
use crate::model::{Session, SessionState};

#[derive(Debug, Deserialize)]
struct UserPayload {
    uid: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    token: String,
    user: UserPayload,
}

/// Identity provider backed by the dev server's `/auth` routes.
///
/// The bearer token lives in the shared [`ApiClient`], so an `HttpStore`
/// built from the same client is authorized as soon as sign-in succeeds.
pub struct HttpIdentityProvider {
    client: ApiClient,
    state: watch::Sender<SessionState>,
}

impl HttpIdentityProvider {
    pub fn new(client: ApiClient) -> Self {
        let (state, _rx) = watch::channel(SessionState::resolving());
        Self { client, state }
    }

    /// Resolve the session from a previously issued token, if any.
    ///
    /// A token the server no longer accepts resolves to signed out.
    pub async fn restore(&self, token: Option<String>) -> SessionState {
        let state = match token {
            None => SessionState::signed_out(),
            Some(token) => {
                self.client.set_token(Some(token));
                match self.client.send(Method::GET, &["api", "auth", "whoami"], None).await {
                    Ok(data) => match serde_json::from_value::<UserPayload>(data) {
                        Ok(user) => SessionState::signed_in(Session::new(user.uid, user.email)),
                        Err(e) => {
                            warn!("Unreadable whoami payload: {}", e);
                            self.client.set_token(None);
                            SessionState::signed_out()
                        }
                    },
                    Err(failure) => {
                        debug!("Stored token rejected: {}", failure);
                        self.client.set_token(None);
                        SessionState::signed_out()
                    }
                }
            }
        };
        self.state.send_replace(state.clone());
        state
    }

    /// Token of the current session, for persisting between runs
    pub fn token(&self) -> Option<String> {
        self.client.token()
    }

    async fn exchange(&self, route: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        let body = json!({ "email": email, "password": password });
        let data: Value = self
            .client
            .send(Method::POST, &["auth", route], Some(&body))
            .await
            .map_err(|failure| AuthError::new(failure.message))?;
        let payload: TokenPayload =
            serde_json::from_value(data).map_err(|e| AuthError::new(format!("Unexpected auth response: {}", e)))?;

        self.client.set_token(Some(payload.token));
        let session = Session::new(payload.user.uid, payload.user.email);
        self.state.send_replace(SessionState::signed_in(session.clone()));
        Ok(session)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn observe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.exchange("login", email, password).await
    }

    async fn register_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.exchange("register", email, password).await
    }

    async fn sign_in_with_federated_provider(&self) -> Result<Session, AuthError> {
        Err(AuthError::new("Federated sign-in is not available on this server"))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.client.set_token(None);
        self.state.send_replace(SessionState::signed_out());
        Ok(())
    }
}
