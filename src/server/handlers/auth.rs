use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::server::auth::{generate_jwt, AuthUser, Claims};
use crate::server::error::ApiError;
use crate::server::response::{ApiResponse, ApiResult};
use crate::server::users::UserRecord;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserInfo,
    /// Seconds until the token expires
    pub expires_in: u64,
}

fn issue(state: &AppState, user: UserRecord) -> Result<TokenResponse, ApiError> {
    let token = Claims::new(&user.uid, &user.email, state.config.jwt_expiry_hours)
        .and_then(|claims| generate_jwt(&state.config, &claims))
        .map_err(|e| {
            tracing::error!("Token issue failed: {}", e);
            ApiError::internal_server_error("Unable to issue token")
        })?;

    Ok(TokenResponse {
        token,
        user: UserInfo {
            uid: user.uid,
            email: user.email,
        },
        expires_in: state.config.jwt_expiry_hours.saturating_mul(3600),
    })
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> ApiResult<TokenResponse> {
    let user = state.users.register(&body.email, &body.password).await.map_err(|e| {
        warn!("Registration rejected for {}: {}", body.email, e);
        e
    })?;
    info!("Registered {} ({})", user.email, user.uid);
    Ok(ApiResponse::created(issue(&state, user)?))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> ApiResult<TokenResponse> {
    let user = state.users.authenticate(&body.email, &body.password).await.map_err(|e| {
        warn!("Login failed for {}", body.email);
        e
    })?;
    info!("Login {} ({})", user.email, user.uid);
    Ok(ApiResponse::success(issue(&state, user)?))
}

/// GET /api/auth/whoami
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<UserInfo> {
    Ok(ApiResponse::success(UserInfo {
        uid: user.uid,
        email: user.email,
    }))
}
