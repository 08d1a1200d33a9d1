// Bearer JWT issue/validate and the middleware guarding /api routes
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ServerConfig;
use crate::server::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(uid: impl Into<String>, email: impl Into<String>, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::ExpiryOutOfRange(expiry_hours))?;
        Ok(Self {
            sub: uid.into(),
            email: email.into(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("JWT expiry of {0} hours is out of range")]
    ExpiryOutOfRange(u64),
}

pub fn generate_jwt(config: &ServerConfig, claims: &Claims) -> Result<String, JwtError> {
    if config.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(config: &ServerConfig, token: &str) -> Result<Claims, String> {
    if config.jwt_secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
        }
    }
}

/// Reject requests without a valid bearer token; inject [`AuthUser`] otherwise
pub async fn require_bearer(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&state.config, &token).map_err(ApiError::unauthorized)?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if token.trim().is_empty() => Err("Empty JWT token".to_string()),
        Some(token) => Ok(token.trim().to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> ServerConfig {
        ServerConfig {
            port: 0,
            jwt_secret: secret.to_string(),
            jwt_expiry_hours: 1,
            seed_courses: false,
        }
    }

    #[test]
    fn issued_token_validates() {
        let cfg = config("test-secret");
        let token = generate_jwt(&cfg, &Claims::new("u1", "jane@example.com", 1).unwrap()).unwrap();
        let claims = validate_jwt(&cfg, &token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "jane@example.com");
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = generate_jwt(&config("one"), &Claims::new("u1", "a@b.c", 1).unwrap()).unwrap();
        assert!(validate_jwt(&config("two"), &token).is_err());
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let err = generate_jwt(&config(""), &Claims::new("u1", "a@b.c", 1).unwrap()).unwrap_err();
        assert!(matches!(err, JwtError::InvalidSecret));
    }

    #[test]
    fn oversized_expiry_is_an_error() {
        let err = Claims::new("u1", "a@b.c", u64::MAX).unwrap_err();
        assert!(matches!(err, JwtError::ExpiryOutOfRange(u64::MAX)));
        assert!(Claims::new("u1", "a@b.c", i64::MAX as u64).is_err());

        let week = Claims::new("u1", "a@b.c", 24 * 7).unwrap();
        assert_eq!(week.exp - week.iat, 7 * 24 * 3600);
    }

    #[test]
    fn header_must_be_bearer() {
        let mut headers = HeaderMap::new();
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert_eq!(
            extract_jwt_from_headers(&headers).unwrap_err(),
            "Authorization header must use Bearer token format"
        );

        headers.insert("authorization", "Bearer abc".parse().unwrap());
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc");
    }
}
