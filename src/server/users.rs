use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{check_credentials, password_digest};
use crate::server::error::ApiError;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    salt: String,
    digest: String,
}

/// Accounts known to the dev server, keyed by lowercased email
#[derive(Clone, Default)]
pub struct UserDirectory {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<UserRecord, ApiError> {
        check_credentials(email, password)?;

        let email = email.trim().to_string();
        let key = email.to_lowercase();
        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(ApiError::conflict("Email address is already in use"));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let record = UserRecord {
            uid: Uuid::new_v4().simple().to_string(),
            digest: password_digest(&salt, password),
            salt,
            email,
        };
        users.insert(key, record.clone());
        Ok(record)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserRecord, ApiError> {
        let users = self.users.read().await;
        users
            .get(&email.trim().to_lowercase())
            .filter(|user| user.digest == password_digest(&user.salt, password))
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_authenticate() {
        let users = UserDirectory::new();
        let created = users.register("Jane@Example.com", "secret1").await.unwrap();

        let found = users.authenticate("jane@example.com", "secret1").await.unwrap();
        assert_eq!(found.uid, created.uid);
        assert_eq!(found.email, "Jane@Example.com");

        assert!(matches!(
            users.authenticate("jane@example.com", "wrong-pass").await,
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let users = UserDirectory::new();
        users.register("jane@example.com", "secret1").await.unwrap();
        let err = users.register("JANE@example.com", "secret2").await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn short_password_is_a_validation_error() {
        let users = UserDirectory::new();
        let err = users.register("jane@example.com", "abc").await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { .. }));
        assert_eq!(
            err.to_json()["field_errors"]["password"],
            "Password should be at least 6 characters"
        );
    }
}
