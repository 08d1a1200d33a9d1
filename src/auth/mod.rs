//! Session tracking and the identity providers behind it.

pub mod gate;
pub mod http;
pub mod local;
pub mod provider;

use sha2::{Digest, Sha256};
use thiserror::Error;

pub use gate::{AuthGate, SessionSubscription};
pub use http::HttpIdentityProvider;
pub use local::LocalIdentityProvider;
pub use provider::IdentityProvider;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Salted SHA-256 of a password, hex encoded
pub fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

/// Rejected registration input and the form field it came from
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CredentialError {
    pub field: &'static str,
    pub message: String,
}

/// Registration input checks shared by the local provider and the dev server
pub fn check_credentials(email: &str, password: &str) -> Result<(), CredentialError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((user, domain)) if !user.is_empty() && !domain.is_empty() => {}
        _ => {
            return Err(CredentialError {
                field: "email",
                message: format!("Invalid email address: {}", email),
            })
        }
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError {
            field: "password",
            message: format!("Password should be at least {} characters", MIN_PASSWORD_LEN),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_salted_and_stable() {
        let a = password_digest("jane@example.com", "secret1");
        assert_eq!(a, password_digest("jane@example.com", "secret1"));
        assert_ne!(a, password_digest("john@example.com", "secret1"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn credentials_checks() {
        assert!(check_credentials("jane@example.com", "secret1").is_ok());
        assert!(check_credentials("jane", "secret1").is_err());
        assert!(check_credentials("@example.com", "secret1").is_err());

        let err = check_credentials("jane@example.com", "123").unwrap_err();
        assert_eq!(err.field, "password");
        assert_eq!(err.to_string(), "Password should be at least 6 characters");
        assert_eq!(check_credentials("jane", "123").unwrap_err().field, "email");
    }
}
