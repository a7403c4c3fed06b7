//! Password hashing.
//!
//! Hashes are bcrypt strings (`$2b$<cost>$<salt+digest>`), so the algorithm and
//! the salt travel with the hash. bcrypt is deliberately slow; request handlers
//! should use the `spawn_*` variants, which run on tokio's blocking pool.

use std::sync::LazyLock;

use bcrypt::{DEFAULT_COST, hash, verify};
use tracing::warn;

use crate::errors::AppError;

/// Stands in for the stored hash when a login names an account that does
/// not exist, so both outcomes pay for one bcrypt verify.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("todoapp-unknown-account", DEFAULT_COST).ok());

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(AppError::internal)
}

/// Checks `password` against a stored hash.
///
/// A stored hash that cannot be parsed counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

pub async fn spawn_hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

pub async fn spawn_verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?;
    Ok(valid)
}

/// Runs a verify that always fails against [`UNKNOWN_ACCOUNT_HASH`].
pub async fn spawn_verify_unknown_account(password: String) -> Result<(), AppError> {
    tokio::task::spawn_blocking(move || {
        if let Some(hash) = UNKNOWN_ACCOUNT_HASH.as_deref() {
            verify_password(&password, hash);
        }
    })
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_success() {
        let password = "testpassword123";
        let hash = hash_password(password).unwrap();

        assert!(!hash.is_empty());
        assert_ne!(hash, password);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correctpassword").unwrap();
        assert!(verify_password("correctpassword", &hash));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correctpassword").unwrap();
        assert!(!verify_password("wrongpassword", &hash));
    }

    #[test]
    fn test_verify_password_malformed_hash_fails_closed() {
        assert!(!verify_password("testpassword", "not_a_valid_bcrypt_hash"));
        assert!(!verify_password("testpassword", ""));
    }

    #[test]
    fn test_hash_generates_unique_hashes() {
        let hash1 = hash_password("samepassword").unwrap();
        let hash2 = hash_password("samepassword").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("samepassword", &hash1));
        assert!(verify_password("samepassword", &hash2));
    }

    #[tokio::test]
    async fn test_spawned_hash_and_verify() {
        let hash = spawn_hash_password("offthread".to_string()).await.unwrap();

        assert!(
            spawn_verify_password("offthread".to_string(), hash.clone())
                .await
                .unwrap()
        );
        assert!(
            !spawn_verify_password("other".to_string(), hash)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_unknown_account_hash_rejects_everything() {
        let hash = UNKNOWN_ACCOUNT_HASH.as_deref().unwrap();

        assert!(hash.starts_with("$2"));
        assert!(!verify_password("", hash));
        assert!(!verify_password("password", hash));
        assert!(spawn_verify_unknown_account("password".to_string()).await.is_ok());
    }
}
