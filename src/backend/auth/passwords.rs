/**
 * Password Hashing
 *
 * bcrypt hashing and verification. Both are CPU-bound, so they run on the
 * blocking thread pool instead of the async workers.
 */

use crate::backend::error::BackendError;

/// Hash `password` with the given bcrypt cost
pub async fn hash_password(password: String, cost: u32) -> Result<String, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| BackendError::internal("password hashing task failed", e))?
        .map_err(|e| BackendError::internal("failed to hash password", e))
}

/// Check `password` against a stored bcrypt hash
pub async fn verify_password(password: String, hash: String) -> Result<bool, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| BackendError::internal("password verification task failed", e))?
        .map_err(|e| BackendError::internal("failed to verify password", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("password123".to_string(), 4).await.unwrap();
        assert_ne!(hash, "password123");
        assert!(verify_password("password123".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrongpassword".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_against_garbage_hash() {
        let result = verify_password("password123".to_string(), "not-a-hash".to_string()).await;
        assert!(matches!(result, Err(BackendError::Internal)));
    }
}
