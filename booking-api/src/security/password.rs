/// Password hashing and verification using bcrypt
use crate::error::{AppError, Result};

/// Cost range accepted by bcrypt
pub const MIN_HASH_COST: u32 = 4;
pub const MAX_HASH_COST: u32 = 31;

/// Cheapest cost, for tests only
pub const TEST_HASH_COST: u32 = MIN_HASH_COST;

/// Hash a password with bcrypt at the given cost.
///
/// ## Security
///
/// - Salt: random per password, embedded in the hash string
/// - Cost: 12 in production configuration
///
/// Runs on the blocking pool; bcrypt at cost 12 takes hundreds of milliseconds.
pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash.
///
/// bcrypt recomputes the hash with the stored salt and compares in constant time.
/// Returns `false` on mismatch; malformed hashes are an internal error.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification failed: {}", e)))
}
