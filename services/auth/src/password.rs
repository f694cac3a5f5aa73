//! Password hashing and verification
//!
//! Hashes are Argon2id PHC strings with a random per-password salt. Hashing
//! is CPU-bound and runs on the blocking thread pool.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::{Rng, distributions::Alphanumeric};
use std::sync::Arc;
use tracing::warn;

/// Memory cost in KiB
pub const MEMORY_COST_KIB: u32 = 19 * 1024;
/// Number of passes
pub const TIME_COST: u32 = 2;
/// Degree of parallelism
pub const PARALLELISM: u32 = 1;

/// Password hasher with a fixed work factor
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    /// Hash checked when no account matches, so both failure paths cost the same
    decoy_hash: Arc<str>,
}

impl PasswordService {
    /// Create a password service with the production work factor
    pub fn new() -> Result<Self> {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .map_err(|e| anyhow::anyhow!("Invalid Argon2 parameters: {}", e))?;
        Self::with_params(params)
    }

    /// Create a password service with custom Argon2 parameters
    pub fn with_params(params: Params) -> Result<Self> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let decoy: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let decoy_hash = hash_with(&argon2, &decoy)?;

        Ok(Self {
            argon2,
            decoy_hash: decoy_hash.into(),
        })
    }

    /// Hash a plaintext password
    pub async fn hash(&self, password: String) -> Result<String> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || hash_with(&argon2, &password))
            .await
            .context("Password hashing task failed")?
    }

    /// Check a plaintext password against a stored hash
    ///
    /// A stored hash that cannot be parsed never matches.
    pub async fn verify(&self, password_hash: String, password: String) -> Result<bool> {
        let argon2 = self.argon2.clone();
        tokio::task::spawn_blocking(move || verify_with(&argon2, &password_hash, &password))
            .await
            .context("Password verification task failed")
    }

    /// Spend the same effort as a real verification, for unknown accounts
    pub async fn verify_decoy(&self, password: String) -> Result<()> {
        self.verify(self.decoy_hash.to_string(), password).await?;
        Ok(())
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

fn verify_with(argon2: &Argon2<'_>, password_hash: &str, password: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => argon2.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            warn!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

#[cfg(test)]
pub(crate) fn fast_params() -> Params {
    Params::new(8, 1, 1, None).unwrap()
}
