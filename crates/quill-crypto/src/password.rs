//! Lock password hashing using Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! so the parameters travel with the hash and verification never needs the
//! hasher's current configuration.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// Argon2id parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory in KiB (default: 19456 = 19 MiB).
    pub memory_kib: u32,
    /// Time iterations (default: 2).
    pub iterations: u32,
    /// Parallelism degree (default: 1).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Cheap parameters for tests and constrained devices.
    pub fn low_memory() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Hashes and verifies note lock passwords.
#[derive(Debug, Clone, Default)]
pub struct LockHasher {
    params: KdfParams,
}

impl LockHasher {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    fn argon2(&self) -> CryptoResult<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_kib,
            self.params.iterations,
            self.params.parallelism,
            None,
        )
        .map_err(|e| CryptoError::InvalidParams(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a password with a fresh random salt, returning a PHC string.
    pub fn hash(&self, password: &str) -> CryptoResult<String> {
        if password.is_empty() {
            return Err(CryptoError::InvalidPassword(
                "password cannot be empty".to_string(),
            ));
        }

        let mut salt_bytes = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| CryptoError::Hashing(e.to_string()))?;

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CryptoError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC string.
    ///
    /// A wrong password is `Ok(false)`; a stored value that is not a PHC
    /// string is `Err(MalformedHash)`.
    pub fn verify(&self, password: &str, stored: &str) -> CryptoResult<bool> {
        let parsed =
            PasswordHash::new(stored).map_err(|e| CryptoError::MalformedHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CryptoError::Hashing(e.to_string())),
        }
    }
}

/// Whether a stored value is a complete PHC hash rather than a plaintext password.
pub fn is_phc_hash(stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|h| h.hash.is_some())
        .unwrap_or(false)
}

/// Compare two byte strings without short-circuiting on the first difference.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
