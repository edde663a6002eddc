//! # quill-crypto
//!
//! Password hashing for note locks.
//!
//! Lock passwords are never stored in the clear: the repository keeps an
//! Argon2id PHC string in the note's `password` field and verifies
//! unlock attempts against it.
//!
//! ## Example
//!
//! ```rust
//! use quill_crypto::{KdfParams, LockHasher};
//!
//! let hasher = LockHasher::new(KdfParams::low_memory());
//! let stored = hasher.hash("2468").unwrap();
//! assert!(hasher.verify("2468", &stored).unwrap());
//! assert!(!hasher.verify("1357", &stored).unwrap());
//! ```

pub mod error;
pub mod password;

pub use error::{CryptoError, CryptoResult};
pub use password::{constant_time_eq, is_phc_hash, KdfParams, LockHasher, SALT_LENGTH};
