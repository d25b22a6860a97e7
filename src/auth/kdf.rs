//! PBKDF2-HMAC-SHA256 key derivation. Pure function, no I/O.
//!
//! The login gate stores only salted, iterated digests of the identifier
//! and passphrase. This module turns a candidate secret into a digest that
//! can be compared against them.

use sha2::Sha256;

/// Length of every derived digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Length of every reference salt in bytes.
pub const SALT_LEN: usize = 16;

/// Work factor used for newly generated reference records.
pub const DEFAULT_ITERATIONS: u32 = 210_000;

/// Derive a 32-byte digest from `secret` with PBKDF2-HMAC-SHA256.
///
/// Deterministic: identical inputs always produce identical digests.
pub fn derive(secret: &str, salt: &[u8], iterations: u32) -> Result<[u8; DIGEST_LEN], KdfError> {
    if salt.is_empty() {
        return Err(KdfError::EmptySalt);
    }
    if iterations == 0 {
        return Err(KdfError::ZeroIterations);
    }

    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, iterations, &mut digest);
    Ok(digest)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KdfError {
    #[error("Salt must not be empty")]
    EmptySalt,

    #[error("Iteration count must be positive")]
    ZeroIterations,
}
