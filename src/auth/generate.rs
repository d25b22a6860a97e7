//! Reference record generator — produces the salts and digests that the
//! verifier checks against. Run at deploy time, never during a login.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;

use super::kdf::{self, KdfError, SALT_LEN};
use super::verifier::{EncodedReference, VerifierConfig};

/// Derive a reference record for one secret with a fresh random salt.
pub fn generate_reference(secret: &str, iterations: u32) -> Result<EncodedReference, KdfError> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    let digest = kdf::derive(secret, &salt, iterations)?;

    Ok(EncodedReference {
        salt_b64: STANDARD.encode(salt),
        dk_b64: STANDARD.encode(digest),
    })
}

/// Build a complete verifier config for an identifier/passphrase pair.
///
/// The identifier is trimmed, matching what the verifier does at login.
pub fn generate_config(identifier: &str, secret: &str, iterations: u32) -> Result<VerifierConfig, KdfError> {
    Ok(VerifierConfig {
        iterations,
        user: generate_reference(identifier.trim(), iterations)?,
        pass: generate_reference(secret, iterations)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_are_random_and_sized() {
        let a = generate_reference("same", 10).unwrap();
        let b = generate_reference("same", 10).unwrap();
        assert_ne!(a.salt_b64, b.salt_b64);
        assert_ne!(a.dk_b64, b.dk_b64);
        assert_eq!(STANDARD.decode(&a.salt_b64).unwrap().len(), SALT_LEN);
        assert_eq!(STANDARD.decode(&a.dk_b64).unwrap().len(), kdf::DIGEST_LEN);
    }

    #[test]
    fn digest_reproducible_from_salt() {
        let reference = generate_reference("s3cret", 50).unwrap();
        let salt = STANDARD.decode(&reference.salt_b64).unwrap();
        let digest = kdf::derive("s3cret", &salt, 50).unwrap();
        assert_eq!(STANDARD.encode(digest), reference.dk_b64);
    }

    #[test]
    fn zero_iterations_rejected() {
        assert_eq!(generate_config("a", "b", 0), Err(KdfError::ZeroIterations));
    }

    #[test]
    fn config_serializes_in_generator_shape() {
        let config = generate_config("Admin", "pw", 5).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["iterations"], 5);
        assert!(json["user"]["salt_b64"].is_string());
        assert!(json["user"]["dk_b64"].is_string());
        assert!(json["pass"]["salt_b64"].is_string());
        assert!(json["pass"]["dk_b64"].is_string());
    }
}
