//! Credential verifier — derives both candidate secrets and compares them
//! against the reference digests shipped with the client.
//!
//! This is a UX gate, not a security boundary. The salts and digests live
//! in the client configuration, so anyone holding the binary can brute-force
//! them offline or skip the check entirely. Real authentication needs a
//! server-side collaborator.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::compare::constant_time_eq;
use super::kdf::{self, DIGEST_LEN, SALT_LEN};

/// Reference values embedded at build time (identifier "Admin").
const EMBEDDED_ITERATIONS: u32 = 210_000;
const EMBEDDED_USER_SALT: &str = "nvSOeiTErtRnxleTibkMRg==";
const EMBEDDED_USER_DK: &str = "AEXgeeuNPE5mJ03/p2iT/YD/68S7MkjDEmOhk38V5Zk=";
const EMBEDDED_PASS_SALT: &str = "qGsnla4d95myxARs4rL3OQ==";
const EMBEDDED_PASS_DK: &str = "UMCrpSk0GtSn4dymfJqCs2/V49qnDrxunuDDm8A20KY=";

/// Byte length of the random session token.
pub const TOKEN_LEN: usize = 16;

/// Base64-encoded salt + digest pair for one secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedReference {
    pub salt_b64: String,
    pub dk_b64: String,
}

/// Reference data for both secrets, as stored in configuration.
///
/// Serializes to `{"iterations": .., "user": {..}, "pass": {..}}`, the
/// same shape the reference generator prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    pub iterations: u32,
    pub user: EncodedReference,
    pub pass: EncodedReference,
}

impl VerifierConfig {
    /// The reference values compiled into the binary.
    pub fn embedded() -> Self {
        Self {
            iterations: EMBEDDED_ITERATIONS,
            user: EncodedReference {
                salt_b64: EMBEDDED_USER_SALT.to_string(),
                dk_b64: EMBEDDED_USER_DK.to_string(),
            },
            pass: EncodedReference {
                salt_b64: EMBEDDED_PASS_SALT.to_string(),
                dk_b64: EMBEDDED_PASS_DK.to_string(),
            },
        }
    }

    fn decode(&self) -> Result<(ReferenceCredential, ReferenceCredential), LoginError> {
        if self.iterations == 0 {
            return Err(LoginError::Config("iteration count is zero".to_string()));
        }
        let user = ReferenceCredential::decode(&self.user, self.iterations, "user")?;
        let pass = ReferenceCredential::decode(&self.pass, self.iterations, "pass")?;
        Ok((user, pass))
    }
}

/// Decoded reference record for one secret.
#[derive(Debug, Clone)]
pub struct ReferenceCredential {
    pub salt: [u8; SALT_LEN],
    pub iterations: u32,
    pub digest: [u8; DIGEST_LEN],
}

impl ReferenceCredential {
    fn decode(encoded: &EncodedReference, iterations: u32, label: &str) -> Result<Self, LoginError> {
        Ok(Self {
            salt: decode_fixed::<SALT_LEN>(&encoded.salt_b64, label, "salt")?,
            iterations,
            digest: decode_fixed::<DIGEST_LEN>(&encoded.dk_b64, label, "digest")?,
        })
    }
}

fn decode_fixed<const N: usize>(b64: &str, label: &str, field: &str) -> Result<[u8; N], LoginError> {
    if b64.is_empty() {
        return Err(LoginError::Config(format!("{} {} is empty", label, field)));
    }
    let bytes = STANDARD
        .decode(b64)
        .map_err(|e| LoginError::Config(format!("{} {} is not valid base64: {}", label, field, e)))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        LoginError::Config(format!(
            "{} {} has {} bytes, expected {}",
            label,
            field,
            bytes.len(),
            N
        ))
    })
}

/// Proof of a successful login for the lifetime of the session.
///
/// Holds a base64-encoded random token; zeroized on drop and never logged.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionCredential {
    token: String,
}

impl SessionCredential {
    fn issue() -> Self {
        let mut raw = [0u8; TOKEN_LEN];
        rand::rng().fill_bytes(&mut raw);
        let token = STANDARD.encode(raw);
        raw.zeroize();
        Self { token }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionCredential(<redacted>)")
    }
}

/// Checks an identifier/passphrase pair against the reference config.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    config: VerifierConfig,
}

impl CredentialVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// Verify both secrets synchronously.
    ///
    /// Both digests are always derived and compared, and a mismatch in
    /// either field yields the same `InvalidCredentials`. The identifier is
    /// trimmed; the passphrase is used as typed.
    pub fn verify(&self, identifier: &str, secret: &str) -> Result<SessionCredential, LoginError> {
        let result = self.check(identifier, secret);
        match &result {
            Ok(_) => log::info!("[AUTH] Login accepted, session credential issued"),
            Err(LoginError::InvalidCredentials) => log::warn!("[AUTH] Login rejected"),
            Err(e) => log::error!("[AUTH] Login failed: {}", e),
        }
        result
    }

    /// Verify on the blocking thread pool so the caller's event loop stays
    /// responsive during the iterated hashing.
    pub async fn verify_async(&self, identifier: &str, secret: &str) -> Result<SessionCredential, LoginError> {
        let verifier = self.clone();
        let identifier = identifier.to_string();
        let secret = Zeroizing::new(secret.to_string());

        tokio::task::spawn_blocking(move || verifier.verify(&identifier, &secret))
            .await
            .map_err(|e| {
                log::error!("[AUTH] Verification task failed: {}", e);
                LoginError::Unexpected(format!("verification task failed: {}", e))
            })?
    }

    fn check(&self, identifier: &str, secret: &str) -> Result<SessionCredential, LoginError> {
        let start = std::time::Instant::now();
        let (user_ref, pass_ref) = self.config.decode()?;

        let derived_user = Zeroizing::new(
            kdf::derive(identifier.trim(), &user_ref.salt, user_ref.iterations)
                .map_err(|e| LoginError::Unexpected(e.to_string()))?,
        );
        let derived_pass = Zeroizing::new(
            kdf::derive(secret, &pass_ref.salt, pass_ref.iterations)
                .map_err(|e| LoginError::Unexpected(e.to_string()))?,
        );

        let user_ok = constant_time_eq(derived_user.as_slice(), &user_ref.digest);
        let pass_ok = constant_time_eq(derived_pass.as_slice(), &pass_ref.digest);

        log::debug!(
            "[AUTH] Derived 2 digests ({} rounds) in {}ms",
            user_ref.iterations,
            start.elapsed().as_millis()
        );

        if user_ok & pass_ok {
            Ok(SessionCredential::issue())
        } else {
            Err(LoginError::InvalidCredentials)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Verifier configuration is malformed: {0}")]
    Config(String),

    #[error("Unexpected verifier error: {0}")]
    Unexpected(String),
}

impl LoginError {
    /// Localization key of the message shown to the user.
    ///
    /// Configuration bugs and runtime faults share one generic message.
    pub fn message_key(&self) -> &'static str {
        match self {
            LoginError::InvalidCredentials => "login_error_invalid",
            LoginError::Config(_) | LoginError::Unexpected(_) => "login_error_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::generate::generate_config;

    fn cheap_verifier() -> CredentialVerifier {
        CredentialVerifier::new(generate_config("alice", "correct horse", 1000).unwrap())
    }

    #[test]
    fn accepts_matching_pair() {
        let credential = cheap_verifier().verify("alice", "correct horse").unwrap();
        let raw = STANDARD.decode(credential.token()).unwrap();
        assert_eq!(raw.len(), TOKEN_LEN);
    }

    #[test]
    fn identifier_is_trimmed_secret_is_not() {
        let verifier = cheap_verifier();
        assert!(verifier.verify("  alice \n", "correct horse").is_ok());
        assert!(matches!(
            verifier.verify("alice", " correct horse"),
            Err(LoginError::InvalidCredentials)
        ));
    }

    #[test]
    fn either_field_wrong_gives_same_error() {
        let verifier = cheap_verifier();
        let wrong_user = verifier.verify("bob", "correct horse").unwrap_err();
        let wrong_pass = verifier.verify("alice", "battery staple").unwrap_err();
        let both_wrong = verifier.verify("bob", "battery staple").unwrap_err();

        for err in [&wrong_user, &wrong_pass, &both_wrong] {
            assert!(matches!(err, LoginError::InvalidCredentials));
            assert_eq!(err.message_key(), "login_error_invalid");
            assert_eq!(err.to_string(), "Invalid credentials");
        }
    }

    #[test]
    fn tokens_are_fresh_per_login() {
        let verifier = cheap_verifier();
        let a = verifier.verify("alice", "correct horse").unwrap();
        let b = verifier.verify("alice", "correct horse").unwrap();
        assert_ne!(a.token(), b.token());
    }

    #[test]
    fn malformed_base64_is_config_error() {
        let mut config = generate_config("alice", "pw", 10).unwrap();
        config.user.salt_b64 = "%%% not base64".to_string();
        let err = CredentialVerifier::new(config).verify("alice", "pw").unwrap_err();
        assert!(matches!(err, LoginError::Config(_)));
        assert_eq!(err.message_key(), "login_error_failed");
    }

    #[test]
    fn wrong_digest_length_is_config_error() {
        let mut config = generate_config("alice", "pw", 10).unwrap();
        config.pass.dk_b64 = STANDARD.encode([0u8; 20]);
        let err = CredentialVerifier::new(config).verify("alice", "pw").unwrap_err();
        assert!(matches!(err, LoginError::Config(ref msg) if msg.contains("expected 32")));
    }

    #[test]
    fn empty_salt_is_config_error() {
        let mut config = generate_config("alice", "pw", 10).unwrap();
        config.pass.salt_b64.clear();
        let err = CredentialVerifier::new(config).verify("alice", "pw").unwrap_err();
        assert!(matches!(err, LoginError::Config(_)));
    }

    #[test]
    fn zero_iterations_is_config_error() {
        let mut config = generate_config("alice", "pw", 10).unwrap();
        config.iterations = 0;
        let err = CredentialVerifier::new(config).verify("alice", "pw").unwrap_err();
        assert!(matches!(err, LoginError::Config(_)));
    }

    #[test]
    fn credential_debug_hides_token() {
        let credential = cheap_verifier().verify("alice", "correct horse").unwrap();
        let debug = format!("{:?}", credential);
        assert!(!debug.contains(credential.token()));
    }

    #[test]
    fn embedded_config_decodes() {
        let (user, pass) = VerifierConfig::embedded().decode().unwrap();
        assert_eq!(user.iterations, 210_000);
        assert_ne!(user.salt, pass.salt);
    }

    #[tokio::test]
    async fn async_verification_matches_sync() {
        let verifier = cheap_verifier();
        assert!(verifier.verify_async("alice", "correct horse").await.is_ok());
        assert!(matches!(
            verifier.verify_async("alice", "nope").await,
            Err(LoginError::InvalidCredentials)
        ));
    }
}
