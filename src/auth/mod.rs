//! Login gate — public API.
//!
//! Verifies an identifier/passphrase pair against salted PBKDF2 digests
//! without ever holding the plaintext references, and keeps the resulting
//! session credential in memory.

pub mod compare;
pub mod generate;
pub mod kdf;
pub mod session;
pub mod verifier;

pub use generate::{generate_config, generate_reference};
pub use session::SessionStore;
pub use verifier::{
    CredentialVerifier, EncodedReference, LoginError, SessionCredential, VerifierConfig,
};
