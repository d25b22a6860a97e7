//! Session-scoped login state. Lives in memory only and disappears with
//! the process, the way browser session storage disappears with the tab.

use super::verifier::SessionCredential;

#[derive(Debug, Default)]
pub struct SessionStore {
    credential: Option<SessionCredential>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful login. Replaces any earlier credential.
    pub fn establish(&mut self, credential: SessionCredential) {
        self.credential = Some(credential);
        log::info!("[AUTH] Session established");
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// The opaque session token, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.credential.as_ref().map(SessionCredential::token)
    }

    /// Forget the credential. Dropping it zeroizes the token.
    pub fn clear(&mut self) {
        if self.credential.take().is_some() {
            log::info!("[AUTH] Session cleared");
        }
    }
}
