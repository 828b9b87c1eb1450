//! Session state: auth token presence and the generation counter.
//!
//! Everything that reads or writes client-local state goes through a
//! [`Session`], which is built once at startup and passed to the gate and
//! pipeline.

mod storage;

use std::sync::Arc;

pub use storage::{
    FileStorage, KeyringStorage, MemoryStorage, Storage, GENERATION_COUNT_KEY, TOKEN_KEY,
};

use crate::error::{Error, Result};
use crate::generation::QuotaStore;

/// Opaque credential issued by the auth service.
///
/// Never inspected; only its presence matters.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token. Blank input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() { None } else { Some(Self(raw)) }
    }

    /// The raw token, for sending to services that expect it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Explicit session state handed to the gate and pipeline.
#[derive(Clone)]
pub struct Session {
    tokens: Arc<dyn Storage>,
    quota: QuotaStore,
}

impl Session {
    /// Create a session; the token and the counter may live in different stores.
    pub fn new(tokens: Arc<dyn Storage>, counters: Arc<dyn Storage>) -> Self {
        let session = Self { tokens, quota: QuotaStore::new(counters) };
        tracing::debug!(
            authenticated = session.is_authenticated(),
            generations = session.quota.read(),
            "Session opened"
        );
        session
    }

    /// A session that persists nothing.
    pub fn in_memory() -> Self {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        Self::new(Arc::clone(&storage), storage)
    }

    /// Stored auth token, if any. Read failures count as absent.
    pub fn auth_token(&self) -> Option<AuthToken> {
        match self.tokens.get(TOKEN_KEY) {
            Ok(raw) => raw.and_then(AuthToken::new),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read auth token");
                None
            },
        }
    }

    /// Whether a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.auth_token().is_some()
    }

    /// Persist a token issued by the auth service.
    pub fn store_token(&self, token: &AuthToken) -> Result<()> {
        self.tokens.set(TOKEN_KEY, token.expose())
    }

    /// Remove the stored token (logout).
    pub fn clear_token(&self) -> Result<()> {
        self.tokens.remove(TOKEN_KEY)
    }

    /// The generation counter.
    pub fn quota(&self) -> &QuotaStore {
        &self.quota
    }

    /// Require a token.
    pub fn require_token(&self) -> Result<AuthToken> {
        self.auth_token().ok_or(Error::AuthRequired)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("authenticated", &self.is_authenticated()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_absent() {
        assert!(AuthToken::new("").is_none());
        assert!(AuthToken::new("  \n").is_none());
        // Surrounding whitespace only matters for the blank check.
        assert_eq!(AuthToken::new(" abc ").unwrap().expose(), " abc ");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("secret").unwrap();
        assert_eq!(format!("{token:?}"), "AuthToken(***)");
    }

    #[test]
    fn test_login_logout() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());
        assert!(matches!(session.require_token(), Err(Error::AuthRequired)));

        session.store_token(&AuthToken::new("t0k3n").unwrap()).unwrap();
        assert!(session.is_authenticated());

        session.clear_token().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_token_and_counter_stores_are_separate() {
        let tokens = MemoryStorage::with_entries([(TOKEN_KEY, "abc")]);
        let counters = MemoryStorage::with_entries([(GENERATION_COUNT_KEY, "1")]);
        let session = Session::new(Arc::new(tokens.clone()), Arc::new(counters.clone()));

        session.quota().increment().unwrap();
        assert_eq!(counters.get(GENERATION_COUNT_KEY).unwrap().as_deref(), Some("2"));
        assert_eq!(tokens.get(GENERATION_COUNT_KEY).unwrap(), None);
        assert!(session.is_authenticated());
    }
}
