//! In-process cache for the session token set.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Tokens proving an authenticated session, as issued at sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Identity token (carries profile and group claims).
    pub id_token: String,
    /// Access token (presented back to the provider on user calls).
    pub access_token: String,
    /// Refresh token, when the pool issues one.
    pub refresh_token: Option<String>,
    /// Absolute expiry of the access token.
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// Build a token set from an authentication result's relative TTL.
    pub fn new(
        id_token: String,
        access_token: String,
        refresh_token: Option<String>,
        expires_in_secs: i64,
    ) -> Self {
        Self {
            id_token,
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    /// Whether the access token's recorded TTL has elapsed.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Shared cache of the current token set.
///
/// One writer at a time replaces the whole value: set on sign-in,
/// cleared on sign-out or when the provider reports the session gone.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<TokenSet>>>,
}

impl TokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current token set, if any.
    pub fn get(&self) -> Option<TokenSet> {
        self.inner.read().expect("token store lock poisoned").clone()
    }

    /// Whether a token set is present at all. Cheap precondition used
    /// to short-circuit the signed-out case.
    pub fn is_present(&self) -> bool {
        self.inner.read().expect("token store lock poisoned").is_some()
    }

    /// Replace the cached token set wholesale.
    pub fn replace(&self, tokens: TokenSet) {
        *self.inner.write().expect("token store lock poisoned") = Some(tokens);
    }

    /// Drop the cached token set.
    pub fn clear(&self) {
        *self.inner.write().expect("token store lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_set(expires_in_secs: i64) -> TokenSet {
        TokenSet::new(
            "id".to_string(),
            "access".to_string(),
            Some("refresh".to_string()),
            expires_in_secs,
        )
    }

    #[test]
    fn test_store_roundtrip() {
        let store = TokenStore::new();
        assert!(!store.is_present());
        assert!(store.get().is_none());

        store.replace(token_set(3600));
        assert!(store.is_present());
        assert_eq!(store.get().unwrap().access_token, "access");

        store.clear();
        assert!(!store.is_present());
    }

    #[test]
    fn test_store_clones_share_state() {
        let store = TokenStore::new();
        let view = store.clone();
        store.replace(token_set(3600));
        assert!(view.is_present());
        view.clear();
        assert!(!store.is_present());
    }

    #[test]
    fn test_expiry() {
        assert!(!token_set(3600).is_expired());
        assert!(token_set(-1).is_expired());
    }
}
