//! Client session
//!
//! The session is a token plus a user id, persisted under the keys
//! `token` and `userId` of the local store. [`SessionContext`] is the only
//! accessor pages use; token quoting is normalized here, once, on the way in
//! and on the way out.

mod store;
mod validator;

pub use store::{FileBackend, LocalStore, MemoryBackend, StorageBackend, StoreError, StoreResult};
pub use validator::{
    EmbeddedTokenValidator, EndpointValidator, SessionValidator, Validation,
};

/// Local store key of the session token
pub const TOKEN_KEY: &str = "token";

/// Local store key of the logged-in user id
pub const USER_ID_KEY: &str = "userId";

/// An established session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    /// May be missing after a partial write
    pub user_id: Option<i64>,
}

/// Trim whitespace and strip one surrounding pair of `"` quotes.
///
/// Tokens have been stored both JSON-quoted and raw; comparisons and
/// `Authorization` headers always use this form.
pub fn normalize_token(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Typed session accessor over the local store
#[derive(Debug, Clone)]
pub struct SessionContext {
    store: LocalStore,
}

impl SessionContext {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Session kept in memory only
    pub fn in_memory() -> Self {
        Self::new(LocalStore::in_memory())
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Stored token, normalized. Empty tokens read as absent.
    pub fn token(&self) -> Option<String> {
        let raw = self.store.get_raw(TOKEN_KEY)?;
        let token = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::String(s)) => normalize_token(&s),
            _ => normalize_token(&raw),
        };
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    /// Stored user id, whether written as a number or a string
    pub fn user_id(&self) -> Option<i64> {
        let raw = self.store.get_raw(USER_ID_KEY)?;
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Number(n)) => n.as_i64(),
            Ok(serde_json::Value::String(s)) => normalize_token(&s).parse().ok(),
            _ => normalize_token(&raw).parse().ok(),
        }
    }

    /// Current session. A user id without a token is not a session.
    pub fn get_session(&self) -> Option<Session> {
        let token = self.token()?;
        Some(Session {
            token,
            user_id: self.user_id(),
        })
    }

    /// Persist both halves of a session
    /// Store both halves of a session. A failed id write removes the token
    /// again so no partial session is left behind.
    pub fn set_session(&self, token: &str, user_id: i64) -> StoreResult<()> {
        self.set_token(token)?;
        if let Err(e) = self.set_user_id(user_id) {
            tracing::warn!(error = %e, "Failed to store user id, discarding token");
            if let Err(clear) = self.store.clear(TOKEN_KEY) {
                tracing::warn!(error = %clear, "Failed to discard token");
            }
            return Err(e);
        }
        Ok(())
    }

    pub fn set_token(&self, token: &str) -> StoreResult<()> {
        self.store.set(TOKEN_KEY, &normalize_token(token))
    }

    pub fn set_user_id(&self, user_id: i64) -> StoreResult<()> {
        self.store.set(USER_ID_KEY, &user_id)
    }

    /// Forget the session
    pub fn clear_session(&self) -> StoreResult<()> {
        self.store.clear(TOKEN_KEY)?;
        self.store.clear(USER_ID_KEY)?;
        tracing::info!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("\"abc\""), "abc");
        assert_eq!(normalize_token("  abc \n"), "abc");
        assert_eq!(normalize_token("\"abc"), "abc");
        assert_eq!(normalize_token("\"\"abc\"\""), "\"abc\"");
        assert_eq!(normalize_token(""), "");
    }

    #[test]
    fn test_token_read_from_both_encodings() {
        let session = SessionContext::in_memory();

        session.store().set_raw(TOKEN_KEY, "raw-token").unwrap();
        assert_eq!(session.token().as_deref(), Some("raw-token"));

        session.store().set_raw(TOKEN_KEY, "\"quoted-token\"").unwrap();
        assert_eq!(session.token().as_deref(), Some("quoted-token"));

        // Double-encoded: a JSON string whose content is still quoted
        session.store().set_raw(TOKEN_KEY, r#""\"inner\"""#).unwrap();
        assert_eq!(session.token().as_deref(), Some("inner"));
    }

    #[test]
    fn test_user_id_read_from_number_or_string() {
        let session = SessionContext::in_memory();

        session.store().set_raw(USER_ID_KEY, "12").unwrap();
        assert_eq!(session.user_id(), Some(12));

        session.store().set_raw(USER_ID_KEY, "\"13\"").unwrap();
        assert_eq!(session.user_id(), Some(13));

        session.store().set_raw(USER_ID_KEY, "abc").unwrap();
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_user_id_without_token_is_no_session() {
        let session = SessionContext::in_memory();
        session.set_user_id(5).unwrap();
        assert!(session.get_session().is_none());
        assert_eq!(session.user_id(), Some(5));
    }

    #[test]
    fn test_set_and_clear_session() {
        let session = SessionContext::in_memory();
        session.set_session("\"tok-1\"", 1).unwrap();

        assert_eq!(
            session.get_session(),
            Some(Session {
                token: "tok-1".to_string(),
                user_id: Some(1),
            })
        );
        assert_eq!(session.store().get_raw(TOKEN_KEY).as_deref(), Some("\"tok-1\""));

        session.clear_session().unwrap();
        assert!(session.get_session().is_none());
        assert!(session.user_id().is_none());
    }

    /// Memory store that refuses writes to one key
    struct RejectingBackend {
        inner: MemoryBackend,
        rejected: &'static str,
    }

    impl StorageBackend for RejectingBackend {
        fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
            if key == self.rejected {
                return Err(StoreError::Lock(format!("{} is read-only", key)));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> StoreResult<()> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_failed_user_id_write_leaves_no_token() {
        let backend = RejectingBackend {
            inner: MemoryBackend::new(),
            rejected: USER_ID_KEY,
        };
        let session = SessionContext::new(LocalStore::new(std::sync::Arc::new(backend)));

        assert!(session.set_session("tok-1", 1).is_err());
        assert!(session.token().is_none());
        assert!(session.get_session().is_none());
    }

    #[test]
    fn test_empty_token_is_absent() {
        let session = SessionContext::in_memory();
        session.store().set(TOKEN_KEY, "").unwrap();
        assert!(session.token().is_none());
    }
}
