//! Sign-in state for front ends.
//!
//! The credential check is a plain equality test against one configured pair.

use crate::traits::SessionPersistence;
use std::fmt;
use std::sync::Arc;

/// Key under which the signed-in flag is stored.
pub const AUTH_KEY: &str = "auth_token";
const AUTH_VALUE: &str = "true";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("admin", "admin")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session store
///
/// Persistence failures never surface to callers: a failed read counts as
/// signed out and failed writes are logged.
#[derive(Clone)]
pub struct SessionStore {
    credentials: Credentials,
    persistence: Arc<dyn SessionPersistence>,
}

impl SessionStore {
    pub fn new(credentials: Credentials, persistence: Arc<dyn SessionPersistence>) -> Self {
        Self {
            credentials,
            persistence,
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        match self.persistence.get(AUTH_KEY).await {
            Ok(value) => value.as_deref() == Some(AUTH_VALUE),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session, treating as signed out");
                false
            }
        }
    }

    /// Returns `true` and sets the flag when the credentials match. A mismatch
    /// leaves the stored state untouched.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        if !self.credentials.matches(username, password) {
            tracing::info!(username = %username, "Sign-in rejected");
            return false;
        }

        if let Err(e) = self.persistence.set(AUTH_KEY, AUTH_VALUE).await {
            tracing::error!(error = %e, "Failed to persist session");
            return false;
        }

        tracing::info!(username = %username, "Signed in");
        true
    }

    pub async fn logout(&self) {
        match self.persistence.remove(AUTH_KEY).await {
            Ok(()) => tracing::info!("Signed out"),
            Err(e) => tracing::error!(error = %e, "Failed to clear session"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileSessionPersistence, MemorySessionPersistence};
    use tempfile::TempDir;

    fn memory_store() -> SessionStore {
        SessionStore::new(
            Credentials::default(),
            Arc::new(MemorySessionPersistence::new()),
        )
    }

    #[tokio::test]
    async fn test_login_with_default_credentials() {
        let store = memory_store();
        assert!(!store.is_authenticated().await);
        assert!(store.login("admin", "admin").await);
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_wrong_credentials_do_not_sign_out() {
        let store = memory_store();
        assert!(!store.login("admin", "wrong").await);
        assert!(!store.is_authenticated().await);

        assert!(store.login("admin", "admin").await);
        assert!(!store.login("root", "admin").await);
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_clears_flag() {
        let store = memory_store();
        store.logout().await;
        assert!(!store.is_authenticated().await);

        store.login("admin", "admin").await;
        store.logout().await;
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_only_literal_true_counts() {
        let persistence = Arc::new(MemorySessionPersistence::new());
        persistence.set(AUTH_KEY, "yes").await.unwrap();
        let store = SessionStore::new(Credentials::default(), persistence);
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_custom_credentials() {
        let store = SessionStore::new(
            Credentials::new("clerk", "s3cret"),
            Arc::new(MemorySessionPersistence::new()),
        );
        assert!(!store.login("admin", "admin").await);
        assert!(store.login("clerk", "s3cret").await);
    }

    #[tokio::test]
    async fn test_session_persists_across_stores() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let first = SessionStore::new(
            Credentials::default(),
            Arc::new(FileSessionPersistence::new(&path)),
        );
        assert!(first.login("admin", "admin").await);

        let second = SessionStore::new(
            Credentials::default(),
            Arc::new(FileSessionPersistence::new(&path)),
        );
        assert!(second.is_authenticated().await);

        second.logout().await;
        assert!(!first.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_corrupt_session_reads_as_signed_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{broken").unwrap();

        let store = SessionStore::new(
            Credentials::default(),
            Arc::new(FileSessionPersistence::new(&path)),
        );
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_repairs_corrupt_session_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{truncated").unwrap();

        let store = SessionStore::new(
            Credentials::default(),
            Arc::new(FileSessionPersistence::new(&path)),
        );
        assert!(store.login("admin", "admin").await);
        assert!(store.is_authenticated().await);

        std::fs::write(&path, b"{truncated").unwrap();
        store.logout().await;
        assert!(!store.is_authenticated().await);
        assert!(store.login("admin", "admin").await);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
