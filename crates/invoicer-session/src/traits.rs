//! Session persistence abstraction

use async_trait::async_trait;
use thiserror::Error;

/// Session persistence errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session: {0}")]
    ReadFailed(String),

    #[error("Failed to write session: {0}")]
    WriteFailed(String),

    #[error("Corrupt session data: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for session persistence operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Key/value store backing the session flag.
///
/// Implementations must tolerate a key that was never set: `get` returns
/// `Ok(None)` and `remove` succeeds.
#[async_trait]
pub trait SessionPersistence: Send + Sync {
    async fn get(&self, key: &str) -> SessionResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    async fn remove(&self, key: &str) -> SessionResult<()>;
}
