use crate::traits::{SessionError, SessionPersistence, SessionResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Session persistence backed by a JSON object on the local filesystem
/// (e.g. `~/.config/invoicer/session.json`).
///
/// The file holds a flat string-to-string map. A missing file reads as an
/// empty session; parent directories are created on first write.
#[derive(Debug)]
pub struct FileSessionPersistence {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSessionPersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> SessionResult<HashMap<String, String>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(SessionError::ReadFailed(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if raw.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(HashMap::new());
        }

        serde_json::from_slice(&raw).map_err(|e| {
            SessionError::Corrupt(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Current values as the starting point for a write, and whether the file
    /// was corrupt. A corrupt file is discarded so the write replaces it.
    async fn load_for_write(&self) -> SessionResult<(HashMap<String, String>, bool)> {
        match self.load().await {
            Ok(values) => Ok((values, false)),
            Err(SessionError::Corrupt(reason)) => {
                tracing::warn!(path = %self.path.display(), reason = %reason, "Discarding corrupt session file");
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn store(&self, values: &HashMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec_pretty(values)
            .map_err(|e| SessionError::WriteFailed(e.to_string()))?;

        fs::write(&self.path, body).await.map_err(|e| {
            SessionError::WriteFailed(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), keys = values.len(), "Session file written");
        Ok(())
    }
}

#[async_trait]
impl SessionPersistence for FileSessionPersistence {
    async fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let _guard = self.lock.lock().await;
        let (mut values, _) = self.load_for_write().await?;
        values.insert(key.to_string(), value.to_string());
        self.store(&values).await
    }

    async fn remove(&self, key: &str) -> SessionResult<()> {
        let _guard = self.lock.lock().await;
        let (mut values, corrupt) = self.load_for_write().await?;
        if values.remove(key).is_none() && !corrupt {
            return Ok(());
        }
        self.store(&values).await
    }
}
