use crate::traits::{SessionPersistence, SessionResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local persistence. Everything is lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemorySessionPersistence {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySessionPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionPersistence for MemorySessionPersistence {
    async fn get(&self, key: &str) -> SessionResult<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> SessionResult<()> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemorySessionPersistence::new();
        assert_eq!(store.get("auth_token").await.unwrap(), None);

        store.set("auth_token", "true").await.unwrap();
        assert_eq!(store.get("auth_token").await.unwrap().as_deref(), Some("true"));

        store.remove("auth_token").await.unwrap();
        assert_eq!(store.get("auth_token").await.unwrap(), None);

        // Removing an absent key is fine
        store.remove("auth_token").await.unwrap();
    }
}
