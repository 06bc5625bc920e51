use anyhow::bail;
use invoicer_core::ClientConfig;
use invoicer_session::{Credentials, FileSessionPersistence, SessionStore};
use std::sync::Arc;

pub const NOT_SIGNED_IN: &str = "Not signed in. Run `invoicer login` first.";

/// Session store backed by the JSON file at `config.session_path`.
pub fn open_session_store(config: &ClientConfig) -> SessionStore {
    SessionStore::new(
        Credentials::new(config.username.clone(), config.password.clone()),
        Arc::new(FileSessionPersistence::new(config.session_path.clone())),
    )
}

/// Fail unless a user is signed in.
pub async fn require_session(store: &SessionStore) -> anyhow::Result<()> {
    if !store.is_authenticated().await {
        bail!(NOT_SIGNED_IN);
    }
    Ok(())
}
