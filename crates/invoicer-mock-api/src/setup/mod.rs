//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::MockApiState;
use anyhow::Result;
use invoicer_core::MockServerConfig;
use std::sync::Arc;

/// Build the seeded state and the router serving it.
pub async fn initialize_app(config: &MockServerConfig) -> Result<(Arc<MockApiState>, axum::Router)> {
    let state = Arc::new(MockApiState::seeded());
    tracing::info!(invoices = state.len().await, "Mock invoice store seeded");

    let router = routes::setup_routes(config, state.clone())?;

    Ok((state, router))
}
