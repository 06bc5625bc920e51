use anyhow::Context;
use invoicer_core::MockServerConfig;
use invoicer_infra::{init_telemetry, LogFormat};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = MockServerConfig::from_env()?;

    init_telemetry("invoicer=info,invoicer_mock_api=info,tower_http=info", LogFormat::from_env())
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    let (_state, router) = invoicer_mock_api::setup::initialize_app(&config)
        .await
        .context("Failed to initialize mock API")?;

    invoicer_mock_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
