use std::sync::Arc;

use anyhow::Context;

use bloodbank_api::config::AppConfig;
use bloodbank_infra::BloodBankService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("invalid configuration")?;
    bloodbank_observability::init(&config.telemetry);

    let service = BloodBankService::open(&config.database)
        .await
        .context("failed to open the blood bank database")?;

    let app = bloodbank_api::app::build_app(Arc::new(service));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
