use std::sync::Arc;

use anyhow::{Context, Result};
use travel_agent::{TravelAgent, TravelAgentConfig, completion, telemetry, web};

fn main() -> Result<()> {
    let config = TravelAgentConfig::load()?;

    // Exporters use a blocking HTTP client, so they are set up and torn down
    // outside the async runtime
    let _telemetry = telemetry::init(&config.logging, &config.telemetry)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?
        .block_on(serve(config))
}

async fn serve(config: TravelAgentConfig) -> Result<()> {
    tracing::info!(
        version = travel_agent::VERSION,
        model = %config.completion.model,
        base_url = %config.completion.base_url,
        "Starting travel agent"
    );

    let client = completion::create_client(&config.completion)
        .context("Failed to create completion client")?;
    let agent = Arc::new(TravelAgent::new(client));

    web::run(agent, &config.server).await
}
