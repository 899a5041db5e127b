use std::error::Error;

use ai_llm_service::telemetry;
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter("info"))
        .with(
            fmt::layer()
                .with_target(false)
                .with_filter(telemetry::exclude_library()),
        )
        .with(telemetry::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting contract analyzer");
    api::start().await?;

    Ok(())
}
