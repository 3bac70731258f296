use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{Level, warn};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env when present; plain env otherwise.
    let dotenv = dotenvy::dotenv();

    let filter = telemetry::env_filter("info", &[("downtime_segments", Level::DEBUG)]);

    // Backend crates get the detailed layer, everything else a plain one.
    let foreign = fmt::layer()
        .with_target(false)
        .with_filter(filter::filter_fn(|meta| {
            !telemetry::is_own_target(meta.target())
        }));

    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry::layer())
        .with(foreign)
        .try_init()?;

    if let Err(e) = dotenv {
        warn!(error = %e, "no .env loaded, using process environment");
    }

    api::start().await?;

    Ok(())
}
