//! Tool Agent - terminal entry point.
//!
//! Opens the database, builds the agent and starts the interactive console.

use std::sync::Arc;

use tool_agent::{config::Config, console, Agent, Store};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (stderr, so it does not interleave with the console)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tool_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.model);

    let store = Arc::new(Store::open(&config.database_path)?);
    let agent = Agent::from_config(&config, store.clone())?;

    console::run(agent, store).await
}
