//! Fighting game client binary.
//!
//! This binary is the composition root: it reads configuration from the
//! environment, sets up logging, plays one CPU vs CPU match and prints a JSON
//! summary on stdout.
//!
//! # Examples
//!
//! ```bash
//! # Default built-in roster, one versus match
//! cargo run -p fight-client
//!
//! # Training mode for ten seconds, debug logs to a file
//! FIGHT_MODE=training FIGHT_MAX_TICKS=600 FIGHT_LOG_DIR=logs RUST_LOG=debug \
//!     cargo run -p fight-client
//! ```

use anyhow::Result;
use fight_client::{Client, ClientConfig, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting fight client");
    tracing::debug!(?config, "Client configuration");

    let client = Client::builder().config(config).build().await?;
    let summary = client.run().await?;

    println!("{}", serde_json::to_string_pretty(&summary.to_json())?);
    Ok(())
}
