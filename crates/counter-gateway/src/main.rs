//! Counting bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p counter-gateway --bin counter-bot
//! ```
//!
//! Configuration is loaded from environment variables.

use counter_common::{try_init_tracing_with_config, BotConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        app = %config.app.name,
        env = ?config.app.env,
        platform = ?config.platform,
        "Configuration loaded"
    );

    // Run the bot
    if let Err(e) = counter_gateway::run(config).await {
        error!(error = %e, code = e.code(), "Bot stopped");
        std::process::exit(1);
    }
}
