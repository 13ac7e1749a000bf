//! Bot setup
//!
//! Wires the store, the platform client and the caches into a
//! [`BotContext`] and runs the gateway client.

use std::sync::Arc;

use counter_common::{AppError, BotConfig};
use counter_core::Snowflake;
use counter_db::{create_pool, ensure_schema, PgCounterRepository, PgLeaderboardRepository};
use counter_service::{BotContext, BotContextBuilder, GuildCache};

use crate::client::GatewayClient;
use crate::rest::RestClient;

/// Initialize all dependencies and create the `BotContext`
pub async fn create_bot_context(config: &BotConfig) -> Result<BotContext, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = counter_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    ensure_schema(&pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to prepare schema: {e}")))?;
    tracing::info!("PostgreSQL connection established");

    let counter_repo = Arc::new(PgCounterRepository::new(pool.clone()));
    let leaderboard_repo = Arc::new(PgLeaderboardRepository::new(pool));

    let platform =
        Arc::new(RestClient::new(&config.platform).map_err(|e| AppError::platform(e.to_string()))?);

    // Replaced by the real user ID once READY arrives
    let bot_user_id = Snowflake::new(config.platform.application_id as i64);

    let ctx = BotContextBuilder::new()
        .counter_repo(counter_repo)
        .leaderboard_repo(leaderboard_repo)
        .platform(platform)
        .guilds(GuildCache::new_shared())
        .prefix(config.commands.prefix.clone())
        .bot_user_id(bot_user_id)
        .build()?;

    let tracked = ctx.counter_repo().list_channels().await?;
    tracing::info!(channels = tracked.len(), "Counting channels loaded");

    Ok(ctx)
}

/// Run the bot with configuration until a fatal error occurs
pub async fn run(config: BotConfig) -> Result<(), AppError> {
    let ctx = create_bot_context(&config).await?;

    tracing::info!(prefix = %ctx.prefix(), "Starting gateway client");
    GatewayClient::new(&ctx, &config.platform).run().await?;

    Ok(())
}
