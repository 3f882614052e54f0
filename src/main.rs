//! Night Neighbors community bot
//!
//! Verifies newcomers, hands out night-identity roles via reactions, and
//! promotes members up their track's rank ladder as they chat.

use anyhow::{Context, Result};
use serenity::all::{Client, GatewayIntents};
use tracing::info;
use tracing_subscriber::EnvFilter;

use night_neighbors::config::BotConfig;
use night_neighbors::handler::Handler;
use night_neighbors::store::UserStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::from_env().context("invalid configuration")?;

    let store = UserStore::load(&config.userdata_path)
        .await
        .context("failed to load user data")?;
    info!(
        users = store.len(),
        path = %config.userdata_path.display(),
        "user store loaded"
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let handler = Handler::new(config.clone(), store);
    let mut client = Client::builder(&config.token, intents)
        .event_handler(handler)
        .await
        .context("failed to build the Discord client")?;

    client.start().await.context("gateway client error")?;
    Ok(())
}
