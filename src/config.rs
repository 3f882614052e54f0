//! Bot configuration
//!
//! Everything tunable lives here: environment-driven settings (token,
//! announcement channel, data file) and the XP tuning constants.

use std::env;
use std::path::PathBuf;

use serenity::all::ChannelId;
use thiserror::Error;

/// XP granted for every non-bot message.
pub const XP_PER_MESSAGE: u64 = 5;

/// XP required per level; `level = xp / XP_PER_LEVEL`.
pub const XP_PER_LEVEL: u64 = 50;

/// Levels required per ladder stage; `stage = level / LEVELS_PER_STAGE`.
pub const LEVELS_PER_STAGE: u64 = 15;

/// Channel that receives level-up announcements and leaderboard mirrors.
const DEFAULT_ANNOUNCE_CHANNEL: u64 = 1_402_310_010_259_771_593;

/// Path of the persisted user store.
const DEFAULT_USERDATA_PATH: &str = "userdata.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN is not set")]
    MissingToken,
    #[error("ANNOUNCE_CHANNEL_ID is not a valid channel id: {0}")]
    BadChannelId(String),
}

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord bot token.
    pub token: String,
    /// Announcement channel for promotions and leaderboard mirrors.
    pub announce_channel: ChannelId,
    /// Location of the persisted user store.
    pub userdata_path: PathBuf,
}

impl BotConfig {
    /// Resolve configuration from the environment (after dotenv has run),
    /// falling back to defaults for everything except the token.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var("DISCORD_TOKEN").map_err(|_| ConfigError::MissingToken)?;

        let announce_channel = match env::var("ANNOUNCE_CHANNEL_ID") {
            Ok(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|id| *id != 0)
                .map(ChannelId::new)
                .ok_or(ConfigError::BadChannelId(raw))?,
            Err(_) => ChannelId::new(DEFAULT_ANNOUNCE_CHANNEL),
        };

        let userdata_path = env::var("USERDATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_USERDATA_PATH));

        Ok(Self {
            token,
            announce_channel,
            userdata_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_divisors() {
        // Ten messages reach exactly one level.
        assert_eq!(10 * XP_PER_MESSAGE / XP_PER_LEVEL, 1);
        // A full ladder stage takes 15 levels.
        assert_eq!(29 / LEVELS_PER_STAGE, 1);
        assert_eq!(75 / LEVELS_PER_STAGE, 5);
    }
}
