//! Night Neighbors community bot
//!
//! Discord community management for a single guild:
//! - Button-based member verification
//! - Reaction-selected, mutually exclusive night-identity tracks
//! - XP per message with a five-stage rank ladder per track

pub mod commands;
pub mod config;
pub mod handler;
pub mod progression;
pub mod roles;
pub mod store;

// Re-exports for convenience
pub use config::BotConfig;
pub use handler::Handler;
pub use progression::Track;
pub use store::UserStore;
