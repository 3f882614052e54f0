//! Guild role cache
//!
//! Role identity is decided against cached `name ↔ RoleId` maps instead of
//! re-fetching and string-matching the guild role list on every event. The
//! cache fills lazily the first time a guild is seen and refreshes when a
//! lookup misses; the promotion path inserts newly created roles directly.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serenity::all::{GuildId, Http, RoleId};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct GuildRoles {
    by_name: HashMap<String, RoleId>,
    by_id: HashMap<RoleId, String>,
}

#[derive(Debug, Default)]
pub struct RoleCache {
    guilds: RwLock<HashMap<GuildId, GuildRoles>>,
}

impl RoleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached entry for a guild with a fresh fetch.
    async fn refresh(&self, http: &Http, guild: GuildId) -> Result<()> {
        let roles = http
            .get_guild_roles(guild)
            .await
            .context("failed to fetch guild roles")?;

        let mut entry = GuildRoles::default();
        for role in roles {
            entry.by_id.insert(role.id, role.name.clone());
            entry.by_name.insert(role.name, role.id);
        }

        self.guilds.write().await.insert(guild, entry);
        Ok(())
    }

    async fn lookup(&self, guild: GuildId, name: &str) -> Option<RoleId> {
        self.guilds
            .read()
            .await
            .get(&guild)
            .and_then(|entry| entry.by_name.get(name))
            .copied()
    }

    /// Resolve a role id by name, refreshing the cache once on a miss.
    /// `None` means the guild genuinely has no role with that name.
    pub async fn resolve(
        &self,
        http: &Http,
        guild: GuildId,
        name: &str,
    ) -> Result<Option<RoleId>> {
        if let Some(id) = self.lookup(guild, name).await {
            return Ok(Some(id));
        }
        self.refresh(http, guild).await?;
        Ok(self.lookup(guild, name).await)
    }

    /// Cached id → name mapping; `None` when the guild is unknown or any
    /// id is missing from the cache.
    async fn names_from_cache(&self, guild: GuildId, role_ids: &[RoleId]) -> Option<Vec<String>> {
        let guilds = self.guilds.read().await;
        let entry = guilds.get(&guild)?;
        role_ids
            .iter()
            .map(|id| entry.by_id.get(id).cloned())
            .collect()
    }

    /// Map a member's held role ids to role names, refreshing once if any
    /// id is unknown (roles may have changed since the last fetch).
    pub async fn names_of(
        &self,
        http: &Http,
        guild: GuildId,
        role_ids: &[RoleId],
    ) -> Result<Vec<String>> {
        if let Some(names) = self.names_from_cache(guild, role_ids).await {
            return Ok(names);
        }

        self.refresh(http, guild).await?;

        // An id still unknown after a refresh belongs to a deleted role;
        // skip it rather than discarding the member's remaining roles.
        let guilds = self.guilds.read().await;
        let Some(entry) = guilds.get(&guild) else {
            return Ok(Vec::new());
        };
        Ok(role_ids
            .iter()
            .filter_map(|id| entry.by_id.get(id).cloned())
            .collect())
    }

    /// Record a role the bot just created, keeping the cache authoritative
    /// without a round-trip.
    pub async fn insert(&self, guild: GuildId, name: &str, id: RoleId) {
        let mut guilds = self.guilds.write().await;
        let entry = guilds.entry(guild).or_default();
        entry.by_name.insert(name.to_string(), id);
        entry.by_id.insert(id, name.to_string());
    }
}
