//! Persisted user store
//!
//! XP/level records for every member who has ever chatted, keyed by the
//! Discord user id as a decimal string. The whole map lives in memory and
//! is rewritten to disk in full after every mutation; the file is a single
//! human-readable JSON object.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use tokio::fs;

use crate::config::XP_PER_LEVEL;

/// A single member's progress. Invariant: `level == xp / XP_PER_LEVEL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub xp: u64,
    pub level: u64,
}

/// Result of awarding XP for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwardOutcome {
    /// The record after the award.
    pub record: UserRecord,
    /// Whether the award crossed a level boundary.
    pub leveled_up: bool,
}

pub struct UserStore {
    path: PathBuf,
    users: HashMap<String, UserRecord>,
}

impl UserStore {
    /// Load the store from disk. A missing file is healed by writing an
    /// empty JSON object, so restarts against existing data are idempotent
    /// and first runs start clean.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            fs::write(&path, "{}")
                .await
                .context("failed to create the user data file")?;
            return Ok(Self {
                path,
                users: HashMap::new(),
            });
        }

        let json = fs::read_to_string(&path)
            .await
            .context("failed to read the user data file")?;

        let users = serde_json::from_str(&json)
            .context("failed to parse the user data file")?;

        Ok(Self { path, users })
    }

    /// Overwrite the on-disk file with the full current map.
    pub async fn save(&self) -> Result<()> {
        // 4-space indent, matching the file format this store inherits.
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.users
            .serialize(&mut ser)
            .context("failed to serialize user data")?;

        fs::write(&self.path, buf)
            .await
            .context("failed to write the user data file")?;

        Ok(())
    }

    /// Non-mutating lookup; unknown users read as a zeroed record.
    pub fn get(&self, user_id: &str) -> UserRecord {
        self.users.get(user_id).copied().unwrap_or_default()
    }

    /// Add `amount` XP to a user (creating the record on first sight),
    /// recompute the level, and report whether it increased.
    pub fn award_xp(&mut self, user_id: &str, amount: u64) -> AwardOutcome {
        let record = self.users.entry(user_id.to_string()).or_default();
        record.xp += amount;

        let new_level = record.xp / XP_PER_LEVEL;
        let leveled_up = new_level > record.level;
        record.level = new_level;

        AwardOutcome {
            record: *record,
            leveled_up,
        }
    }

    /// The top `n` records by XP, descending.
    pub fn top(&self, n: usize) -> Vec<(String, UserRecord)> {
        let mut entries: Vec<_> = self
            .users
            .iter()
            .map(|(id, record)| (id.clone(), *record))
            .collect();
        entries.sort_by(|a, b| b.1.xp.cmp(&a.1.xp));
        entries.truncate(n);
        entries
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
