//! Track and ladder definitions
//!
//! The five night-identity tracks, their five-stage rank ladders, the
//! reaction emoji that select them, and the reverse lookup from a role
//! name back to its (track, stage) position.

mod engine;

pub use engine::{promotion, selection, stage_for_level, PromotionPlan, SelectionPlan};

use serde::{Deserialize, Serialize};

/// Number of stages in every ladder.
pub const LADDER_LEN: usize = 5;

/// The five mutually exclusive night-identity tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Phantom,
    Whisperer,
    Lurker,
    Dreamwalker,
    Angel,
}

impl Track {
    pub const ALL: [Track; 5] = [
        Track::Phantom,
        Track::Whisperer,
        Track::Lurker,
        Track::Dreamwalker,
        Track::Angel,
    ];

    /// The ordered rank ladder for this track, indexed by stage.
    pub fn ladder(&self) -> [&'static str; LADDER_LEN] {
        match self {
            Track::Phantom => ["Phantom", "Phantom 2", "Phantom 3", "Undead", "The Ghost"],
            Track::Whisperer => [
                "Whisperer",
                "Whisperer 2",
                "Whisperer 3",
                "Echowalker",
                "The Vampire",
            ],
            Track::Lurker => [
                "Lurker",
                "Lurker 2",
                "Lurker 3",
                "Shadowstalker",
                "Absolute Ninja",
            ],
            Track::Dreamwalker => [
                "Dreamwalker",
                "Dreamwalker 2",
                "Dreamwalker 3",
                "Lucid Seeker",
                "The Nightmare",
            ],
            Track::Angel => ["Angel", "Angel 2", "Angel 3", "Celestia", "The Heaven"],
        }
    }

    /// The stage-0 role name, which doubles as the track's display name.
    pub fn base_role(&self) -> &'static str {
        self.ladder()[0]
    }

    /// The reaction emoji that selects this track.
    pub fn emoji(&self) -> &'static str {
        match self {
            Track::Phantom => "💀",
            Track::Whisperer => "🧛🏻‍♀️",
            Track::Lurker => "🦉",
            Track::Dreamwalker => "🦇",
            Track::Angel => "🪽",
        }
    }

    /// Map a reaction emoji back to its track.
    pub fn from_emoji(emoji: &str) -> Option<Track> {
        Track::ALL.into_iter().find(|t| t.emoji() == emoji)
    }

    /// Reverse lookup: which (track, stage) does a role name belong to?
    ///
    /// Matches on the full role name, so "Lucid Seeker" resolves to
    /// (Dreamwalker, 3) without any display-name parsing.
    pub fn position_of(role_name: &str) -> Option<(Track, usize)> {
        for track in Track::ALL {
            if let Some(stage) = track.ladder().iter().position(|r| *r == role_name) {
                return Some((track, stage));
            }
        }
        None
    }

    /// Bilingual celebratory message sent when a member reaches a new rank.
    pub fn levelup_message(&self, mention: &str, role_name: &str, level: u64) -> String {
        match self {
            Track::Phantom => format!(
                "*You fade deeper into the unseen...*\n🎉 Selamat {mention}, kamu telah menjadi **{role_name}** di Level {level}!\n*The silence embraces you.*"
            ),
            Track::Whisperer => format!(
                "*Your whispers now echo through darker halls...*\n🎉 Selamat {mention}, kamu telah naik ke **{role_name}** di Level {level}!\n*The night listens more closely now.*"
            ),
            Track::Lurker => format!(
                "*The shadows welcome your gaze...*\n🎉 {mention}, kamu kini adalah **{role_name}**, Level {level}!\n*Your presence becomes harder to notice, yet impossible to ignore.*"
            ),
            Track::Dreamwalker => format!(
                "*Reality bends further around you...*\n🎉 Selamat {mention}, kamu kini memasuki Level {level} sebagai **{role_name}**!\n*Drift deeper between dreams and nightmares.*"
            ),
            Track::Angel => format!(
                "*Your light shines brighter in the dark...*\n😇 {mention}, kamu telah naik ke **{role_name}** di Level {level}!\n*Even silence feels safer around you.*"
            ),
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base_role())
    }
}
