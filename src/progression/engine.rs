//! Promotion planning
//!
//! Pure functions that decide which ladder role a member should hold.
//! The handler applies the resulting plans through the Discord API; nothing
//! in here touches the network, so every rule is unit-testable.

use crate::config::LEVELS_PER_STAGE;
use crate::progression::{Track, LADDER_LEN};

/// The role changes a level-up requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionPlan {
    /// Track the member is progressing on.
    pub track: Track,
    /// Ladder stage the member now qualifies for.
    pub stage: usize,
    /// Role to grant.
    pub grant: &'static str,
    /// Superseded ladder roles (same track) the member still holds.
    pub revoke: Vec<&'static str>,
}

/// The role changes a track-selection reaction requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPlan {
    /// The stage-0 role to grant.
    pub grant: &'static str,
    /// Every ladder role (any track) the member currently holds.
    pub strip: Vec<String>,
}

/// Ladder stage for a level, or `None` once the ladder is capped.
pub fn stage_for_level(level: u64) -> Option<usize> {
    let stage = (level / LEVELS_PER_STAGE) as usize;
    (stage < LADDER_LEN).then_some(stage)
}

/// Plan a promotion for a member who just reached `level`.
///
/// Returns `None` when the member has not selected a track (no held role
/// belongs to any ladder) or when the ladder is already capped. The plan
/// grants before it revokes, so a member is never observed holding zero
/// ladder roles mid-promotion.
pub fn promotion<S: AsRef<str>>(held_roles: &[S], level: u64) -> Option<PromotionPlan> {
    let (track, _) = held_roles
        .iter()
        .find_map(|name| Track::position_of(name.as_ref()))?;

    let stage = stage_for_level(level)?;
    let ladder = track.ladder();
    let grant = ladder[stage];

    let revoke = ladder
        .into_iter()
        .filter(|name| *name != grant)
        .filter(|name| held_roles.iter().any(|held| held.as_ref() == *name))
        .collect();

    Some(PromotionPlan {
        track,
        stage,
        grant,
        revoke,
    })
}

/// Plan a track selection: strip every ladder role the member holds, then
/// grant the chosen track's base role. Stripping even an identical role
/// keeps the operation idempotent in effect.
pub fn selection<S: AsRef<str>>(track: Track, held_roles: &[S]) -> SelectionPlan {
    let strip = held_roles
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| Track::position_of(name).is_some())
        .map(str::to_owned)
        .collect();

    SelectionPlan {
        grant: track.base_role(),
        strip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_caps_at_ladder_length() {
        assert_eq!(stage_for_level(0), Some(0));
        assert_eq!(stage_for_level(14), Some(0));
        assert_eq!(stage_for_level(15), Some(1));
        assert_eq!(stage_for_level(29), Some(1));
        assert_eq!(stage_for_level(60), Some(4));
        assert_eq!(stage_for_level(74), Some(4));
        assert_eq!(stage_for_level(75), None);
        assert_eq!(stage_for_level(10_000), None);
    }

    #[test]
    fn test_promotion_without_track_is_noop() {
        let held = ["Adventurer", "Moderator"];
        assert_eq!(promotion(&held, 15), None);
    }

    #[test]
    fn test_promotion_level_29_phantom() {
        let held = ["Adventurer", "Phantom"];
        let plan = promotion(&held, 29).unwrap();
        assert_eq!(plan.track, Track::Phantom);
        assert_eq!(plan.grant, "Phantom 2");
        assert_eq!(plan.revoke, vec!["Phantom"]);
    }

    #[test]
    fn test_promotion_capped_beyond_the_ghost() {
        let held = ["The Ghost"];
        assert_eq!(promotion(&held, 75), None);
        // Just below the cap the final rank is still reachable.
        let plan = promotion(&held, 74).unwrap();
        assert_eq!(plan.grant, "The Ghost");
        assert!(plan.revoke.is_empty());
    }

    #[test]
    fn test_promotion_revokes_only_same_track() {
        // A stray cross-track role is the reaction flow's problem, not the
        // promotion's; the plan only touches the member's own ladder.
        let held = ["Angel", "Angel 2", "Phantom"];
        let plan = promotion(&held, 45).unwrap();
        assert_eq!(plan.track, Track::Angel);
        assert_eq!(plan.grant, "Celestia");
        assert_eq!(plan.revoke, vec!["Angel", "Angel 2"]);
    }

    #[test]
    fn test_selection_strips_all_ladder_roles() {
        let held = ["Adventurer", "Phantom", "The Vampire"];
        let plan = selection(Track::Lurker, &held);
        assert_eq!(plan.grant, "Lurker");
        assert_eq!(plan.strip, vec!["Phantom".to_string(), "The Vampire".to_string()]);
    }

    #[test]
    fn test_selection_restrips_same_role() {
        let held = ["Lurker"];
        let plan = selection(Track::Lurker, &held);
        assert_eq!(plan.grant, "Lurker");
        assert_eq!(plan.strip, vec!["Lurker".to_string()]);
    }
}
