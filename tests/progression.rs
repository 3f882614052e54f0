//! Progression property suite
//!
//! Exercises the XP/level rules, the ladder exclusivity invariant, and the
//! store round-trips end to end over the pure planning layer, with role
//! membership simulated as a plain name set.

use night_neighbors::config::{XP_PER_LEVEL, XP_PER_MESSAGE};
use night_neighbors::progression::{promotion, selection, stage_for_level, Track};
use night_neighbors::store::UserStore;
use tempfile::tempdir;

/// Apply a selection plan to a simulated role set (strip first, then
/// grant, matching the live handler).
fn apply_selection(held: &mut Vec<String>, track: Track) {
    let plan = selection(track, held);
    held.retain(|name| !plan.strip.contains(name));
    held.push(plan.grant.to_string());
}

/// Apply a promotion plan to a simulated role set (grant first, then
/// revoke, matching the live handler).
fn apply_promotion(held: &mut Vec<String>, level: u64) -> Option<&'static str> {
    let plan = promotion(held, level)?;
    held.push(plan.grant.to_string());
    held.retain(|name| !plan.revoke.iter().any(|r| *r == name.as_str()));
    Some(plan.grant)
}

fn ladder_roles_held(held: &[String]) -> usize {
    held.iter()
        .filter(|name| Track::position_of(name).is_some())
        .count()
}

#[test]
fn ten_messages_reach_level_one() {
    let mut store = in_memory_store();
    for _ in 0..10 {
        store.award_xp("fresh", XP_PER_MESSAGE);
    }
    let record = store.get("fresh");
    assert_eq!(record.xp, 50);
    assert_eq!(record.level, 1);
}

#[test]
fn level_always_tracks_xp() {
    let mut store = in_memory_store();
    for i in 0..299 {
        let outcome = store.award_xp("chatty", XP_PER_MESSAGE);
        assert_eq!(
            outcome.record.level,
            outcome.record.xp / XP_PER_LEVEL,
            "level drifted after message {i}"
        );
    }
    let record = store.get("chatty");
    assert_eq!(record.xp, 1495);
    assert_eq!(record.level, 29);
}

#[test]
fn level_29_phantom_lands_on_stage_one() {
    let mut held = vec!["Adventurer".to_string(), "Phantom".to_string()];
    let granted = apply_promotion(&mut held, 29).unwrap();
    assert_eq!(granted, "Phantom 2");
    assert_eq!(ladder_roles_held(&held), 1);
    assert!(held.contains(&"Phantom 2".to_string()));
}

#[test]
fn ladder_caps_at_the_ghost() {
    let mut held = vec!["Phantom".to_string()];

    // Walk every level a member could reach; the final rank must be
    // "The Ghost" and nothing past it is ever granted.
    let mut last_grant = None;
    for level in 1..=200 {
        if let Some(granted) = apply_promotion(&mut held, level) {
            assert!(stage_for_level(level).is_some());
            last_grant = Some(granted);
        }
        assert!(ladder_roles_held(&held) <= 1, "exclusivity broke at level {level}");
    }

    assert_eq!(last_grant, Some("The Ghost"));
    assert!(held.contains(&"The Ghost".to_string()));
    assert_eq!(apply_promotion(&mut held, 75), None);
}

#[test]
fn last_reaction_wins() {
    let mut held = vec!["Adventurer".to_string()];

    apply_selection(&mut held, Track::from_emoji("💀").unwrap());
    assert!(held.contains(&"Phantom".to_string()));

    apply_selection(&mut held, Track::from_emoji("🦉").unwrap());
    assert!(held.contains(&"Lurker".to_string()));
    assert!(!held.contains(&"Phantom".to_string()));
    assert_eq!(ladder_roles_held(&held), 1);

    // The unrelated role is untouched.
    assert!(held.contains(&"Adventurer".to_string()));
}

#[test]
fn selection_after_promotion_strips_high_ranks() {
    let mut held = vec!["Phantom".to_string()];
    apply_promotion(&mut held, 29);
    assert!(held.contains(&"Phantom 2".to_string()));

    apply_selection(&mut held, Track::Angel);
    assert_eq!(ladder_roles_held(&held), 1);
    assert!(held.contains(&"Angel".to_string()));
}

#[test]
fn promotion_without_track_selection_is_a_noop() {
    let mut held = vec!["Adventurer".to_string()];
    assert_eq!(apply_promotion(&mut held, 50), None);
    assert_eq!(held, vec!["Adventurer".to_string()]);
}

#[tokio::test]
async fn restart_preserves_existing_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("userdata.json");

    {
        let mut store = UserStore::load(&path).await.unwrap();
        for _ in 0..10 {
            store.award_xp("veteran", XP_PER_MESSAGE);
        }
        store.save().await.unwrap();
    }

    // Second startup against the same file: nothing resets.
    let store = UserStore::load(&path).await.unwrap();
    let record = store.get("veteran");
    assert_eq!(record.xp, 50);
    assert_eq!(record.level, 1);
}

#[tokio::test]
async fn never_seen_user_reads_zeroes_without_insertion() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("userdata.json");

    let store = UserStore::load(&path).await.unwrap();
    let record = store.get("stranger");
    assert_eq!(record.xp, 0);
    assert_eq!(record.level, 0);
    assert!(store.is_empty());
}

/// A freshly healed store in a throwaway directory. The store is only
/// mutated in memory by these tests, so dropping the directory early is
/// harmless.
fn in_memory_store() -> UserStore {
    let dir = tempdir().unwrap();
    tokio_test::block_on(UserStore::load(dir.path().join("userdata.json"))).unwrap()
}
