//! Integration tests for super-moderator gated admin operations.

mod common;

use common::test_engine;
use gangwars::game::GangWarsError;

fn populated() -> (tempfile::TempDir, gangwars::game::GangWarsEngine) {
    let (dir, mut engine) = test_engine();
    engine.register("root", "RootMod", true).unwrap();
    engine.register("alice", "Alice", false).unwrap();
    engine.register("bob", "Bob", false).unwrap();
    let gang = engine.create_gang("alice", "Street Kings").unwrap();
    engine.request_join("bob", &gang.id).unwrap();
    (dir, engine)
}

#[test]
fn reset_requires_supermod() {
    let (_dir, mut engine) = populated();

    let err = engine.reset("alice").unwrap_err();
    assert!(matches!(err, GangWarsError::PermissionDenied(_)));

    // Nothing was touched by the refused reset.
    assert_eq!(engine.store().list_players().unwrap().len(), 3);
    assert_eq!(engine.store().list_gangs().unwrap().len(), 1);
    assert_eq!(engine.store().list_requests().unwrap().len(), 1);
}

#[test]
fn reset_clears_every_record() {
    let (_dir, mut engine) = populated();
    engine.reset("root").unwrap();

    assert!(engine.store().list_players().unwrap().is_empty());
    assert!(engine.store().list_gangs().unwrap().is_empty());
    assert!(engine.store().list_requests().unwrap().is_empty());
}

#[test]
fn grant_adds_to_balance() {
    let (_dir, mut engine) = populated();
    let balance = engine.grant_currency("root", "alice", 250).unwrap();
    assert_eq!(balance, 350);
    assert_eq!(engine.store().get_player("alice").unwrap().currency, 350);
}

#[test]
fn grant_is_supermod_gated_and_validated() {
    let (_dir, mut engine) = populated();

    assert!(matches!(
        engine.grant_currency("alice", "bob", 10),
        Err(GangWarsError::PermissionDenied(_))
    ));
    assert!(matches!(
        engine.grant_currency("root", "bob", 0),
        Err(GangWarsError::InvalidAmount)
    ));
    assert!(matches!(
        engine.grant_currency("root", "ghost", 10),
        Err(GangWarsError::NotFound(_))
    ));
}

#[test]
fn remove_player_cleans_up_references() {
    let (_dir, mut engine) = populated();

    // Bob: outstanding join request, no gang.
    engine.remove_player("root", "bob").unwrap();
    assert!(engine.store().lookup_player("bob").unwrap().is_none());
    assert!(engine.store().list_requests().unwrap().is_empty());

    // Alice: sole member, so her gang goes with her.
    engine.remove_player("root", "alice").unwrap();
    assert!(engine.store().lookup_player("alice").unwrap().is_none());
    assert!(engine.store().list_gangs().unwrap().is_empty());
}

#[test]
fn remove_player_keeps_populated_gangs() {
    let (_dir, mut engine) = populated();
    let gang_id = engine.resolve_gang("Street Kings").unwrap().id;
    let request = engine
        .store()
        .find_request("bob", &gang_id)
        .unwrap()
        .unwrap();
    engine.approve_join(&request.id, "alice").unwrap();

    engine.remove_player("root", "bob").unwrap();
    let gang = engine.store().get_gang(&gang_id).unwrap();
    assert_eq!(gang.members, vec!["alice".to_string()]);
}

#[test]
fn remove_player_requires_supermod() {
    let (_dir, mut engine) = populated();
    assert!(matches!(
        engine.remove_player("alice", "bob"),
        Err(GangWarsError::PermissionDenied(_))
    ));
}
