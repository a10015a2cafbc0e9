//! Integration tests for deposits and role-gated withdrawals.

mod common;

use common::{set_currency, test_engine};
use gangwars::game::{GangWarsError, Role};

/// Alice (God Father) and Bob (Grunt) in one gang.
fn bank_fixture() -> (tempfile::TempDir, gangwars::game::GangWarsEngine, String) {
    let (dir, mut engine) = test_engine();
    engine.register("alice", "Alice", false).unwrap();
    engine.register("bob", "Bob", false).unwrap();
    let gang = engine.create_gang("alice", "Street Kings").unwrap();
    let request = engine.request_join("bob", &gang.id).unwrap();
    engine.approve_join(&request.id, "alice").unwrap();
    (dir, engine, gang.id)
}

#[test]
fn deposit_moves_exactly_the_amount() {
    let (_dir, mut engine, gang_id) = bank_fixture();
    set_currency(&engine, "alice", 250);

    let receipt = engine.deposit("alice", 80).unwrap();
    assert_eq!(receipt.player_currency, 170);
    assert_eq!(receipt.gang_bank, 80);

    // Conservation: the combined total is invariant across a deposit.
    let alice = engine.store().get_player("alice").unwrap();
    let gang = engine.store().get_gang(&gang_id).unwrap();
    assert_eq!(alice.currency + gang.bank, 250);
}

#[test]
fn deposit_rejects_bad_amounts_and_missing_gang() {
    let (_dir, mut engine, _gang_id) = bank_fixture();

    assert!(matches!(
        engine.deposit("alice", 0),
        Err(GangWarsError::InvalidAmount)
    ));
    assert!(matches!(
        engine.deposit("alice", -5),
        Err(GangWarsError::InvalidAmount)
    ));
    assert!(matches!(
        engine.deposit("alice", 1_000_000),
        Err(GangWarsError::InsufficientFunds)
    ));

    engine.register("carol", "Carol", false).unwrap();
    assert!(matches!(
        engine.deposit("carol", 10),
        Err(GangWarsError::NotInGang)
    ));
}

#[test]
fn grunt_withdrawal_always_fails() {
    let (_dir, mut engine, _gang_id) = bank_fixture();
    set_currency(&engine, "alice", 1000);
    engine.deposit("alice", 1000).unwrap();

    for amount in [1, 10, 1000] {
        assert!(matches!(
            engine.withdraw("bob", amount),
            Err(GangWarsError::PermissionDenied(_))
        ));
    }
}

#[test]
fn lieutenant_cap_is_boundary_inclusive() {
    let (_dir, mut engine, gang_id) = bank_fixture();
    set_currency(&engine, "alice", 1000);
    engine.deposit("alice", 1000).unwrap();
    engine.set_role("alice", "bob", Role::Lieutenant).unwrap();

    // More than a tenth of the bank is refused.
    let err = engine.withdraw("bob", 101).unwrap_err();
    assert!(matches!(
        err,
        GangWarsError::WithdrawalCapExceeded {
            role: Role::Lieutenant,
            cap: 100
        }
    ));

    // Exactly a tenth succeeds.
    let receipt = engine.withdraw("bob", 100).unwrap();
    assert_eq!(receipt.gang_bank, 900);
    assert_eq!(engine.store().get_gang(&gang_id).unwrap().bank, 900);
}

#[test]
fn god_father_may_drain_the_bank() {
    let (_dir, mut engine, gang_id) = bank_fixture();
    set_currency(&engine, "alice", 500);
    engine.deposit("alice", 500).unwrap();

    let receipt = engine.withdraw("alice", 500).unwrap();
    assert_eq!(receipt.gang_bank, 0);

    assert!(matches!(
        engine.withdraw("alice", 1),
        Err(GangWarsError::WithdrawalCapExceeded { .. })
    ));
    assert_eq!(engine.store().get_gang(&gang_id).unwrap().bank, 0);
}

#[test]
fn withdraw_debits_bank_only() {
    // Pins the shipped behavior: withdrawn funds are debited from the bank
    // and NOT credited to the withdrawing player.
    let (_dir, mut engine, gang_id) = bank_fixture();
    set_currency(&engine, "alice", 300);
    engine.deposit("alice", 300).unwrap();

    let before = engine.store().get_player("alice").unwrap().currency;
    let receipt = engine.withdraw("alice", 120).unwrap();

    assert_eq!(receipt.gang_bank, 180);
    assert_eq!(receipt.player_currency, before);
    assert_eq!(
        engine.store().get_player("alice").unwrap().currency,
        before
    );
    assert_eq!(engine.store().get_gang(&gang_id).unwrap().bank, 180);
}

#[test]
fn withdraw_without_gang_fails() {
    let (_dir, mut engine, _gang_id) = bank_fixture();
    engine.register("carol", "Carol", false).unwrap();
    assert!(matches!(
        engine.withdraw("carol", 10),
        Err(GangWarsError::NotInGang)
    ));
}
