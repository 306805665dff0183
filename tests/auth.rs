//! Integration tests for the password gate.

use padel_tracker::{LedgerError, PasswordGate};
use uuid::Uuid;

#[test]
fn gate_only_admits_issued_tokens() {
    let gate = PasswordGate::new("padel123");
    assert!(matches!(gate.unlock("nope"), Err(LedgerError::AccessDenied)));

    let token = gate.unlock("padel123").unwrap();
    assert!(gate.admit(token).is_some());
    assert!(gate.admit(Uuid::new_v4()).is_none());

    gate.revoke(token);
    assert!(gate.admit(token).is_none());
}

#[test]
fn logging_in_again_revokes_the_previous_token() {
    let gate = PasswordGate::new("padel123");
    let first = gate.unlock_replacing("padel123", None).unwrap();
    let second = gate.unlock_replacing("padel123", Some(first)).unwrap();

    assert_ne!(first, second);
    assert!(gate.admit(first).is_none());
    assert!(gate.admit(second).is_some());
}

#[test]
fn failed_login_keeps_the_previous_token() {
    let gate = PasswordGate::new("padel123");
    let token = gate.unlock("padel123").unwrap();
    assert!(matches!(
        gate.unlock_replacing("wrong", Some(token)),
        Err(LedgerError::AccessDenied)
    ));
    assert!(gate.admit(token).is_some());
}

#[test]
fn grant_needs_the_right_password() {
    let gate = PasswordGate::new("padel123");
    assert!(gate.grant("padel123").is_ok());
    assert!(matches!(gate.grant("PADEL123"), Err(LedgerError::AccessDenied)));
}
