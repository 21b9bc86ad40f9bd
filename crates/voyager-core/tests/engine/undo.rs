//! Tests for the undo/redo history.

use super::*;

#[test]
fn undo_restores_previous_state() {
    let mut c = ctx();
    c.exec("42").unwrap();
    assert_eq!(c.depth().unwrap(), 1);
    c.exec("DROP").unwrap();
    assert_eq!(c.depth().unwrap(), 0);
    assert!(c.undo().unwrap());
    assert_eq!(c.depth().unwrap(), 1);
    assert_eq!(c.repr_at(1).unwrap(), "42");
}

#[test]
fn redo_reapplies_undone_operation() {
    let mut c = ctx();
    c.exec("42").unwrap();
    c.exec("DROP").unwrap();
    assert!(c.undo().unwrap());
    assert_eq!(c.depth().unwrap(), 1);
    assert!(c.redo().unwrap());
    assert_eq!(c.depth().unwrap(), 0);
}

#[test]
fn undo_at_birth_fails() {
    let mut c = ctx();
    assert!(!c.undo().unwrap());
    assert_eq!(c.depth().unwrap(), 0);
}

#[test]
fn redo_without_undo_fails() {
    let mut c = ctx();
    c.exec("1").unwrap();
    assert!(!c.redo().unwrap());
}

#[test]
fn multiple_undo_steps() {
    let mut c = ctx();
    c.exec("1").unwrap();
    c.exec("2").unwrap();
    c.exec("3").unwrap();
    assert_eq!(c.depth().unwrap(), 3);

    assert!(c.undo().unwrap());
    assert_eq!(c.depth().unwrap(), 2);

    assert!(c.undo().unwrap());
    assert_eq!(c.depth().unwrap(), 1);
    assert_eq!(c.repr_at(1).unwrap(), "1");
}

#[test]
fn undo_to_birth_and_back() {
    let mut c = ctx();
    c.exec("1").unwrap();
    assert!(c.undo().unwrap());
    assert_eq!(c.depth().unwrap(), 0);
    assert!(!c.undo().unwrap());
    assert!(c.redo().unwrap());
    assert_eq!(c.repr_at(1).unwrap(), "1");
}

#[test]
fn undo_redo_roundtrip_preserves_reprs() {
    let mut c = ctx();
    for input in ["1 2 +", "\"s\"", "4 5", "SWAP"] {
        c.exec(input).unwrap();
    }
    let depth = c.depth().unwrap();
    let reprs: Vec<String> = (1..=depth).map(|l| c.repr_at(l).unwrap()).collect();

    let k = 3;
    for _ in 0..k {
        assert!(c.undo().unwrap());
    }
    for _ in 0..k {
        assert!(c.redo().unwrap());
    }

    assert_eq!(c.depth().unwrap(), depth);
    let after: Vec<String> = (1..=depth).map(|l| c.repr_at(l).unwrap()).collect();
    assert_eq!(after, reprs);
}

#[test]
fn each_exec_appends_two_snapshots() {
    let mut c = ctx();
    assert_eq!(c.store().history_max_seq().unwrap(), 0);
    c.exec("1").unwrap();
    assert_eq!(c.store().history_max_seq().unwrap(), 2);
    c.exec("2").unwrap();
    assert_eq!(c.store().history_max_seq().unwrap(), 4);
}

#[test]
fn failed_exec_appends_no_snapshots() {
    let mut c = ctx();
    c.exec("1").unwrap();
    let before = c.store().history_max_seq().unwrap();
    assert!(c.exec("0 /").is_err());
    assert_eq!(c.store().history_max_seq().unwrap(), before);
}

#[test]
fn undo_after_failed_exec_restores_pre_state() {
    let mut c = ctx();
    c.exec("5").unwrap();
    assert!(c.exec("0 /").is_err());
    // The error value sits on the pre-state.
    assert_eq!(c.depth().unwrap(), 2);
    // Undo steps back over the last successful evaluation.
    assert!(c.undo().unwrap());
    assert_eq!(c.depth().unwrap(), 0);
}

#[test]
fn undo_and_redo_levels() {
    let mut c = ctx();
    assert_eq!(c.undo_levels().unwrap(), 0);
    assert_eq!(c.redo_levels().unwrap(), 0);

    c.exec("1").unwrap();
    c.exec("2").unwrap();
    assert_eq!(c.undo_levels().unwrap(), 2);
    assert_eq!(c.redo_levels().unwrap(), 0);

    c.undo().unwrap();
    assert_eq!(c.undo_levels().unwrap(), 1);
    assert_eq!(c.redo_levels().unwrap(), 1);

    c.undo().unwrap();
    assert_eq!(c.undo_levels().unwrap(), 0);
    assert_eq!(c.redo_levels().unwrap(), 2);

    c.redo().unwrap();
    assert_eq!(c.undo_levels().unwrap(), 1);
    assert_eq!(c.redo_levels().unwrap(), 1);
}

#[test]
fn new_exec_after_undo_extends_history() {
    let mut c = ctx();
    c.exec("1").unwrap();
    c.exec("2").unwrap();
    c.undo().unwrap();
    assert_eq!(c.depth().unwrap(), 1);

    c.exec("99").unwrap();
    assert_stack_of(&c, &["99", "1"]);
    // The branch point is still reachable backwards.
    assert!(c.undo().unwrap());
    assert_eq!(c.depth().unwrap(), 1);
    assert_eq!(c.repr_at(1).unwrap(), "1");
}

fn assert_stack_of(c: &Context, expected: &[&str]) {
    assert_eq!(c.depth().unwrap(), expected.len() as i64);
    for (i, want) in expected.iter().enumerate() {
        assert_eq!(&c.repr_at(i as i64 + 1).unwrap(), want);
    }
}
