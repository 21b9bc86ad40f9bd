//! Tests for on-disk persistence across context lifetimes.

use std::path::PathBuf;

use voyager_core::Context;

fn db_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("session.db")
}

#[test]
fn stack_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    {
        let mut c = Context::open(Some(&path)).unwrap();
        c.exec("1 2 3").unwrap();
    }
    let c = Context::open(Some(&path)).unwrap();
    assert_eq!(c.depth().unwrap(), 3);
    assert_eq!(c.repr_at(1).unwrap(), "3");
    assert_eq!(c.repr_at(3).unwrap(), "1");
}

#[test]
fn variables_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    {
        let mut c = Context::open(Some(&path)).unwrap();
        c.exec("<< DUP * >> 'square' STO").unwrap();
        c.exec("355 113 / 'ratio' STO").unwrap();
    }
    let mut c = Context::open(Some(&path)).unwrap();
    c.exec("7 square").unwrap();
    assert_eq!(c.repr_at(1).unwrap(), "49");
    c.exec("'ratio' RCL").unwrap();
    assert_eq!(c.repr_at(1).unwrap(), "355/113");
}

#[test]
fn undo_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    {
        let mut c = Context::open(Some(&path)).unwrap();
        c.exec("42").unwrap();
        c.exec("DROP").unwrap();
    }
    let mut c = Context::open(Some(&path)).unwrap();
    assert!(c.undo().unwrap());
    assert_eq!(c.repr_at(1).unwrap(), "42");
}

#[test]
fn angle_mode_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    {
        let mut c = Context::open(Some(&path)).unwrap();
        c.exec("DEG").unwrap();
    }
    let c = Context::open(Some(&path)).unwrap();
    assert_eq!(c.store().angle_mode().unwrap(), "DEG");
}

#[test]
fn complex_values_roundtrip_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    {
        let mut c = Context::open(Some(&path)).unwrap();
        c.exec("(1.5, -2.5)").unwrap();
    }
    let c = Context::open(Some(&path)).unwrap();
    assert_eq!(c.repr_at(1).unwrap(), "(1.5, -2.5)");
}

#[test]
fn big_integers_roundtrip_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = db_path(&dir);
    {
        let mut c = Context::open(Some(&path)).unwrap();
        c.exec("99999999999999999999999999999999").unwrap();
    }
    let c = Context::open(Some(&path)).unwrap();
    assert_eq!(c.repr_at(1).unwrap(), "99999999999999999999999999999999");
}
