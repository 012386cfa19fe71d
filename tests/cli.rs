use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PASSWORD: &str = "correct horse battery";

/// A data directory with cheap key derivation and the given accounts
fn data_dir(accounts: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.json"),
        r#"{"key_derivation": {"memory_cost": 1024, "time_cost": 1, "parallelism": 1}}"#,
    )
    .unwrap();

    let accounts_dir = dir.path().join("accounts");
    fs::create_dir_all(&accounts_dir).unwrap();
    for (name, body) in accounts {
        fs::write(accounts_dir.join(name), body).unwrap();
    }
    dir
}

fn porter(data: &Path) -> Command {
    let mut cmd = Command::cargo_bin("porter").unwrap();
    cmd.env("PORTER_DATA_DIR", data)
        .env_remove("PORTER_PASSWORD")
        .env_remove("PORTER_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn export_then_import_round_trip() {
    let source = data_dir(&[
        ("alice.json", r#"{"token": "a"}"#),
        ("bob.json", r#"{"token": "b"}"#),
        ("carol.json", r#"{"token": "c"}"#),
    ]);
    let backup = source.path().join("backup.enc");

    porter(source.path())
        .args(["export", "--output"])
        .arg(&backup)
        .env("PORTER_PASSWORD", PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 account(s)"));

    let sealed = fs::read_to_string(&backup).unwrap();
    assert!(!sealed.contains("\"token\""));

    let target = data_dir(&[]);
    porter(target.path())
        .arg("import")
        .arg(&backup)
        .env("PORTER_PASSWORD", PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 3 account(s)"));

    let restored: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(target.path().join("accounts").join("bob.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(restored["token"], "b");
}

#[test]
fn blank_configured_producer_tag_still_round_trips() {
    let source = data_dir(&[("alice.json", r#"{"token": "a"}"#)]);
    fs::write(
        source.path().join("config.json"),
        r#"{"producer_tag": "", "key_derivation": {"memory_cost": 1024, "time_cost": 1, "parallelism": 1}}"#,
    )
    .unwrap();
    let backup = source.path().join("backup.enc");

    porter(source.path())
        .args(["export", "--output"])
        .arg(&backup)
        .env("PORTER_PASSWORD", PASSWORD)
        .assert()
        .success();

    let target = data_dir(&[]);
    porter(target.path())
        .arg("import")
        .arg(&backup)
        .env("PORTER_PASSWORD", PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 1 account(s)"));
}

#[test]
fn export_with_no_accounts_fails() {
    let empty = data_dir(&[]);

    porter(empty.path())
        .args(["export", "--output", "never.enc"])
        .env("PORTER_PASSWORD", PASSWORD)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to export"));

    assert!(!empty.path().join("never.enc").exists());
}

#[test]
fn export_with_weak_password_writes_nothing() {
    let source = data_dir(&[("alice.json", "{}")]);
    let backup = source.path().join("backup.enc");

    porter(source.path())
        .args(["export", "--output"])
        .arg(&backup)
        .env("PORTER_PASSWORD", "short")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Weak password"));

    assert!(!backup.exists());
}

#[test]
fn export_cancelled_when_no_destination_given() {
    let source = data_dir(&[("alice.json", "{}")]);

    porter(source.path())
        .arg("export")
        .env("PORTER_PASSWORD", PASSWORD)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
}

#[test]
fn import_with_wrong_password_fails() {
    let source = data_dir(&[("alice.json", "{}")]);
    let backup = source.path().join("backup.enc");

    porter(source.path())
        .args(["export", "--output"])
        .arg(&backup)
        .env("PORTER_PASSWORD", PASSWORD)
        .assert()
        .success();

    let target = data_dir(&[]);
    porter(target.path())
        .arg("import")
        .arg(&backup)
        .env("PORTER_PASSWORD", "incorrect horse battery")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"));

    assert!(!target.path().join("accounts").join("alice.json").exists());
}

#[test]
fn import_empty_file_fails() {
    let target = data_dir(&[]);
    let backup = target.path().join("empty.enc");
    fs::write(&backup, "   \n").unwrap();

    porter(target.path())
        .arg("import")
        .arg(&backup)
        .env("PORTER_PASSWORD", PASSWORD)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Backup file is empty"));
}

#[test]
fn inspect_lists_accounts() {
    let source = data_dir(&[("alice.json", "{}"), ("bob.json", "{}")]);
    let backup = source.path().join("backup.enc");

    porter(source.path())
        .args(["export", "--output"])
        .arg(&backup)
        .env("PORTER_PASSWORD", PASSWORD)
        .assert()
        .success();

    porter(source.path())
        .arg("inspect")
        .arg(&backup)
        .env("PORTER_PASSWORD", PASSWORD)
        .assert()
        .success()
        .stdout(predicate::str::contains("Accounts: 2"))
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("bob"));
}

#[test]
fn accounts_list_delete_and_clear() {
    let data = data_dir(&[("alice.json", "{}"), ("bob.json", "{}")]);

    porter(data.path())
        .args(["accounts", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice").and(predicate::str::contains("bob")));

    porter(data.path())
        .args(["accounts", "delete", "alice"])
        .assert()
        .success();
    assert!(!data.path().join("accounts").join("alice.json").exists());

    porter(data.path())
        .args(["accounts", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert!(data.path().join("accounts").join("bob.json").exists());

    porter(data.path())
        .args(["accounts", "clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 account(s)"));
}

#[test]
fn config_shows_paths() {
    let data = data_dir(&[]);

    porter(data.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Accounts directory"))
        .stdout(predicate::str::contains("1024 KiB"));
}
