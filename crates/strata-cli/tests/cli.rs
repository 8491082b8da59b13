//! End-to-end tests for the strata binary

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

struct Scratch {
    _dir: tempfile::TempDir,
    database: PathBuf,
    migrations: PathBuf,
}

impl Scratch {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let migrations = dir.path().join("migrations");
        std::fs::create_dir(&migrations).unwrap();
        let database = dir.path().join("strata.db");
        Self {
            _dir: dir,
            database,
            migrations,
        }
    }

    fn write_migration(&self, name: &str, up: &str, down: &str) {
        std::fs::write(self.migrations.join(format!("{name}.up.sql")), up).unwrap();
        std::fs::write(self.migrations.join(format!("{name}.down.sql")), down).unwrap();
    }

    fn strata(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("strata").unwrap();
        cmd.arg("--database")
            .arg(&self.database)
            .arg("--migrations")
            .arg(&self.migrations)
            .args(args);
        cmd
    }
}

fn two_migrations() -> Scratch {
    let scratch = Scratch::new();
    scratch.write_migration(
        "000-initial",
        "CREATE TABLE guilds (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
        "DROP TABLE guilds;",
    );
    scratch.write_migration(
        "001-users",
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);",
        "DROP TABLE users;",
    );
    scratch
}

#[test]
fn up_status_to_reset_cycle() {
    let scratch = two_migrations();

    scratch
        .strata(&["up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 2 migration(s)"));

    scratch
        .strata(&["status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("000-initial")
                .and(predicate::str::contains("001-users"))
                .and(predicate::str::contains("Pending: none")),
        );

    scratch
        .strata(&["to", "000-initial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Undid 1 migration(s)"));

    scratch
        .strata(&["reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Undid 1 migration(s)"));

    scratch
        .strata(&["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No migrations applied"));

    // The keyword spellings reach the same targets as up/reset.
    scratch
        .strata(&["to", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 2 migration(s)"));

    scratch
        .strata(&["to", "nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Undid 2 migration(s)"));
}

#[test]
fn up_twice_reports_nothing_to_apply() {
    let scratch = two_migrations();

    scratch.strata(&["up"]).assert().success();
    scratch
        .strata(&["up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to apply"));
}

#[test]
fn unknown_target_is_an_error() {
    let scratch = two_migrations();

    scratch
        .strata(&["to", "999-nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    // Nothing was applied along the way.
    assert!(!scratch.database.exists() || database_is_empty(&scratch.database));
}

fn database_is_empty(path: &Path) -> bool {
    let conn = rusqlite::Connection::open(path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM migrations", [], |row| row.get(0))
        .unwrap();
    count == 0
}

#[test]
fn json_status_lists_pending() {
    let scratch = two_migrations();

    scratch
        .strata(&["--format", "json", "status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"pending\"").and(predicate::str::contains("000-initial")),
        );
}
