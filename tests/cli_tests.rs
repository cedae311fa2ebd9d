mod common;

use common::databases::{shop_database, sqlite_database};
use common::output::read_tree;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn schemagen(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemagen"))
        .current_dir(cwd)
        .env_remove("SCHEMAGEN_DATABASE_URL")
        .env_remove("SCHEMAGEN_DATABASE_PASSWORD")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run schemagen")
}

#[test]
fn test_cli_generate_writes_models_controllers_and_router() {
    let (_db_dir, db) = shop_database();
    let work = tempfile::tempdir().unwrap();
    let db = db.to_str().unwrap();

    let output = schemagen(
        work.path(),
        &[
            "generate", "--engine", "sqlite", "--dbname", db, "--out", "gen", "--serde", "--rest",
        ],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Generated 7 files for 2 tables"), "{stdout}");

    let files = read_tree(&work.path().join("gen"));
    for path in [
        "model/mod.rs",
        "model/user.rs",
        "model/order_item.rs",
        "api/mod.rs",
        "api/router.rs",
        "api/user.rs",
        "api/order_item.rs",
    ] {
        assert!(files.contains_key(Path::new(path)), "missing {path}");
    }
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let (_db_dir, db) = shop_database();
    let work = tempfile::tempdir().unwrap();

    let output = schemagen(
        work.path(),
        &[
            "generate",
            "-e",
            "sqlite",
            "-d",
            db.to_str().unwrap(),
            "-o",
            "gen",
            "--dry-run",
        ],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dry run: 3 files for 2 tables"));
    assert!(!work.path().join("gen").exists());
}

#[test]
fn test_cli_reads_config_file() {
    let (_db_dir, db) = shop_database();
    let work = tempfile::tempdir().unwrap();
    fs::write(
        work.path().join("schemagen.toml"),
        "package = \"shop_api\"\nrest = true\nout = \"gen\"\ntables = [\"users\"]\n\n[names]\nusers = \"Account\"\n",
    )
    .unwrap();

    let output = schemagen(
        work.path(),
        &["generate", "-e", "sqlite", "-d", db.to_str().unwrap()],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let files = read_tree(&work.path().join("gen"));
    assert_eq!(files.len(), 5);
    let model = &files[Path::new("model/user.rs")];
    assert!(model.contains("pub struct Account {"));
    let controller = &files[Path::new("api/user.rs")];
    assert!(controller.contains("use shop_api::model::user::Account;"));
}

#[test]
fn test_cli_missing_explicit_config_fails() {
    let (_db_dir, db) = shop_database();
    let work = tempfile::tempdir().unwrap();

    let output = schemagen(
        work.path(),
        &[
            "generate",
            "-e",
            "sqlite",
            "-d",
            db.to_str().unwrap(),
            "--config",
            "nope.toml",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("schemagen failed"));
}

#[test]
fn test_cli_failure_names_the_stage() {
    let (_db_dir, db) = sqlite_database(
        "CREATE TABLE places (id INTEGER PRIMARY KEY NOT NULL, shape GEOMETRY NOT NULL);",
    );
    let work = tempfile::tempdir().unwrap();

    let output = schemagen(
        work.path(),
        &["generate", "-e", "sqlite", "-d", db.to_str().unwrap(), "-o", "gen"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("generating `places`"), "{stderr}");
    assert!(stderr.contains("unsupported type"), "{stderr}");
    assert!(!work.path().join("gen").exists());
}

#[test]
fn test_cli_rejects_invalid_package() {
    let (_db_dir, db) = shop_database();
    let work = tempfile::tempdir().unwrap();

    let output = schemagen(
        work.path(),
        &[
            "generate",
            "-e",
            "sqlite",
            "-d",
            db.to_str().unwrap(),
            "--package",
            "not-a-path",
        ],
    );
    assert!(!output.status.success());
}

#[test]
fn test_cli_types_prints_mapping_table() {
    let work = tempfile::tempdir().unwrap();

    let output = schemagen(work.path(), &["types", "--nullable", "extended-nullable-types"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("native"));
    assert!(stdout.contains("NullI32"));
    assert!(stdout.contains("uuid"));
}
