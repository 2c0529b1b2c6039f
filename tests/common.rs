#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// The binary, with HOME pointed at a scratch directory so a real
/// configuration file is never read.
pub fn rst() -> Command {
    let home = env::temp_dir().join("rsleeptracker_test_home");
    fs::create_dir_all(&home).ok();

    let mut cmd = cargo_bin_cmd!("rsleeptracker");
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rsleeptracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh database with its schema.
pub fn init_db(db_path: &str) {
    rst()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Fresh database holding one finished night rated `quality` (id 1).
pub fn init_db_with_rated_night(db_path: &str, quality: &str) {
    init_db(db_path);
    rst().args(["--db", db_path, "start"]).assert().success();
    rst().args(["--db", db_path, "stop"]).assert().success();
    rst()
        .args(["--db", db_path, "rate", "1", quality])
        .assert()
        .success();
}
