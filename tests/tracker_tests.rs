use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db, init_db_with_rated_night, rst, setup_test_db};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("init_creates");

    rst()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_start_shows_night_in_progress() {
    let db_path = setup_test_db("start_in_progress");
    init_db(&db_path);

    rst()
        .args(["--db", &db_path, "start"])
        .assert()
        .success()
        .stdout(contains("Tracking night #1"));

    rst()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("Sleep Results"))
        .stdout(contains("#1"))
        .stdout(contains("in progress"));
}

#[test]
fn test_start_twice_keeps_a_single_night() {
    let db_path = setup_test_db("start_twice");
    init_db(&db_path);

    rst().args(["--db", &db_path, "start"]).assert().success();
    rst()
        .args(["--db", &db_path, "start"])
        .assert()
        .success()
        .stdout(contains("Already tracking night #1"));

    rst()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("#1").and(contains("#2").not()));
}

#[test]
fn test_stop_without_night_is_a_noop() {
    let db_path = setup_test_db("stop_noop");
    init_db(&db_path);

    rst()
        .args(["--db", &db_path, "stop"])
        .assert()
        .success()
        .stdout(contains("No night in progress"));
}

#[test]
fn test_stop_then_rate() {
    let db_path = setup_test_db("stop_then_rate");
    init_db(&db_path);

    rst().args(["--db", &db_path, "start"]).assert().success();
    rst()
        .args(["--db", &db_path, "stop"])
        .assert()
        .success()
        .stdout(contains("Stopped night #1"))
        .stdout(contains("rsleeptracker rate 1"));

    rst()
        .args(["--db", &db_path, "rate", "1", "4"])
        .assert()
        .success()
        .stdout(contains("Night #1 rated"))
        .stdout(contains("Pretty good"));

    rst()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("Pretty good").and(contains("in progress").not()));
}

#[test]
fn test_new_night_after_a_finished_one() {
    let db_path = setup_test_db("second_night");
    init_db_with_rated_night(&db_path, "2");

    rst()
        .args(["--db", &db_path, "start"])
        .assert()
        .success()
        .stdout(contains("Tracking night #2"));
}

#[test]
fn test_rate_unknown_night_fails() {
    let db_path = setup_test_db("rate_unknown");
    init_db(&db_path);

    rst()
        .args(["--db", &db_path, "rate", "99", "3"])
        .assert()
        .failure()
        .stderr(contains("No sleep night with id 99"));
}

#[test]
fn test_rate_out_of_range_is_rejected() {
    let db_path = setup_test_db("rate_range");
    init_db(&db_path);

    rst()
        .args(["--db", &db_path, "rate", "1", "7"])
        .assert()
        .failure();
}

#[test]
fn test_clear_shows_confirmation_once() {
    let db_path = setup_test_db("clear_once");
    init_db_with_rated_night(&db_path, "5");

    rst()
        .args(["--db", &db_path, "clear"])
        .assert()
        .success()
        .stdout(contains("All your data is gone forever."));

    rst()
        .args(["--db", &db_path, "clear"])
        .assert()
        .success()
        .stdout(contains("Nothing to clear").and(contains("gone forever").not()));

    rst()
        .args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("No nights recorded yet"));
}

#[test]
fn test_show_night_details() {
    let db_path = setup_test_db("show_details");
    init_db_with_rated_night(&db_path, "0");

    rst()
        .args(["--db", &db_path, "show", "1"])
        .assert()
        .success()
        .stdout(contains("#1"))
        .stdout(contains("Very bad"))
        .stdout(contains("Length"));

    rst()
        .args(["--db", &db_path, "show", "5"])
        .assert()
        .failure()
        .stderr(contains("No sleep night with id 5"));
}
