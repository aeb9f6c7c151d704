use assert_cmd::Command;
use forum_client::test_util::one_shot_server;
use predicates::prelude::*;
use serial_test::serial;
use std::fs;

fn forum() -> Command {
    let mut cmd = Command::cargo_bin("forum").unwrap();
    cmd.env_remove("FORUM_API_URL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    forum()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("topics"))
        .stdout(predicate::str::contains("moderation"));
}

#[test]
fn status_without_token() {
    let dir = tempfile::tempdir().unwrap();

    forum()
        .arg("--token-file")
        .arg(dir.path().join("missing"))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No token found"));
}

#[test]
fn status_shows_saved_token_preview() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    fs::write(&path, "eyJhbGciOiJIUzI1NiJ9.payload.signature").unwrap();

    forum()
        .arg("--token-file")
        .arg(&path)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("eyJhbGciOiJIUzI1NiJ9..."));
}

#[test]
fn unknown_dashboard_section_is_a_usage_error() {
    forum()
        .args(["admin", "list", "widgets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown section"));
}

#[test]
#[serial]
fn unreachable_server_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();

    forum()
        .args(["--server", "http://127.0.0.1:9"])
        .arg("--token-file")
        .arg(dir.path().join("token"))
        .args(["topics", "list"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("❌"));
}

#[test]
#[serial]
fn login_saves_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    let (addr, server) = one_shot_server("200 OK", r#"{"token":"jwt-from-server","email":"ann@example.com"}"#);

    forum()
        .args(["--server", &addr])
        .arg("--token-file")
        .arg(&path)
        .args(["login", "--email", "ann@example.com", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Login successful"));

    let request = server.join().unwrap();
    assert!(request.starts_with("POST /api/auth/login"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "jwt-from-server");
}

#[test]
#[serial]
fn rejected_token_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    fs::write(&path, "expired").unwrap();
    let (addr, server) = one_shot_server("401 Unauthorized", r#"{"error":"token expired"}"#);

    forum()
        .args(["--server", &addr])
        .arg("--token-file")
        .arg(&path)
        .arg("whoami")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("token expired"))
        .stdout(predicate::str::contains("has been removed"));

    let request = server.join().unwrap();
    assert!(request.contains("Bearer expired") || request.contains("bearer expired"));
    assert!(!path.exists());
}

#[test]
fn empty_comment_is_rejected_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token");
    fs::write(&path, "jwt").unwrap();

    forum()
        .args(["--server", "http://127.0.0.1:9"])
        .arg("--token-file")
        .arg(&path)
        .args(["comments", "add", "5", "--content", "   "])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("empty"));
}
