//! Integration tests for login/logout flows.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test: login stores the pasted session cookies with 0600 permissions.
#[test]
fn test_login_stores_cookies() {
    let temp = tempdir().unwrap();
    let cookies_path = temp.path().join("cookies.json");

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .env("CHORES_NO_BROWSER", "1")
        .env_remove("CHORES_SERVER_URL")
        .arg("login")
        .write_stdin("user={\"name\":\"Miya\"}; oidc_token=abc123\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("/oidc/login"))
        .stdout(predicate::str::contains("Logged in as Miya."));

    assert!(cookies_path.exists(), "cookies.json should exist");
    let contents = fs::read_to_string(&cookies_path).unwrap();
    assert!(contents.contains("Miya"), "user cookie should be stored");
    assert!(contents.contains("abc123"), "token cookie should be stored");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&cookies_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

/// Test: login also accepts the raw user cookie JSON value.
#[test]
fn test_login_accepts_raw_json() {
    let temp = tempdir().unwrap();

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .env("CHORES_NO_BROWSER", "1")
        .env_remove("CHORES_SERVER_URL")
        .arg("login")
        .write_stdin("{\"name\":\"Miya\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Miya."));
}

/// Test: garbage session input fails without writing anything.
#[test]
fn test_login_rejects_garbage() {
    let temp = tempdir().unwrap();

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .env("CHORES_NO_BROWSER", "1")
        .env_remove("CHORES_SERVER_URL")
        .arg("login")
        .write_stdin("garbage\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read a session"));

    assert!(!temp.path().join("cookies.json").exists());
}

/// Test: logout tells the backend and clears the stored session.
#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oidc/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempdir().unwrap();
    let cookies_path = temp.path().join("cookies.json");
    fs::write(
        &cookies_path,
        r#"{"user": "{\"name\":\"Miya\"}", "oidc_token": "abc123"}"#,
    )
    .unwrap();

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", &server.uri()])
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!cookies_path.exists(), "cookies.json should be removed");
}

/// Test: logout clears the local session even when the backend is down.
#[test]
fn test_logout_survives_unreachable_backend() {
    let temp = tempdir().unwrap();
    let cookies_path = temp.path().join("cookies.json");
    fs::write(&cookies_path, r#"{"user": "{\"name\":\"Miya\"}"}"#).unwrap();

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", "http://127.0.0.1:1"])
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!cookies_path.exists());
}

/// Test: logout without a session is a friendly no-op.
#[test]
fn test_logout_when_not_logged_in() {
    let temp = tempdir().unwrap();

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .env_remove("CHORES_SERVER_URL")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}
