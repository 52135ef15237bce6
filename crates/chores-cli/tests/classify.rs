//! Integration tests for the three-way failure classification as seen
//! from the CLI surface.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{TempDir, tempdir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn logged_in_home() -> TempDir {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("cookies.json"),
        r#"{"user": "{\"name\":\"Miya\"}", "oidc_token": "abc123"}"#,
    )
    .unwrap();
    temp
}

/// Test: a 401 invalidates the stored session silently; the recovery is
/// the logged-out state, not an error notice.
#[tokio::test(flavor = "multi_thread")]
async fn test_401_invalidates_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/household"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let temp = logged_in_home();
    let cookies_path = temp.path().join("cookies.json");

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", &server.uri()])
        .args(["household", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session has expired"))
        .stderr(predicate::str::contains("Something just broke").not())
        .stderr(predicate::str::contains("no longer a member").not());

    assert!(
        !cookies_path.exists(),
        "stale cookies should be discarded after a 401"
    );

    // The next command starts from the logged-out state.
    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .env_remove("CHORES_SERVER_URL")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

/// Test: a 403 raises the scoped membership warning and leaves the
/// session untouched.
#[tokio::test(flavor = "multi_thread")]
async fn test_403_warns_and_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/household/h1/task"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let temp = logged_in_home();
    let cookies_path = temp.path().join("cookies.json");

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", &server.uri()])
        .args([
            "task", "create", "--household", "h1", "--title", "Dishes", "--interval", "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "You are no longer a member of this household or never were.",
        ))
        .stderr(predicate::str::contains("session has expired").not());

    assert!(cookies_path.exists(), "403 must not clear the session");
}

/// Test: a 500 raises the generic failure notice with the issue pointer.
#[tokio::test(flavor = "multi_thread")]
async fn test_500_raises_generic_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/household"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = logged_in_home();

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", &server.uri()])
        .args(["household", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Something just broke..."))
        .stderr(predicate::str::contains("report an issue"));

    assert!(temp.path().join("cookies.json").exists());
}

/// Test: an unreachable backend classifies like any other transient
/// failure.
#[test]
fn test_network_failure_raises_generic_notice() {
    let temp = logged_in_home();

    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", "http://127.0.0.1:1"])
        .args(["household", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Something just broke..."));
}
