//! Integration tests for household list/create against a mock backend.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{TempDir, tempdir};
use wiremock::matchers::{body_json, header_exists, method, path};
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

/// Test: household list renders the backend's list in order.
#[tokio::test(flavor = "multi_thread")]
async fn test_household_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/household"))
        .and(header_exists("cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "h1", "name": "Miya's House", "members": []},
            {"id": "h2", "name": "Shared Flat", "members": []},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let temp = logged_in_home();
    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", &server.uri()])
        .args(["household", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Miya's House"))
        .stdout(predicate::str::contains("Shared Flat"));
}

/// Test: an empty list is distinguishable from a failed load.
#[tokio::test(flavor = "multi_thread")]
async fn test_household_list_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/household"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let temp = logged_in_home();
    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", &server.uri()])
        .args(["household", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No households yet."));
}

/// Test: household create posts the name and prints the created record.
#[tokio::test(flavor = "multi_thread")]
async fn test_household_create() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/household"))
        .and(body_json(serde_json::json!({"name": "Whacky House"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(
            {"id": "h3", "name": "Whacky House", "members": []}
        )))
        .expect(1)
        .mount(&server)
        .await;

    let temp = logged_in_home();
    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", &server.uri()])
        .args(["household", "create", "Whacky House"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created household Whacky House (h3)"));
}

/// Test: an empty name is blocked client-side; no request is issued.
#[tokio::test(flavor = "multi_thread")]
async fn test_household_create_empty_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/household"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp = logged_in_home();
    Command::cargo_bin("chores")
        .unwrap()
        .env("CHORES_HOME", temp.path())
        .args(["--server", &server.uri()])
        .args(["household", "create", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name is required"));
}
