// SPDX-FileCopyrightText: 2026 Kyupi Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: the compiled binary's config commands, and a full
//! like-match-chat conversation through the HTTP router over SQLite.

use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use kyupi_core::{MatchStore, StorageAdapter, UserId};
use kyupi_engine::{ChatGate, MatchingEngine};
use kyupi_gateway::GatewayServer;
use kyupi_storage::SqliteStorage;
use kyupi_test_utils::TestHarness;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

fn kyupi(config: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kyupi"));
    cmd.arg("--config").arg(config).args(args).env("NO_COLOR", "1");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().expect("binary should run")
}

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("kyupi.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn config_check_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[gateway]\nport = 9000\n");

    let out = kyupi(&path, &["config", "check"], &[]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("configuration is valid"));
}

#[test]
fn config_check_reports_typo_with_suggestion() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "[gateway]\nprot = 9000\n");

    let out = kyupi(&path, &["config", "check"], &[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown configuration key"), "stderr: {stderr}");
    assert!(stderr.contains("did you mean `port`"), "stderr: {stderr}");
}

#[test]
fn config_show_applies_env_and_redacts_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[gateway]\nport = 9000\nbearer_token = \"edge-secret\"\n",
    );

    let out = kyupi(
        &path,
        &["config", "show"],
        &[("KYUPI_GATEWAY_PORT", "9191"), ("KYUPI_CHAT_MAX_MESSAGE_LENGTH", "77")],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("port = 9191"), "stdout: {stdout}");
    assert!(stdout.contains("max_message_length = 77"), "stdout: {stdout}");
    assert!(!stdout.contains("edge-secret"));
}

async fn call(
    router: &axum::Router,
    user: &UserId,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(path)
        .header("x-user-id", user.to_string())
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn two_users_match_chat_and_survive_restart() {
    let harness = TestHarness::new().await.unwrap();
    let storage = harness.storage.clone();
    let engine = MatchingEngine::new(storage.clone(), storage.clone());
    let chat = ChatGate::new(storage.clone(), storage.clone(), &harness.config.chat);
    let server = GatewayServer::new(
        &harness.config.gateway,
        engine,
        chat,
        storage.clone(),
        &CancellationToken::new(),
    )
    .unwrap();
    let router = server.router();
    let (alice, bob) = (UserId::new(), UserId::new());

    let like = |target: &UserId| Some(json!({ "target_user_id": target.to_string() }));

    let (status, body) = call(&router, &alice, "POST", "/v1/likes", like(&bob)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["matched"], false);
    assert_eq!(body["like"]["status"], "like");

    let (_, body) = call(&router, &bob, "POST", "/v1/likes", like(&alice)).await;
    assert_eq!(body["matched"], true);
    let match_id = body["match"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["match"]["identity_low"], alice.min(bob).to_string());
    assert_eq!(body["match"]["identity_high"], alice.max(bob).to_string());

    let conversation = [
        (&alice, &bob, "hi bob"),
        (&bob, &alice, "hi alice"),
        (&alice, &bob, "coffee?"),
    ];
    for (from, to, text) in conversation {
        let (status, _) = call(
            &router,
            from,
            "POST",
            "/v1/messages",
            Some(json!({ "receiver_id": to.to_string(), "content": text })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let path = format!("/v1/matches/{match_id}/messages");
    let (status, body) = call(&router, &bob, "GET", &path, None).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["hi bob", "hi alice", "coffee?"]);

    // Reopen the same database file with a fresh adapter.
    storage.close().await.unwrap();
    let reopened = Arc::new(
        SqliteStorage::open(harness.config.storage.clone())
            .await
            .unwrap(),
    );
    assert!(reopened.exists(&alice, &bob).await.unwrap());
    let matches = reopened.list_for_identity(&bob).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id.to_string(), match_id);
    reopened.close().await.unwrap();
}
