use serde_json::Value;

use crate::cli::api_client::ApiClient;
use crate::cli::commands::request;
use crate::cli::commands::task::*;
use crate::cli::commands::test_server::spawn_test_server;
use crate::cli::error::CliError;

async fn planned(api_client: &ApiClient, tasks: &[&str]) -> (String, Vec<String>) {
    let tasks: Vec<String> = tasks.iter().map(|t| t.to_string()).collect();
    let output = request::plan(api_client, "Tidy the repo", &tasks, None, "json")
        .await
        .expect("plan should succeed");
    let parsed: Value = serde_json::from_str(&output).unwrap();

    let request_id = parsed["requestId"].as_str().unwrap().to_string();
    let task_ids = parsed["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    (request_id, task_ids)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_done_twice_fails_with_invalid_state() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));
    let (request_id, task_ids) = planned(&api_client, &["A"]).await;

    done(&api_client, &request_id, &task_ids[0], None, "table")
        .await
        .unwrap();
    let err = done(&api_client, &request_id, &task_ids[0], None, "table")
        .await
        .unwrap_err();

    match err {
        CliError::ToolFailed { kind, .. } => assert_eq!(kind, "InvalidStateError"),
        other => panic!("Expected ToolFailed, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_update_delete_integration() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));
    let (request_id, task_ids) = planned(&api_client, &["A"]).await;

    let added = add(
        &api_client,
        &request_id,
        &["B::second".to_string(), "C".to_string()],
        "json",
    )
    .await
    .unwrap();
    let added: Value = serde_json::from_str(&added).unwrap();
    assert_eq!(added["addedTasks"].as_array().unwrap().len(), 2);
    let b_id = added["addedTasks"][0]["id"].as_str().unwrap().to_string();

    let updated = update(
        &api_client,
        &request_id,
        &b_id,
        Some("B renamed"),
        None,
        "table",
    )
    .await
    .unwrap();
    assert!(updated.contains("B renamed"));

    let deleted = delete(&api_client, &request_id, &task_ids[0], "table")
        .await
        .unwrap();
    assert!(deleted.contains("deleted"));

    let shown = request::show(&api_client, &request_id, "json").await.unwrap();
    let shown: Value = serde_json::from_str(&shown).unwrap();
    let titles: Vec<&str> = shown["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B renamed", "C"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_requires_a_field() {
    let api_client = ApiClient::new(Some("http://127.0.0.1:1".to_string()));

    let err = update(&api_client, "req", "task", None, None, "table")
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::InvalidArgument { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_details_integration() {
    let (url, _handle) = spawn_test_server().await;
    let api_client = ApiClient::new(Some(url));
    let (request_id, task_ids) = planned(&api_client, &["Löschen::alte Dateien entfernen"]).await;

    done(
        &api_client,
        &request_id,
        &task_ids[0],
        Some("3 Dateien entfernt"),
        "table",
    )
    .await
    .unwrap();

    let output = details(&api_client, &task_ids[0], "table").await.unwrap();
    assert!(output.contains("Task:        Löschen"));
    assert!(output.contains("Tidy the repo"));
    assert!(output.contains("DONE"));
    assert!(output.contains("3 Dateien entfernt"));
    assert!(output.contains("✗"));
}
