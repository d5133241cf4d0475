use serde_json::json;
use serial_test::serial;

use crate::cli::api_client::*;
use crate::cli::commands::test_server::spawn_test_server;
use crate::cli::error::CliError;

#[test]
fn test_new_with_explicit_url() {
    let client = ApiClient::new(Some("http://custom:8080".to_string()));
    assert_eq!(client.base_url(), "http://custom:8080");
}

#[test]
fn test_trailing_slash_is_trimmed() {
    let client = ApiClient::new(Some("http://custom:8080/".to_string()));
    assert_eq!(client.base_url(), "http://custom:8080");
}

#[test]
#[serial]
fn test_env_var_is_used() {
    unsafe {
        std::env::set_var(API_URL_ENV, "http://from-env:9999");
    }

    let client = ApiClient::new(None);
    assert_eq!(client.base_url(), "http://from-env:9999");

    unsafe {
        std::env::remove_var(API_URL_ENV);
    }
}

#[test]
#[serial]
fn test_new_with_default() {
    unsafe {
        std::env::remove_var(API_URL_ENV);
    }

    let client = ApiClient::new(None);
    assert_eq!(client.base_url(), DEFAULT_API_URL);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invoke_returns_result_fields() {
    let (url, _handle) = spawn_test_server().await;
    let client = ApiClient::new(Some(url));

    let result = client
        .invoke("list_requests", json!({}))
        .await
        .expect("list_requests should succeed");

    assert_eq!(result["total"], 0);
    assert!(!result.contains_key("success"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invoke_failure_carries_error_kind() {
    let (url, _handle) = spawn_test_server().await;
    let client = ApiClient::new(Some(url));

    let err = client
        .invoke("get_next_task", json!({"requestId": "missing"}))
        .await
        .expect_err("missing request should fail");

    match err {
        CliError::ToolFailed { kind, message } => {
            assert_eq!(kind, "NotFoundError");
            assert!(message.contains("missing"));
        }
        other => panic!("Expected ToolFailed, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_refused_is_connection_failed() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = ApiClient::new(Some(format!("http://127.0.0.1:{}", port)));
    let err = client
        .invoke("list_requests", json!({}))
        .await
        .expect_err("nothing is listening");

    assert!(matches!(err, CliError::ConnectionFailed { .. }));
}
