//! Request id and logging middleware.

mod helpers;

use helpers::TestApp;
use notedesk_server::middleware::MAX_REQUEST_ID_LEN;
use uuid::Uuid;

#[tokio::test]
async fn response_includes_request_id() {
    let app = TestApp::new();

    app.client
        .get("/health")
        .await
        .assert_header_exists("x-request-id");
}

#[tokio::test]
async fn generated_request_id_is_uuid_v4() {
    let app = TestApp::new();
    let response = app.client.get("/health").await;

    let id = response.header("x-request-id").unwrap();
    let parsed = Uuid::parse_str(id).unwrap();

    assert_eq!(parsed.get_version_num(), 4);
}

#[tokio::test]
async fn propagates_incoming_request_id() {
    let app = TestApp::new();
    let custom_id = "console-req-12345";

    let response = app
        .client
        .get_with_headers("/health", vec![("x-request-id", custom_id)])
        .await;

    response.assert_header("x-request-id", custom_id);
}

#[tokio::test]
async fn replaces_oversized_request_id() {
    let app = TestApp::new();
    let oversized = "a".repeat(MAX_REQUEST_ID_LEN + 1);

    let response = app
        .client
        .get_with_headers("/health", vec![("x-request-id", oversized.as_str())])
        .await;

    let id = response.header("x-request-id").unwrap();
    assert_ne!(id, oversized);
    assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn generates_different_ids_for_each_request() {
    let app = TestApp::new();

    let first = app.client.get("/health").await;
    let second = app.client.get("/health").await;

    assert_ne!(
        first.header("x-request-id").unwrap(),
        second.header("x-request-id").unwrap()
    );
}

#[tokio::test]
async fn error_responses_carry_request_id() {
    let app = TestApp::new();

    let response = app.client.get("/api/notes").await;

    response.assert_header_exists("x-request-id");
}
