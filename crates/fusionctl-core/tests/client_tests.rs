//! Integration tests for the Fusion client and operation awaiting, against
//! a mock HTTP server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fusionctl_core::{
    ApiError, ClientError, CoreError, FusionClient, OperationStatus, OperationsClient,
    await_operation, create_and_await, delete_and_await,
};

fn client_for(server: &MockServer) -> FusionClient {
    FusionClient::builder()
        .base_url(&server.uri())
        .api_token("test-token")
        .build()
        .unwrap()
}

#[tokio::test]
async fn get_operation_returns_typed_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations/op1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "op1",
            "request_type": "CreateVolume",
            "status": "Succeeded",
            "created_at": 1712000000000i64
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let operation = client.get_operation("op1").await.unwrap();
    assert_eq!(operation.id, "op1");
    assert_eq!(operation.status, OperationStatus::Succeeded);
    assert_eq!(operation.request_type.as_deref(), Some("CreateVolume"));
}

#[tokio::test]
async fn get_operation_maps_structured_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "operation 'missing' does not exist"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_operation("missing").await.unwrap_err();
    match err {
        ClientError::Api(ApiError::NotFound { message }) => {
            assert_eq!(message, "operation 'missing' does not exist");
        }
        other => panic!("expected Api(NotFound), got {other:?}"),
    }
}

#[tokio::test]
async fn get_operation_maps_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations/op1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_operation("op1").await.unwrap_err();
    match err {
        ClientError::Api(api) => {
            assert_eq!(api.status(), 503);
            assert!(api.is_server_error());
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_operations_unwraps_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "op1", "status": "Succeeded"},
                {"id": "op2", "status": "Pending", "retry_in": 250}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let operations = client.list_operations(Some(2)).await.unwrap();
    assert_eq!(operations.len(), 2);
    assert_eq!(operations[1].retry_in, Some(250));
}

#[tokio::test]
async fn await_operation_polls_until_succeeded() {
    let server = MockServer::start().await;
    // Two pending observations, then the terminal one. Exhausted mocks stop
    // matching, so mount order gives the sequence.
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations/op1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "op1", "status": "Pending", "retry_in": 5
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations/op1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "op1", "status": "Succeeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let operation = await_operation(
        &client,
        "op1",
        Some(Duration::from_secs(5)),
        Duration::from_millis(5),
        None,
    )
    .await
    .unwrap();
    assert_eq!(operation.status, OperationStatus::Succeeded);
}

#[tokio::test]
async fn await_operation_surfaces_failed_operation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations/op1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "op1",
            "status": "Failed",
            "error": {"message": "quota exceeded", "http_code": 409}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = await_operation(&client, "op1", None, Duration::from_millis(5), None)
        .await
        .unwrap_err();
    match err {
        CoreError::OperationFailed { operation } => {
            assert_eq!(operation.error_message(), "quota exceeded");
        }
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn await_operation_propagates_api_error_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations/op1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "not found"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = await_operation(&client, "op1", None, Duration::from_millis(5), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Api(ApiError::NotFound { .. })));
}

#[tokio::test]
async fn await_operation_wraps_connection_failure() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    // Tear the server down so the next poll hits a dead socket.
    drop(server);

    let err = await_operation(&client, "op1", None, Duration::from_millis(5), None)
        .await
        .unwrap_err();
    match err {
        CoreError::OperationUnconfirmed { operation, source } => {
            assert_eq!(operation.id, "op1");
            assert_eq!(operation.status, OperationStatus::Pending);
            assert!(source.downcast_ref::<reqwest::Error>().is_some());
        }
        other => panic!("expected OperationUnconfirmed, got {other:?}"),
    }
}

#[tokio::test]
async fn create_and_await_submits_then_polls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/1.2/volumes"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "id": "op-create", "request_type": "CreateVolume",
            "status": "Pending", "retry_in": 5
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations/op-create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "op-create", "request_type": "CreateVolume", "status": "Succeeded"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let operation = create_and_await(
        &client,
        "/volumes",
        &json!({"name": "vol-1", "size": 1073741824u64}),
        Some(Duration::from_secs(5)),
        Duration::from_millis(5),
        None,
    )
    .await
    .unwrap();
    assert_eq!(operation.id, "op-create");
    assert_eq!(operation.status, OperationStatus::Succeeded);
}

#[tokio::test]
async fn create_without_operation_handle_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/1.2/volumes"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = create_and_await(
        &client,
        "/volumes",
        &json!({"name": "vol-1"}),
        None,
        Duration::from_millis(5),
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn delete_and_await_reports_step_failure() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/1.2/volumes/vol-1"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "id": "op-delete", "status": "Pending", "retry_in": 5
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/1.2/operations/op-delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "op-delete",
            "status": "Failed",
            "error": {"message": "volume is attached", "pure_code": "in-use"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = delete_and_await(
        &client,
        "/volumes/vol-1",
        Some(Duration::from_secs(5)),
        Duration::from_millis(5),
        None,
    )
    .await
    .unwrap_err();
    match err {
        CoreError::OperationFailed { operation } => {
            assert_eq!(operation.id, "op-delete");
            assert_eq!(
                operation.error.as_ref().unwrap().pure_code.as_deref(),
                Some("in-use")
            );
        }
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}
