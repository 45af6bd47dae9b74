use super::*;
use crate::test_support::{MockBackend, MockResponse};
use serde_json::json;

fn creds(token: Option<&str>, session_id: Option<&str>) -> Credentials {
    Credentials { token: token.map(str::to_owned), session_id: session_id.map(str::to_owned) }
}

// =============================================================================
// build_url
// =============================================================================

#[test]
fn build_url_encodes_params() {
    let url = build_url("http://host.test/login", &[("usr", "a b&c"), ("pwd", "p=1")]).unwrap();
    assert_eq!(url.as_str(), "http://host.test/login?usr=a+b%26c&pwd=p%3D1");
}

#[test]
fn build_url_appends_to_existing_query() {
    let url = build_url("http://host.test/x?fixed=1", &[("user_name", "bob")]).unwrap();
    assert_eq!(url.query(), Some("fixed=1&user_name=bob"));
}

#[test]
fn build_url_without_params_is_unchanged() {
    let url = build_url("http://host.test/x", &[]).unwrap();
    assert_eq!(url.query(), None);
}

#[test]
fn build_url_rejects_garbage() {
    assert!(matches!(build_url("not a url", &[]), Err(ApiError::InvalidUrl(_))));
}

// =============================================================================
// request
// =============================================================================

#[tokio::test]
async fn login_sends_query_and_accept_header() {
    let backend = MockBackend::start(vec![MockResponse::json(200, &json!({ "message": { "sid": "abc" } }))]).await;
    let client = backend.client();

    let payload = client.login_user("alice", "s3cret").await.unwrap();
    assert_eq!(payload, Payload::Json(json!({ "message": { "sid": "abc" } })));

    let seen = backend.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].path, "/api/method/assignment.API.access_token.get_access_token");
    assert_eq!(seen[0].query_value("usr"), Some("alice"));
    assert_eq!(seen[0].query_value("pwd"), Some("s3cret"));
    assert_eq!(seen[0].header("accept"), Some("application/json"));
    assert_eq!(seen[0].header("content-type"), None);
    assert_eq!(seen[0].header("authorization"), None);
}

#[tokio::test]
async fn protected_calls_attach_both_auth_headers() {
    let backend = MockBackend::start(vec![MockResponse::json(200, &json!({ "message": [] }))]).await;
    let client = backend.client();

    client.fetch_users(&creds(Some("key:secret"), Some("sid-1"))).await.unwrap();

    let seen = &backend.seen()[0];
    assert_eq!(seen.header("authorization"), Some("token key:secret"));
    assert_eq!(seen.header("x-frappe-sid"), Some("sid-1"));
}

#[tokio::test]
async fn empty_credentials_send_no_auth_headers() {
    let backend = MockBackend::start(vec![MockResponse::json(200, &json!({}))]).await;
    backend.client().fetch_users(&Credentials::default()).await.unwrap();

    let seen = &backend.seen()[0];
    assert_eq!(seen.header("authorization"), None);
    assert_eq!(seen.header("x-frappe-sid"), None);
}

#[tokio::test]
async fn fetch_user_by_name_passes_user_name() {
    let backend = MockBackend::start(vec![MockResponse::json(200, &json!({ "message": {} }))]).await;
    backend
        .client()
        .fetch_user_by_name("Jane Doe", &creds(None, Some("sid")))
        .await
        .unwrap();

    let seen = &backend.seen()[0];
    assert_eq!(seen.path, "/api/method/assignment.API.specific_user.get_specific");
    assert_eq!(seen.query_value("user_name"), Some("Jane Doe"));
}

#[tokio::test]
async fn update_user_puts_json_body_to_encoded_path() {
    let backend = MockBackend::start(vec![MockResponse::json(200, &json!({ "data": { "name1": "Jane" } }))]).await;
    let body = json!({ "name1": "Jane", "age": "31" });

    backend
        .client()
        .update_user("Jane Doe/2", &body, &creds(Some("t"), None))
        .await
        .unwrap();

    let seen = &backend.seen()[0];
    assert_eq!(seen.method, Method::PUT);
    assert_eq!(seen.path, "/api/resource/Assignment/Jane%20Doe%2F2");
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert_eq!(seen.json_body(), body);
}

#[tokio::test]
async fn non_json_response_is_returned_as_text() {
    let backend = MockBackend::start(vec![MockResponse::text(200, "<html>ok</html>")]).await;
    let payload = backend.client().fetch_users(&Credentials::default()).await.unwrap();
    assert_eq!(payload, Payload::Text("<html>ok</html>".into()));
}

#[tokio::test]
async fn error_status_carries_backend_message() {
    let body = json!({ "message": "Not permitted", "exc_type": "PermissionError" });
    let backend = MockBackend::start(vec![MockResponse::json(403, &body)]).await;

    let err = backend.client().fetch_users(&Credentials::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.to_string(), "Not permitted");
    match err {
        ApiError::Status { details, .. } => assert_eq!(details, Payload::Json(body)),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_status_with_object_message_is_generic() {
    let backend = MockBackend::start(vec![MockResponse::json(500, &json!({ "message": { "x": 1 } }))]).await;
    let err = backend.client().fetch_users(&Credentials::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed");
}

#[tokio::test]
async fn error_status_with_text_body_uses_text() {
    let backend = MockBackend::start(vec![MockResponse::text(502, "Bad Gateway")]).await;
    let err = backend.client().fetch_users(&Credentials::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "Bad Gateway");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    // Bind then drop so the port is known to be closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&ApiConfig::default().with_base_url(&format!("http://{addr}"))).unwrap();
    let err = client.fetch_users(&Credentials::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}
