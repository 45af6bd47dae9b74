//! In-process mock backend used by unit tests.
//!
//! Responses are served in the order they were queued, regardless of path,
//! and every request is recorded for later assertions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::Response;
use serde_json::Value;

use crate::api::ApiClient;
use crate::api::config::ApiConfig;
use crate::auth::{AuthState, STORAGE_KEY, Session};
use crate::normalize::NormalizeMode;
use crate::storage::{KeyValueStore, MemoryStore};

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl MockResponse {
    pub fn json(status: u16, value: &Value) -> Self {
        Self { status, content_type: Some("application/json; charset=utf-8"), body: value.to_string() }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self { status, content_type: Some("text/html; charset=utf-8"), body: body.to_owned() }
    }
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: String,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct MockState {
    queue: Mutex<VecDeque<MockResponse>>,
    seen: Mutex<Vec<SeenRequest>>,
}

pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start(responses: Vec<MockResponse>) -> Self {
        let state = Arc::new(MockState { queue: Mutex::new(responses.into()), seen: Mutex::new(Vec::new()) });
        let handler_state = state.clone();
        let app = Router::new().fallback(move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
            let state = handler_state.clone();
            async move { respond(&state, method, uri, headers, body) }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}"), state }
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig::default().with_base_url(&self.base_url)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config()).unwrap()
    }

    /// Auth state restored from a stored session carrying `token` and `session_id`.
    pub fn authed(&self, token: Option<&str>, session_id: Option<&str>) -> AuthState {
        let session = Session {
            token: token.map(str::to_owned),
            session_id: session_id.map(str::to_owned),
            user: Value::String("tester".into()),
            success_flag: true,
            raw: Value::Null,
            logged_in_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let store = Arc::new(MemoryStore::new());
        store.set(STORAGE_KEY, &serde_json::to_string(&session).unwrap()).unwrap();
        AuthState::new(Arc::new(self.client()), store, NormalizeMode::Lenient).unwrap()
    }

    pub fn anonymous(&self) -> AuthState {
        AuthState::new(Arc::new(self.client()), Arc::new(MemoryStore::new()), NormalizeMode::Lenient).unwrap()
    }

    pub fn push(&self, response: MockResponse) {
        self.state.queue.lock().unwrap().push_back(response);
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().unwrap().clone()
    }
}

fn respond(state: &MockState, method: Method, uri: Uri, headers: HeaderMap, body: String) -> Response {
    let query = uri
        .query()
        .and_then(|q| reqwest::Url::parse(&format!("http://mock/?{q}")).ok())
        .map(|url| url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect())
        .unwrap_or_default();
    state
        .seen
        .lock()
        .unwrap()
        .push(SeenRequest { method, path: uri.path().to_owned(), query, headers, body });

    let next = state.queue.lock().unwrap().pop_front();
    let Some(mock) = next else {
        return Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("no mock response queued"))
            .unwrap();
    };
    let mut builder = Response::builder().status(mock.status);
    if let Some(content_type) = mock.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(mock.body)).unwrap()
}
