//! In-process stand-in for the PushBots REST API.
//!
//! Serves every endpoint the client talks to, rejects calls without both auth
//! headers, records each accepted call, and answers with a configurable
//! canned response (200 with an empty body unless told otherwise).

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

pub const APP_ID_HEADER: &str = "x-pushbots-appid";
pub const SECRET_HEADER: &str = "x-pushbots-secret";

const PUT_ROUTES: [&str; 10] = [
    "/deviceToken",
    "/deviceToken/del",
    "/alias",
    "/tag",
    "/tag/del",
    "/geo",
    "/activate",
    "/deactivate",
    "/badge",
    "/stats",
];
const POST_ROUTES: [&str; 2] = ["/push/all", "/push/one"];

/// One accepted API call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub app_id: String,
    pub secret: String,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl Default for CannedResponse {
    fn default() -> Self {
        Self {
            status: 200,
            body: String::new(),
        }
    }
}

/// Shared between the router and the test driving it. Locks are never held
/// across an `.await`, so the state is usable from synchronous tests too.
#[derive(Clone, Default)]
pub struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    response: Arc<Mutex<CannedResponse>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    pub fn clear(&self) {
        lock(&self.requests).clear();
    }

    /// Answer every subsequent accepted call with `status` and `body`.
    pub fn respond_with(&self, status: u16, body: impl Into<String>) {
        *lock(&self.response) = CannedResponse {
            status,
            body: body.into(),
        };
    }

    fn record(&self, request: RecordedRequest) {
        lock(&self.requests).push(request);
    }

    fn canned(&self) -> CannedResponse {
        lock(&self.response).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn app() -> Router {
    app_with_state(MockState::new())
}

pub fn app_with_state(state: MockState) -> Router {
    let mut router = Router::new().route("/_requests", get(list_requests));
    for path in PUT_ROUTES {
        router = router.route(path, put(handle_call));
    }
    for path in POST_ROUTES {
        router = router.route(path, post(handle_call));
    }
    router.with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock pushbots listening");
    }
    axum::serve(listener, app_with_state(state)).await
}

async fn list_requests(State(state): State<MockState>) -> Json<Vec<RecordedRequest>> {
    Json(state.requests())
}

async fn handle_call(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let app_id = header_value(APP_ID_HEADER).unwrap_or_default();
    let secret = header_value(SECRET_HEADER).unwrap_or_default();
    if app_id.is_empty() || secret.is_empty() {
        warn!(path = uri.path(), "rejecting call without credentials");
        return json_response(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Application ID and secret are required" }).to_string(),
        );
    }

    let body: Value = match serde_json::from_str(&body) {
        Ok(body) => body,
        Err(err) => {
            warn!(path = uri.path(), error = %err, "rejecting non-JSON body");
            return json_response(
                StatusCode::BAD_REQUEST,
                json!({ "message": "Request body must be JSON" }).to_string(),
            );
        }
    };

    debug!(%method, path = uri.path(), %body, "recorded call");
    state.record(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        app_id,
        secret,
        content_type: header_value(header::CONTENT_TYPE.as_str()),
        body,
    });

    let canned = state.canned();
    let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_response(status, canned.body)
}

fn json_response(status: StatusCode, body: String) -> axum::response::Response {
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
