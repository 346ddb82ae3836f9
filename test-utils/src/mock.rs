//! Mock tenant services.
//!
//! A `MockService` is a tiny axum server answering a fixed set of `(method, path)`
//! routes with canned responses. Every request it receives is recorded so tests can
//! assert on the query string, headers and body the gateway actually sent.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use tokio::{net::TcpListener, task::JoinHandle};

/// Canned response returned by a mock route.
#[derive(Clone, Debug)]
pub struct MockResponse {
    status: StatusCode,
    body: MockBody,
    headers: Vec<(String, String)>,
    delay: Option<Duration>,
}

#[derive(Clone, Debug)]
enum MockBody {
    Json(Value),
    Text(String),
}

impl MockResponse {
    /// 200 OK with a JSON body.
    pub fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: MockBody::Json(body),
            headers: Vec::new(),
            delay: None,
        }
    }

    /// A raw, non-JSON body with the given status.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::OK),
            body: MockBody::Text(body.into()),
            headers: Vec::new(),
            delay: None,
        }
    }

    /// Overrides the response status.
    pub fn status(mut self, status: u16) -> Self {
        self.status = StatusCode::from_u16(status).unwrap_or(self.status);
        self
    }

    /// Adds a response header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Sleeps before answering, to exercise client timeouts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn render(self) -> Response {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut response = match self.body {
            MockBody::Json(value) => (self.status, axum::Json(value)).into_response(),
            MockBody::Text(text) => (self.status, text).into_response(),
        };

        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                response.headers_mut().insert(name, value);
            }
        }

        response
    }
}

/// A request received by a mock service.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Value of a single query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then(|| value.to_string())
        })
    }

    /// The request body parsed as JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Route table of a mock service, configured before the service starts.
#[derive(Clone, Debug, Default)]
pub struct MockService {
    routes: HashMap<(Method, String), MockResponse>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `GET path` with `response`. The query string is ignored for matching.
    pub fn get(self, path: &str, response: MockResponse) -> Self {
        self.route(Method::GET, path, response)
    }

    /// Answers `POST path` with `response`.
    pub fn post(self, path: &str, response: MockResponse) -> Self {
        self.route(Method::POST, path, response)
    }

    pub fn route(mut self, method: Method, path: &str, response: MockResponse) -> Self {
        self.routes.insert((method, path.to_string()), response);
        self
    }

    /// Starts the service on an ephemeral local port.
    ///
    /// # Returns
    /// - `Ok(RunningService)` - Port, request log and the server task
    /// - `Err(std::io::Error)` - Failed to bind the listener
    pub async fn spawn(self) -> Result<RunningService, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            routes: Arc::new(self.routes),
            requests: Arc::clone(&requests),
        };

        let app = Router::new().fallback(handle).with_state(state);
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(RunningService {
            port,
            requests,
            handle,
        })
    }
}

#[derive(Clone)]
struct MockState {
    routes: Arc<HashMap<(Method, String), MockResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn handle(State(state): State<MockState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX)
        .await
        .map(|bytes| bytes.to_vec())
        .unwrap_or_default();

    let path = parts.uri.path().to_string();
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(RecordedRequest {
            method: parts.method.clone(),
            path: path.clone(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers.clone(),
            body,
        });
    }

    match state.routes.get(&(parts.method, path)) {
        Some(response) => response.clone().render().await,
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({ "error": "Not found" })),
        )
            .into_response(),
    }
}

/// A mock service accepting connections.
///
/// The server task is aborted when this value is dropped.
pub struct RunningService {
    pub port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl RunningService {
    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Requests received for `path`.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

impl Drop for RunningService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Returns a local port with nothing listening on it.
///
/// Binds an ephemeral port and closes the listener straight away, so connections are
/// refused until the OS hands the port out again.
pub async fn dead_port() -> Result<u16, std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);

    Ok(port)
}
