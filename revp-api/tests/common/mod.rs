//! Shared test helpers: a local HTTP server that records every request

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// One request received by the capture server
#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl Captured {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("captured body is not JSON")
    }

    /// Decode a URL-encoded form body into ordered pairs
    pub fn form_pairs(&self) -> Vec<(String, String)> {
        let url = reqwest::Url::parse(&format!("http://decode.local/?{}", self.body))
            .expect("captured body is not a valid query string");
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

#[derive(Clone)]
struct CaptureState {
    status: StatusCode,
    response_body: String,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<Captured>>>,
}

/// Handle on a running capture server
pub struct CaptureServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureServer {
    /// Start a server answering every request with `status` and `response_body`
    pub async fn start(status: StatusCode, response_body: &str) -> Self {
        Self::start_with_delay(status, response_body, None).await
    }

    /// Same as `start`, sleeping `delay` before each response
    pub async fn start_with_delay(
        status: StatusCode,
        response_body: &str,
        delay: Option<Duration>,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = CaptureState {
            status,
            response_body: response_body.to_string(),
            delay,
            requests: Arc::clone(&requests),
        };

        let app = Router::new().fallback(capture).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind capture server");
        let addr = listener.local_addr().expect("no local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("capture server failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn requests(&self) -> Vec<Captured> {
        self.requests.lock().await.clone()
    }
}

async fn capture(
    State(state): State<CaptureState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().await.push(Captured {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: header("content-type"),
        authorization: header("authorization"),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    (state.status, state.response_body.clone())
}

/// Address nothing listens on
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/hook";
