//! Integration tests for the revp-api router
//!
//! Drives the router in-process with a scripted synthesizer and in-memory
//! sinks, so no network access is needed.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use revp_api::sinks::{Delivery, Sink, SinkError};
use revp_api::synthesis::{MockSynthesizer, ReviewSynthesizer};
use revp_api::{build_router, AppState, FanOut};
use revp_common::{RecordedAt, Submission};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower::util::ServiceExt;

/// In-memory sink recording what it receives
struct RecordingSink {
    name: &'static str,
    received: Arc<Mutex<Vec<Submission>>>,
    behavior: Behavior,
}

#[derive(Clone, Copy)]
enum Behavior {
    Accept,
    Fail,
    Hang,
}

impl RecordingSink {
    fn new(name: &'static str, behavior: Behavior) -> (Arc<dyn Sink>, Arc<Mutex<Vec<Submission>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Self {
            name,
            received: Arc::clone(&received),
            behavior,
        };
        (Arc::new(sink), received)
    }
}

#[async_trait]
impl Sink for RecordingSink {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn deliver(
        &self,
        submission: &Submission,
        _recorded_at: &RecordedAt,
    ) -> Result<Delivery, SinkError> {
        self.received.lock().await.push(submission.clone());
        match self.behavior {
            Behavior::Accept => Ok(Delivery::Delivered),
            Behavior::Fail => Err(SinkError::Status(503, "unavailable".to_string())),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

fn create_test_app(synthesizer: Arc<dyn ReviewSynthesizer>, sinks: Vec<Arc<dyn Sink>>) -> (Router, FanOut) {
    let fan_out = FanOut::new(sinks);
    let app = build_router(AppState::new(synthesizer, fan_out.clone()));
    (app, fan_out)
}

fn polish_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/polish-review")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

fn header<'a>(response: &'a axum::response::Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_options_any_path_returns_preflight_headers() {
    for path in ["/", "/api/polish-review", "/anything/else"] {
        let (app, _) = create_test_app(Arc::new(MockSynthesizer::responding("ok")), vec![]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "path {path}");
        assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
        assert_eq!(
            header(&response, "access-control-allow-methods"),
            Some("GET, POST, OPTIONS")
        );
        assert_eq!(
            header(&response, "access-control-allow-headers"),
            Some("Content-Type, X-Selected-Tags")
        );
        assert!(body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_root_returns_liveness_text() {
    let (app, _) = create_test_app(Arc::new(MockSynthesizer::responding("ok")), vec![]);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), Some("text/plain"));
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    let body = body_bytes(response).await;
    assert_eq!(body, revp_api::api::LIVENESS_MESSAGE.as_bytes());
}

#[tokio::test]
async fn test_unknown_path_returns_not_found() {
    let (app, _) = create_test_app(Arc::new(MockSynthesizer::responding("ok")), vec![]);

    let response = app
        .oneshot(Request::builder().uri("/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    assert_eq!(body_bytes(response).await, b"Not Found");
}

#[tokio::test]
async fn test_wrong_method_on_known_paths_returns_not_found() {
    for (method, path) in [("GET", "/api/polish-review"), ("POST", "/"), ("DELETE", "/")] {
        let (app, _) = create_test_app(Arc::new(MockSynthesizer::responding("ok")), vec![]);

        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {path}");
        assert_eq!(body_bytes(response).await, b"Not Found");
    }
}

#[tokio::test]
async fn test_missing_text_returns_bad_request() {
    let bodies = [
        json!({}),
        json!({ "text": "" }),
        json!({ "text": "", "selectedTags": ["环境很舒适"], "selectedLabels": ["环境舒适"] }),
        json!({ "selectedTags": "oops", "selectedLabels": 5 }),
    ];

    for body in bodies {
        let synthesizer = Arc::new(MockSynthesizer::responding("ok"));
        let (sink, received) = RecordingSink::new("recording", Behavior::Accept);
        let (app, fan_out) = create_test_app(synthesizer.clone(), vec![sink]);

        let response = app.oneshot(polish_request(body.clone())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
        let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json, json!({ "error": "Missing \"text\" in request body" }));

        // Rejected submissions reach neither the synthesizer nor the sinks
        assert!(fan_out.shutdown(Duration::from_secs(1)).await);
        assert_eq!(synthesizer.calls(), 0);
        assert!(received.lock().await.is_empty());
    }
}

#[tokio::test]
async fn test_non_json_body_returns_bad_request() {
    let (app, _) = create_test_app(Arc::new(MockSynthesizer::responding("ok")), vec![]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/polish-review")
                .header("content-type", "application/json")
                .body(Body::from("text=hello"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["error"], "Missing \"text\" in request body");
}

#[tokio::test]
async fn test_polish_success_relays_synthesis_and_fans_out() {
    let synthesizer = Arc::new(MockSynthesizer::responding("环境舒适，味道正宗，服务也很好！"));
    let (webhook, webhook_received) = RecordingSink::new("webhook", Behavior::Accept);
    let (form, form_received) = RecordingSink::new("google_form", Behavior::Accept);
    let (app, fan_out) = create_test_app(synthesizer.clone(), vec![webhook, form]);

    let response = app
        .oneshot(polish_request(json!({
            "text": "环境舒适, 味道正宗, 态度很好",
            "selectedTags": ["环境很舒适", "味道很正宗", "服务态度很好"],
            "selectedLabels": ["环境舒适", "味道正宗", "态度很好", "未知标签X"],
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "content-type"), Some("application/json"));
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json, json!({ "response": "环境舒适，味道正宗，服务也很好！" }));
    assert_eq!(synthesizer.calls(), 1);

    assert!(fan_out.shutdown(Duration::from_secs(5)).await);
    for received in [webhook_received, form_received] {
        let received = received.lock().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].review_text, "环境舒适, 味道正宗, 态度很好");
        assert_eq!(
            received[0].selected_labels,
            vec!["环境舒适", "味道正宗", "态度很好", "未知标签X"]
        );
    }
}

#[tokio::test]
async fn test_synthesis_failure_returns_server_error() {
    let synthesizer = Arc::new(MockSynthesizer::failing("connection reset"));
    let (sink, received) = RecordingSink::new("webhook", Behavior::Accept);
    let (app, fan_out) = create_test_app(synthesizer, vec![sink]);

    let response = app
        .oneshot(polish_request(json!({ "text": "味道正宗" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    let json: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(json["error"], "服务暂时不可用");
    assert_eq!(json["details"], "Network error: connection reset");

    // The submission is still recorded even though synthesis failed
    assert!(fan_out.shutdown(Duration::from_secs(5)).await);
    assert_eq!(received.lock().await.len(), 1);
}

#[tokio::test]
async fn test_response_does_not_wait_for_hung_sink() {
    let (hung, hung_received) = RecordingSink::new("hung", Behavior::Hang);
    let (failing, failing_received) = RecordingSink::new("failing", Behavior::Fail);
    let (healthy, healthy_received) = RecordingSink::new("healthy", Behavior::Accept);
    let (app, fan_out) = create_test_app(
        Arc::new(MockSynthesizer::responding("好评")),
        vec![hung, failing, healthy],
    );

    let response = tokio::time::timeout(
        Duration::from_secs(2),
        app.oneshot(polish_request(json!({ "text": "上菜快", "selectedTags": ["上菜很快"] }))),
    )
    .await
    .expect("response blocked on a sink")
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // The hung delivery keeps its task alive; the other sinks still complete
    assert!(!fan_out.shutdown(Duration::from_millis(200)).await);
    assert_eq!(hung_received.lock().await.len(), 1);
    assert_eq!(failing_received.lock().await.len(), 1);
    assert_eq!(healthy_received.lock().await.len(), 1);
}

#[tokio::test]
async fn test_response_returns_within_synthesis_latency() {
    let synthesizer =
        Arc::new(MockSynthesizer::responding("好评").with_delay(Duration::from_millis(50)));
    let (hung, _) = RecordingSink::new("hung", Behavior::Hang);
    let (app, fan_out) = create_test_app(synthesizer, vec![hung]);

    let started = std::time::Instant::now();
    let response = app
        .oneshot(polish_request(json!({ "text": "价格实惠" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(fan_out.in_flight(), 1);
}
