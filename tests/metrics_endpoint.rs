// tests/metrics_endpoint.rs
use axum::body::{self, Body};
use axum::http::Request;
use http::StatusCode;
use tower::ServiceExt;

use hashtag_burst_monitor::metrics::Metrics;

#[tokio::test]
async fn metrics_endpoint_exposes_window_gauge() {
    // install_recorder is once-per-process, so this binary keeps one test.
    let metrics = Metrics::init(6);
    let app = metrics.router();

    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(
        text.contains("detect_window_hours"),
        "metrics exposition missing 'detect_window_hours'\n{text}"
    );
}
