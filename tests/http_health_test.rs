//! Health and build-info endpoint tests.

mod http;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

/// Health endpoint returns 200 OK.
#[tokio::test]
async fn health_returns_ok() {
    let app = http::test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Health endpoint returns correct JSON structure.
#[tokio::test]
async fn health_returns_correct_json() {
    let app = http::test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = http::parse_json_body(response).await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "confirmation-service");
}

/// Build-info endpoint reports service, version, and build metadata.
#[tokio::test]
async fn build_info_reports_service_metadata() {
    let app = http::test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/build-info")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = http::parse_json_body(response).await;
    assert_eq!(json["service"], "confirmation-service");
    assert!(json["version"].is_string());
    assert!(json["gitSha"].is_string());
    assert!(json["buildTime"].is_string());
}
