use axum::http::StatusCode;
use axum::Router;
use axum_test::TestServer;
use serde_json::Value;

use guidance_api::routes;

use crate::test_utils::TestContext;

// Mounting every route table together verifies the paths do not conflict;
// only the health endpoints are exercised because the rest require a
// database round trip.
fn build_app() -> Router {
    let ctx = TestContext::new();
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::slots::routes())
        .merge(routes::appointments::routes())
        .merge(routes::admin::routes())
        .with_state(ctx.build_state())
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new(build_app()).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_version() {
    let server = TestServer::new(build_app()).unwrap();

    let response = server.get("/version").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
