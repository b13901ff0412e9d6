//! Integration tests for the health endpoints and general HTTP behaviour.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get, sample_tables, StaticExtractor};
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_returns_ok_with_json(pool: SqlitePool) {
    let test_app = common::build_test_app(pool, Arc::new(StaticExtractor(sample_tables()))).await;
    let response = get(test_app.app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn root_returns_service_message(pool: SqlitePool) {
    let test_app = common::build_test_app(pool, Arc::new(StaticExtractor(sample_tables()))).await;
    let response = get(test_app.app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("table extraction"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: SqlitePool) {
    let test_app = common::build_test_app(pool, Arc::new(StaticExtractor(sample_tables()))).await;
    let response = get(test_app.app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn response_contains_x_request_id_header(pool: SqlitePool) {
    let test_app = common::build_test_app(pool, Arc::new(StaticExtractor(sample_tables()))).await;
    let response = get(test_app.app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );
}
