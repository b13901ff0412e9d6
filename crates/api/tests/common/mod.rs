//! Shared test helpers: app construction with stub extractors, request
//! builders, and body decoding.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use doclift_api::config::ServerConfig;
use doclift_api::engine::JobExecutor;
use doclift_api::routes;
use doclift_api::state::AppState;
use doclift_api::storage::ArtifactStore;
use doclift_core::table::Table;
use doclift_extract::{ExtractError, TableExtractor};

// ---------------------------------------------------------------------------
// Stub extractors
// ---------------------------------------------------------------------------

/// Always returns the same tables.
pub struct StaticExtractor(pub Vec<Table>);

#[async_trait::async_trait]
impl TableExtractor for StaticExtractor {
    async fn extract(&self, _input: &Path) -> Result<Vec<Table>, ExtractError> {
        Ok(self.0.clone())
    }
}

/// Always fails.
pub struct FailingExtractor;

#[async_trait::async_trait]
impl TableExtractor for FailingExtractor {
    async fn extract(&self, _input: &Path) -> Result<Vec<Table>, ExtractError> {
        Err(ExtractError::Failed {
            exit_code: 1,
            stderr: "synthetic failure".to_string(),
        })
    }
}

/// Sleeps before returning, to prove submission does not wait on conversion.
pub struct SlowExtractor {
    pub delay: Duration,
    pub tables: Vec<Table>,
}

#[async_trait::async_trait]
impl TableExtractor for SlowExtractor {
    async fn extract(&self, _input: &Path) -> Result<Vec<Table>, ExtractError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.tables.clone())
    }
}

/// Succeeds or fails depending on the staged input's content: any input
/// containing the byte string `boom` fails.
pub struct ContentSensitiveExtractor(pub Vec<Table>);

#[async_trait::async_trait]
impl TableExtractor for ContentSensitiveExtractor {
    async fn extract(&self, input: &Path) -> Result<Vec<Table>, ExtractError> {
        let bytes = tokio::fs::read(input).await?;
        if bytes.windows(4).any(|w| w == b"boom") {
            return Err(ExtractError::Failed {
                exit_code: 1,
                stderr: "boom".to_string(),
            });
        }
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// A fully wired test application plus handles into its artifact storage.
pub struct TestApp {
    pub app: Router,
    pub artifacts: Arc<ArtifactStore>,
    pub upload_dir: PathBuf,
    pub result_dir: PathBuf,
    _tmp: TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: PathBuf, result_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 100 * 1024 * 1024,
        upload_dir,
        result_dir,
        extractor_cmd: vec!["unused-in-tests".to_string()],
        extract_timeout: Duration::from_secs(30),
    }
}

/// Build the full application router with all middleware layers, a
/// tempdir-backed artifact store, and the given extractor stub.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub async fn build_test_app(pool: SqlitePool, extractor: Arc<dyn TableExtractor>) -> TestApp {
    let tmp = tempfile::tempdir().expect("tempdir");
    let upload_dir = tmp.path().join("uploads");
    let result_dir = tmp.path().join("results");

    let artifacts = Arc::new(ArtifactStore::new(upload_dir.clone(), result_dir.clone()));
    artifacts.ensure_dirs().await.expect("artifact dirs");

    build_with(pool, artifacts, extractor, tmp, upload_dir, result_dir)
}

/// Like [`build_test_app`], but the result directory cannot be written to,
/// so persisting any result artifact fails.
pub async fn build_test_app_broken_results(
    pool: SqlitePool,
    extractor: Arc<dyn TableExtractor>,
) -> TestApp {
    let tmp = tempfile::tempdir().expect("tempdir");
    let upload_dir = tmp.path().join("uploads");
    tokio::fs::create_dir_all(&upload_dir).await.expect("upload dir");

    // A regular file where the result directory should be: writes into
    // it fail with a non-NotFound I/O error.
    let blocker = tmp.path().join("blocker");
    tokio::fs::write(&blocker, b"").await.expect("blocker file");
    let result_dir = blocker.join("results");

    let artifacts = Arc::new(ArtifactStore::new(upload_dir.clone(), result_dir.clone()));

    build_with(pool, artifacts, extractor, tmp, upload_dir, result_dir)
}

fn build_with(
    pool: SqlitePool,
    artifacts: Arc<ArtifactStore>,
    extractor: Arc<dyn TableExtractor>,
    tmp: TempDir,
    upload_dir: PathBuf,
    result_dir: PathBuf,
) -> TestApp {
    let executor = Arc::new(JobExecutor::new(
        pool.clone(),
        Arc::clone(&artifacts),
        extractor,
    ));

    let config = Arc::new(test_config(upload_dir.clone(), result_dir.clone()));
    let max_upload_bytes = config.max_upload_bytes;

    let state = AppState {
        pool,
        config,
        artifacts: Arc::clone(&artifacts),
        executor,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse::<axum::http::HeaderValue>().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(axum::extract::DefaultBodyLimit::max(max_upload_bytes))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    TestApp {
        app,
        artifacts,
        upload_dir,
        result_dir,
        _tmp: tmp,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST a single-file multipart upload under the `file` field.
pub async fn post_file(app: Router, uri: &str, filename: &str, bytes: &[u8]) -> Response<Body> {
    let boundary = "doclift-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Decode a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Decode a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

/// Poll a job until it leaves pending/processing, returning the final
/// status payload. Panics if the job never reaches a terminal state.
pub async fn wait_for_terminal(app: &Router, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = get(app.clone(), &format!("/api/v1/jobs/{job_id}")).await;
        let json = body_json(response).await;
        let status = json["status"].as_str().unwrap_or_default().to_string();
        if status != "pending" && status != "processing" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} never reached a terminal state");
}

/// Sample tables used across suites.
pub fn sample_tables() -> Vec<Table> {
    vec![Table {
        columns: vec!["name".to_string(), "total".to_string()],
        data: vec![
            vec![serde_json::json!("widgets"), serde_json::json!(42)],
            vec![serde_json::json!("gadgets"), serde_json::json!("")],
        ],
    }]
}
