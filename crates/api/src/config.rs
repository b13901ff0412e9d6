use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum accepted upload size in bytes (default: 100 MiB).
    ///
    /// Raises axum's built-in 2 MiB body limit, which is far too small
    /// for the documents this service processes.
    pub max_upload_bytes: usize,
    /// Directory where uploaded documents are staged.
    pub upload_dir: PathBuf,
    /// Directory where result artifacts are persisted.
    pub result_dir: PathBuf,
    /// External extraction command (first token is the program, the rest
    /// are leading arguments; the staged path is appended per run).
    pub extractor_cmd: Vec<String>,
    /// Wall-clock limit for one extraction run.
    pub extract_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default             |
    /// |------------------------|---------------------|
    /// | `HOST`                 | `0.0.0.0`           |
    /// | `PORT`                 | `3000`              |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                |
    /// | `MAX_UPLOAD_BYTES`     | `104857600` (100 MiB) |
    /// | `UPLOAD_DIR`           | `uploads`           |
    /// | `RESULT_DIR`           | `results`           |
    /// | `EXTRACTOR_CMD`        | `doclift-extract`   |
    /// | `EXTRACT_TIMEOUT_SECS` | `300`               |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "104857600".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let upload_dir = PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));
        let result_dir = PathBuf::from(std::env::var("RESULT_DIR").unwrap_or_else(|_| "results".into()));

        let extractor_cmd: Vec<String> = std::env::var("EXTRACTOR_CMD")
            .unwrap_or_else(|_| "doclift-extract".into())
            .split_whitespace()
            .map(String::from)
            .collect();
        assert!(
            !extractor_cmd.is_empty(),
            "EXTRACTOR_CMD must name a program"
        );

        let extract_timeout_secs: u64 = std::env::var("EXTRACT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("EXTRACT_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            upload_dir,
            result_dir,
            extractor_cmd,
            extract_timeout: Duration::from_secs(extract_timeout_secs),
        }
    }
}
