use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::JobExecutor;
use crate::storage::ArtifactStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Every collaborator is constructed explicitly at startup and injected
/// here; there are no ambient singletons. Cheaply cloneable (inner data
/// is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (the job store).
    pub pool: doclift_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Filesystem-backed staging for inputs and results.
    pub artifacts: Arc<ArtifactStore>,
    /// Background job executor.
    pub executor: Arc<JobExecutor>,
}
