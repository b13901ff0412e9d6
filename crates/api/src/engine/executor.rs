//! Per-job background executor.
//!
//! One spawned task owns one job for its whole lifetime: it is the only
//! writer of that job's status, so transitions are strictly ordered
//! (pending → processing → completed | failed) and never race. Jobs are
//! independent of each other; they complete in any order.

use std::path::PathBuf;
use std::sync::Arc;

use doclift_core::types::JobId;
use doclift_db::repositories::JobRepo;
use doclift_db::DbPool;
use doclift_extract::TableExtractor;

use crate::storage::ArtifactStore;

/// Runs submitted jobs to a terminal state, detached from the request
/// that created them.
pub struct JobExecutor {
    pool: DbPool,
    artifacts: Arc<ArtifactStore>,
    extractor: Arc<dyn TableExtractor>,
}

impl JobExecutor {
    pub fn new(
        pool: DbPool,
        artifacts: Arc<ArtifactStore>,
        extractor: Arc<dyn TableExtractor>,
    ) -> Self {
        Self {
            pool,
            artifacts,
            extractor,
        }
    }

    /// Schedule one job for execution and return immediately.
    ///
    /// The spawned task has its own lifetime: it is not tied to the
    /// submitting request's cancellation scope, so a client dropping the
    /// connection cannot abort an in-flight conversion.
    pub fn spawn(self: &Arc<Self>, job_id: JobId, input_path: PathBuf) {
        let executor = Arc::clone(self);
        tokio::spawn(async move {
            executor.run(job_id, input_path).await;
        });
    }

    /// Execute one job's pipeline, then clean up the staged input.
    ///
    /// Errors here are never surfaced to any caller: they are captured
    /// into the job's terminal status and logged. Cleanup runs
    /// unconditionally as the final step and its own failure cannot
    /// alter the already-recorded outcome.
    async fn run(&self, job_id: JobId, input_path: PathBuf) {
        match JobRepo::mark_processing(&self.pool, &job_id).await {
            Ok(true) => {}
            Ok(false) => {
                // The record disappeared (or was never pending). Never
                // expected under single-writer ownership; nothing to update.
                tracing::warn!(job_id = %job_id, "Job not in pending state, skipping execution");
                self.artifacts.delete_input(&input_path).await;
                return;
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Job store unavailable, aborting job");
                self.artifacts.delete_input(&input_path).await;
                return;
            }
        }

        tracing::info!(job_id = %job_id, path = %input_path.display(), "Job processing started");

        match self.extractor.extract(&input_path).await {
            Ok(tables) => match self.artifacts.persist_result(&job_id, &tables).await {
                Ok(location) => {
                    self.record_completed(&job_id, &location, tables.len()).await;
                }
                Err(e) => {
                    tracing::error!(job_id = %job_id, error = %e, "Failed to persist result");
                    self.record_failed(&job_id).await;
                }
            },
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Conversion failed");
                self.record_failed(&job_id).await;
            }
        }

        // Unconditional cleanup, success or failure.
        self.artifacts.delete_input(&input_path).await;
    }

    /// Record the completed status and result location in one transition.
    async fn record_completed(&self, job_id: &JobId, location: &str, table_count: usize) {
        match JobRepo::complete(&self.pool, job_id, location).await {
            Ok(true) => {
                tracing::info!(job_id = %job_id, table_count, "Job completed");
            }
            Ok(false) => {
                tracing::warn!(job_id = %job_id, "Job row changed underfoot, completion not recorded");
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record job completion");
            }
        }
    }

    /// Record the failed terminal status. Store errors here are logged;
    /// nothing further can be done.
    async fn record_failed(&self, job_id: &JobId) {
        match JobRepo::fail(&self.pool, job_id).await {
            Ok(true) => {
                tracing::info!(job_id = %job_id, "Job marked failed");
            }
            Ok(false) => {
                tracing::warn!(job_id = %job_id, "Job already terminal, failure not recorded");
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record job failure");
            }
        }
    }
}
