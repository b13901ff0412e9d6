//! Repository for the `jobs` table.
//!
//! Every status transition is a single guarded UPDATE: the WHERE clause
//! names the expected current status, so a transition that would move
//! backward (or rewrite a terminal state) simply affects zero rows.
//! Status and `result_path` always change in the same statement, so no
//! reader ever observes a torn record.

use chrono::Utc;
use doclift_core::types::{new_job_id, JobId};

use crate::models::job::Job;
use crate::models::status::JobStatus;
use crate::DbPool;

/// Column list for `jobs` queries.
const COLUMNS: &str = "id, filename, status_id, result_path, created_at";

/// Provides CRUD operations for conversion jobs.
pub struct JobRepo;

impl JobRepo {
    /// Create a new pending job with a fresh random ID and return the row.
    pub async fn create(pool: &DbPool, filename: &str) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (id, filename, status_id, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(new_job_id())
            .bind(filename)
            .bind(JobStatus::Pending.id())
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &DbPool, id: &JobId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Transition pending → processing.
    ///
    /// Returns `false` when the row is missing or not pending; the caller
    /// must then abandon the job rather than run it twice.
    pub async fn mark_processing(pool: &DbPool, id: &JobId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs SET status_id = $2 WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(JobStatus::Processing.id())
        .bind(JobStatus::Pending.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition processing → completed, recording the result location
    /// in the same statement.
    pub async fn complete(
        pool: &DbPool,
        id: &JobId,
        result_path: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs \
             SET status_id = $2, result_path = $3 \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(JobStatus::Completed.id())
        .bind(result_path)
        .bind(JobStatus::Processing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Transition to failed from any non-terminal state. Never sets a
    /// result location.
    pub async fn fail(pool: &DbPool, id: &JobId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs \
             SET status_id = $2 \
             WHERE id = $1 AND status_id NOT IN ($3, $4)",
        )
        .bind(id)
        .bind(JobStatus::Failed.id())
        .bind(JobStatus::Completed.id())
        .bind(JobStatus::Failed.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
