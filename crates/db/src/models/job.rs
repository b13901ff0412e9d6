//! Job entity model.

use doclift_core::types::{JobId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::{JobStatus, StatusId};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: JobId,
    pub filename: String,
    pub status_id: StatusId,
    /// Location of the persisted result artifact; set iff completed.
    pub result_path: Option<String>,
    pub created_at: Timestamp,
}

impl Job {
    /// Decode the raw `status_id` column into the closed status enum.
    ///
    /// Returns `None` only if the row carries an ID outside the enum,
    /// which no code path writes.
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::from_id(self.status_id)
    }
}
