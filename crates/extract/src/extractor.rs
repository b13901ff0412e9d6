use std::path::Path;

use doclift_core::table::Table;

/// Errors from a single extraction attempt.
///
/// The adapter performs no retries: one failed attempt is one failed job.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The extraction process could not be spawned or communicated with.
    #[error("Extractor I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The extraction process exceeded its timeout and was killed.
    #[error("Extraction timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },

    /// The extraction process exited with a non-zero code.
    #[error("Extraction failed with exit code {exit_code}: {stderr}")]
    Failed { exit_code: i32, stderr: String },

    /// The process succeeded but its output was not valid table JSON.
    #[error("Extractor produced malformed output: {0}")]
    Malformed(String),
}

/// The external document-to-table extraction capability.
///
/// Implementations are stateless: `extract` takes a path to a staged
/// document and returns zero or more normalized tables, or fails. No
/// other contract is assumed about the capability's internals.
#[async_trait::async_trait]
pub trait TableExtractor: Send + Sync {
    async fn extract(&self, input: &Path) -> Result<Vec<Table>, ExtractError>;
}
