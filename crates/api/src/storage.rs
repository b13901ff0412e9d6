//! Filesystem-backed artifact store.
//!
//! Two directories: `uploads/` stages inbound documents while their job
//! is in flight, `results/` holds the immutable JSON result artifact of
//! each completed job. Inputs are written in bounded chunks and deleted
//! (best-effort) when execution finishes; results are written once and
//! read on every completed-status query.

use std::path::{Path, PathBuf};

use doclift_core::table::Table;
use doclift_core::types::JobId;
use tokio::io::AsyncWriteExt;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The artifact at `location` does not exist.
    #[error("Artifact not found: {location}")]
    NotFound { location: String },

    /// A disk error while writing or reading an artifact.
    #[error("Artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A result artifact exists but is not valid table JSON.
    #[error("Malformed result artifact: {0}")]
    Malformed(String),
}

/// Staging and result storage rooted at two configured directories.
pub struct ArtifactStore {
    upload_dir: PathBuf,
    result_dir: PathBuf,
}

/// An open staged-input file. Feed it chunks, then call
/// [`finish`](InputWriter::finish) to obtain the staged path.
pub struct InputWriter {
    file: tokio::fs::File,
    path: PathBuf,
}

impl InputWriter {
    /// Append one chunk of the inbound byte stream.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), ArtifactError> {
        self.file.write_all(chunk).await?;
        Ok(())
    }

    /// Flush and close the staged file, returning its path.
    pub async fn finish(mut self) -> Result<PathBuf, ArtifactError> {
        self.file.flush().await?;
        Ok(self.path)
    }
}

impl ArtifactStore {
    pub fn new(upload_dir: impl Into<PathBuf>, result_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            result_dir: result_dir.into(),
        }
    }

    /// Create the upload and result directories if they do not exist.
    /// Called once at startup.
    pub async fn ensure_dirs(&self) -> Result<(), ArtifactError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.result_dir).await?;
        Ok(())
    }

    /// Path a staged input for this job would occupy.
    ///
    /// `extension` is the original filename's extension including the dot
    /// (e.g. `.pdf`); the uploaded name itself never touches the
    /// filesystem.
    pub fn input_path(&self, job_id: &JobId, extension: &str) -> PathBuf {
        self.upload_dir.join(format!("{job_id}{extension}"))
    }

    /// Open a staged-input file named after the job ID.
    pub async fn input_writer(
        &self,
        job_id: &JobId,
        extension: &str,
    ) -> Result<InputWriter, ArtifactError> {
        let path = self.input_path(job_id, extension);
        let file = tokio::fs::File::create(&path).await?;
        Ok(InputWriter { file, path })
    }

    /// Serialize a result set to `results/{job_id}.json` and return the
    /// location handle recorded in the job row.
    pub async fn persist_result(
        &self,
        job_id: &JobId,
        tables: &[Table],
    ) -> Result<String, ArtifactError> {
        let path = self.result_dir.join(format!("{job_id}.json"));
        let bytes = serde_json::to_vec(tables)
            .map_err(|e| ArtifactError::Malformed(e.to_string()))?;
        tokio::fs::write(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// Read back a previously persisted result set.
    pub async fn load_result(&self, location: &str) -> Result<Vec<Table>, ArtifactError> {
        let bytes = match tokio::fs::read(location).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArtifactError::NotFound {
                    location: location.to_string(),
                });
            }
            Err(e) => return Err(ArtifactError::Io(e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Malformed(e.to_string()))
    }

    /// Best-effort removal of a staged input.
    ///
    /// Failures are logged and swallowed: cleanup must never change the
    /// outcome of the job that owned the file.
    pub async fn delete_input(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete staged input");
            }
        }
    }
}
