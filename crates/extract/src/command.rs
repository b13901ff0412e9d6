//! Subprocess-backed [`TableExtractor`] implementation.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use doclift_core::table::{normalize_tables, Table};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::extractor::{ExtractError, TableExtractor};

/// Maximum stdout or stderr size captured per stream (64 MiB).
///
/// Output beyond this limit is truncated so a runaway extraction cannot
/// exhaust memory.
const MAX_OUTPUT_BYTES: u64 = 64 * 1024 * 1024;

/// Runs a configured external command with the staged document path as
/// its final argument and parses stdout as a JSON array of tables
/// (`[{ "columns": [...], "data": [[...]] }, ...]`).
///
/// The child process is killed if it outlives the configured timeout.
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandExtractor {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl TableExtractor for CommandExtractor {
    async fn extract(&self, input: &Path) -> Result<Vec<Table>, ExtractError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Kill the child when dropped, i.e. when the timeout fires.
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd.spawn()?;

        // Read stdout/stderr in spawned tasks so `child.wait()` (which
        // borrows `&mut child`) can run concurrently with the reads.
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();
        let stdout_task =
            tokio::spawn(async move { read_stream(stdout_handle, MAX_OUTPUT_BYTES).await });
        let stderr_task =
            tokio::spawn(async move { read_stream(stderr_handle, MAX_OUTPUT_BYTES).await });

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => return Err(ExtractError::Io(e)),
            Err(_elapsed) => {
                // `child` is dropped here, killing the process.
                return Err(ExtractError::Timeout {
                    elapsed_ms: start.elapsed().as_millis() as u64,
                });
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(ExtractError::Failed {
                exit_code: status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            });
        }

        let mut tables: Vec<Table> = serde_json::from_slice(&stdout)
            .map_err(|e| ExtractError::Malformed(e.to_string()))?;

        // Nulls become empty strings, ragged rows are squared off.
        normalize_tables(&mut tables);

        tracing::debug!(
            table_count = tables.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Extraction finished",
        );

        Ok(tables)
    }
}

/// Read an output stream to completion, keeping at most `cap` bytes.
///
/// The remainder is drained and discarded, so a child that overruns the
/// cap never blocks on a full pipe.
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>, cap: u64) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h).take(cap).read_to_end(&mut buf).await;
        let _ = tokio::io::copy(&mut h, &mut tokio::io::sink()).await;
    }
    buf
}
