//! Handlers for the `/jobs` resource: document submission and status polling.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use doclift_core::error::CoreError;
use doclift_core::table::Table;
use doclift_core::types::{JobId, Timestamp};
use doclift_db::models::status::JobStatus;
use doclift_db::repositories::JobRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::storage::ArtifactStore;

/// File extensions the converter accepts.
const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf"];

/// Multipart field name carrying the document.
const FILE_FIELD: &str = "file";

/// Response for a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    pub job_id: JobId,
    pub message: &'static str,
}

/// Response for a status query.
///
/// `tables` is attached only for completed jobs; `message` only for
/// failed jobs or a completed job whose result artifact is missing.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: &'static str,
    pub filename: String,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Return the accepted extension (with dot) carried by `filename`, if any.
fn supported_extension(filename: &str) -> Option<&'static str> {
    let lower = filename.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .copied()
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs
///
/// Accept a multipart document upload, create a pending job, stage the
/// input to disk in bounded chunks, and schedule background execution.
/// Returns as soon as the input is staged -- conversion runs detached.
pub async fn submit_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();

        // Validate before anything is created: a rejected submission must
        // leave no job record behind.
        let Some(extension) = supported_extension(&filename) else {
            return Err(AppError::UnsupportedType(
                "Only PDF files are supported".to_string(),
            ));
        };

        let job = JobRepo::create(&state.pool, &filename).await?;

        let staged = match stage_field(&state.artifacts, &job.id, extension, field).await {
            Ok(path) => path,
            Err(e) => {
                // The pending row already exists; close it out so the
                // client never polls a job that will not run.
                abandon_job(&state, &job.id, extension).await;
                return Err(e);
            }
        };

        state.executor.spawn(job.id.clone(), staged);

        tracing::info!(job_id = %job.id, filename = %job.filename, "Job submitted");

        return Ok((
            StatusCode::OK,
            Json(SubmitResponse {
                status: "processing",
                job_id: job.id,
                message: "File uploaded and processing started.",
            }),
        ));
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

/// Stream one multipart field to the artifact store chunk by chunk.
async fn stage_field(
    artifacts: &ArtifactStore,
    job_id: &JobId,
    extension: &str,
    mut field: Field<'_>,
) -> AppResult<std::path::PathBuf> {
    let mut writer = artifacts.input_writer(job_id, extension).await?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        writer.write_chunk(&chunk).await?;
    }

    Ok(writer.finish().await?)
}

/// Fail a job whose input never finished staging and drop the partial file.
async fn abandon_job(state: &AppState, job_id: &JobId, extension: &str) {
    if let Err(e) = JobRepo::fail(&state.pool, job_id).await {
        tracing::error!(job_id = %job_id, error = %e, "Failed to mark abandoned job as failed");
    }
    let partial = state.artifacts.input_path(job_id, extension);
    state.artifacts.delete_input(&partial).await;
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}
///
/// Return the job's current status. Completed jobs carry their extracted
/// tables; failed jobs carry a failure note. A completed job whose result
/// artifact is missing is reported as a distinct error condition rather
/// than succeeding with stale or empty data.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<JobStatusResponse>> {
    let job = JobRepo::find_by_id(&state.pool, &job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    let status = job.status().ok_or_else(|| {
        AppError::InternalError(format!(
            "Job {} has unknown status id {}",
            job.id, job.status_id
        ))
    })?;

    let mut response = JobStatusResponse {
        job_id: job.id,
        status: status.as_str(),
        filename: job.filename,
        created_at: job.created_at,
        tables: None,
        message: None,
    };

    match status {
        JobStatus::Completed => match &job.result_path {
            Some(location) => match state.artifacts.load_result(location).await {
                Ok(tables) => response.tables = Some(tables),
                Err(crate::storage::ArtifactError::NotFound { .. }) => {
                    tracing::error!(job_id = %response.job_id, location = %location, "Result artifact missing for completed job");
                    response.status = "error";
                    response.message = Some("Result file missing");
                }
                Err(e) => return Err(AppError::Artifact(e)),
            },
            // Completed without a location never happens (they are written
            // in one transition) but is reported the same way if it does.
            None => {
                response.status = "error";
                response.message = Some("Result file missing");
            }
        },
        JobStatus::Failed => {
            response.message = Some("Job processing failed.");
        }
        JobStatus::Pending | JobStatus::Processing => {}
    }

    Ok(Json(response))
}
