//! Handler for CSV export of client-supplied tables.
//!
//! Pure transformation, not part of the job pipeline: the tables arrive
//! in the request body, typically pasted back from an earlier status
//! query.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use doclift_core::export::export_csv;
use doclift_core::table::Table;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Request body for `POST /api/v1/export`.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub merge: bool,
}

/// POST /api/v1/export
///
/// Serialize the supplied tables to a downloadable CSV stream. With
/// `merge` set, tables sharing an identical ordered column list are
/// concatenated first. An empty table list is a client error.
pub async fn generate_csv(Json(request): Json<ExportRequest>) -> AppResult<impl IntoResponse> {
    if request.tables.is_empty() {
        return Err(AppError::BadRequest("No data provided".to_string()));
    }

    let csv = export_csv(&request.tables, request.merge);

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv"),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"extracted_tables.csv\"",
            ),
        ],
        csv,
    ))
}
