//! Request handlers.
//!
//! Handlers delegate to `JobRepo` and the artifact store and map errors
//! via [`AppError`](crate::error::AppError).

pub mod export;
pub mod jobs;
