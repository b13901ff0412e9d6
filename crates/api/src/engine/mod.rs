//! Background job execution engine.
//!
//! Contains the executor that runs one job's pipeline (convert →
//! normalize → persist → finalize) off the request path.

mod executor;

pub use executor::JobExecutor;
