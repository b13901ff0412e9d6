//! Conversion adapter: the boundary around the external table-extraction
//! capability.
//!
//! The capability itself is opaque to the rest of the system. This crate
//! defines the [`TableExtractor`] trait the job executor depends on, and
//! [`CommandExtractor`], which runs the extraction as a child process so
//! the (potentially CPU-bound, blocking) work never runs on the
//! request-serving runtime. Output is translated into the workspace's
//! [`Table`](doclift_core::table::Table) schema at this boundary.

mod command;
mod extractor;

pub use command::CommandExtractor;
pub use extractor::{ExtractError, TableExtractor};
