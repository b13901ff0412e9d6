//! Domain types and pure logic shared across the doclift workspace.
//!
//! Holds the extracted-table schema, CSV export/merge logic, the common
//! error type, and ID/timestamp aliases. No I/O lives here.

pub mod error;
pub mod export;
pub mod table;
pub mod types;
