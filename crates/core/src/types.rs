/// Job identifiers are random UUID v4 strings, generated at creation.
///
/// A 128-bit random identifier makes collisions between independently
/// created jobs astronomically unlikely without any coordination.
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh job identifier.
pub fn new_job_id() -> JobId {
    uuid::Uuid::new_v4().to_string()
}
