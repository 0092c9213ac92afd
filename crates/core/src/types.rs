/// Satellite identifiers are plain integers as they appear in the telemetry feed.
pub type SatelliteId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
