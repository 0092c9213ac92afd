//! Parsed telemetry reading consumed by the violation tracker.

use crate::types::{SatelliteId, Timestamp};

/// A single telemetry measurement for one component of one satellite.
///
/// Yellow limits are carried through from the input record but are not
/// consulted by any built-in rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: Timestamp,
    pub satellite_id: SatelliteId,
    pub red_high_limit: f64,
    pub yellow_high_limit: f64,
    pub yellow_low_limit: f64,
    pub red_low_limit: f64,
    pub raw_value: f64,
    pub component: String,
}
