//! Alert types emitted by the violation tracker.
//!
//! These are domain values only. The wire shape (labels and timestamp layout)
//! belongs to the reporting layer.

use crate::types::{SatelliteId, Timestamp};

/// Severity of a limit violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Value rose above the red-high limit.
    RedHigh,
    /// Value dropped below the red-low limit.
    RedLow,
}

impl Severity {
    /// Default human-readable label. Reporting layers may override it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::RedHigh => "RED HIGH",
            Severity::RedLow => "RED LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An alert raised once a (satellite, component) pair accumulates enough
/// violations inside the tracking window.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub satellite_id: SatelliteId,
    pub severity: Severity,
    pub component: String,
    /// Earliest violation in the window that triggered the alert, not the
    /// reading that pushed the count over the threshold.
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_labels() {
        assert_eq!(Severity::RedHigh.as_str(), "RED HIGH");
        assert_eq!(Severity::RedLow.to_string(), "RED LOW");
    }
}
