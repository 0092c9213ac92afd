//! Sliding-window violation tracker with alert de-duplication.
//!
//! For every (satellite, component) pair the tracker keeps the timestamps of
//! recent violations, oldest first. When the number of violations inside the
//! window reaches the configured threshold, an [`Alert`] stamped with the
//! oldest surviving violation is emitted, unless that window overlaps one that
//! has already been reported.
//!
//! Pure logic, no I/O. Readings for a given key must arrive in non-decreasing
//! timestamp order; nothing is re-sorted.

use std::collections::{HashMap, VecDeque};

use chrono::Duration;

use crate::alert::Alert;
use crate::error::CoreError;
use crate::reading::Reading;
use crate::rules::RuleSet;
use crate::types::{SatelliteId, Timestamp};

/// Number of violations inside the window that raises an alert.
pub const DEFAULT_VIOLATION_THRESHOLD: usize = 3;

/// Length of the trailing window in minutes.
pub const DEFAULT_WINDOW_MINUTES: i64 = 5;

/// Composite key: (satellite_id, component).
type WindowKey = (SatelliteId, String);

// ---------------------------------------------------------------------------
// TrackerConfig
// ---------------------------------------------------------------------------

/// Threshold and window applied to every (satellite, component) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    violation_threshold: usize,
    window: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            violation_threshold: DEFAULT_VIOLATION_THRESHOLD,
            window: Duration::minutes(DEFAULT_WINDOW_MINUTES),
        }
    }
}

impl TrackerConfig {
    /// Returns `CoreError::Validation` for a zero threshold or a negative window.
    pub fn new(violation_threshold: usize, window: Duration) -> Result<Self, CoreError> {
        if violation_threshold == 0 {
            return Err(CoreError::Validation(
                "violation threshold must be at least 1".to_string(),
            ));
        }
        if window < Duration::zero() {
            return Err(CoreError::Validation(format!(
                "violation window must not be negative, got {window}"
            )));
        }
        Ok(Self {
            violation_threshold,
            window,
        })
    }

    pub fn violation_threshold(&self) -> usize {
        self.violation_threshold
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

// ---------------------------------------------------------------------------
// ViolationTracker
// ---------------------------------------------------------------------------

/// Per-key sliding windows of violation timestamps plus the marker of the
/// reading that last raised an alert for each key.
#[derive(Debug)]
pub struct ViolationTracker {
    config: TrackerConfig,
    rules: RuleSet,
    windows: HashMap<WindowKey, VecDeque<Timestamp>>,
    last_alert_marker: HashMap<WindowKey, Timestamp>,
}

impl ViolationTracker {
    pub fn new(config: TrackerConfig, rules: RuleSet) -> Self {
        Self {
            config,
            rules,
            windows: HashMap::new(),
            last_alert_marker: HashMap::new(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Feed one reading through the tracker.
    ///
    /// Readings for components without a rule are ignored and leave all
    /// state untouched; reporting them is up to the caller.
    ///
    /// Returns an alert when this reading brings the window to the threshold
    /// and the window's oldest violation is newer than the reading that raised
    /// the previous alert for the same key.
    pub fn process(&mut self, reading: &Reading) -> Option<Alert> {
        let Some(rule) = self.rules.get(&reading.component) else {
            tracing::trace!(component = %reading.component, "No rule for component");
            return None;
        };

        // Non-violating readings leave the windows untouched.
        let severity = rule.evaluate(reading)?;

        let key = (reading.satellite_id, reading.component.clone());
        let window = self.windows.entry(key.clone()).or_default();
        window.push_back(reading.timestamp);

        while let Some(front) = window.front() {
            if reading.timestamp - *front > self.config.window {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() < self.config.violation_threshold {
            return None;
        }

        let first_ts = *window.front()?;
        let violations = window.len();

        if let Some(marker) = self.last_alert_marker.get(&key) {
            if first_ts <= *marker {
                tracing::debug!(
                    satellite_id = reading.satellite_id,
                    component = %reading.component,
                    window_start = %first_ts,
                    marker = %marker,
                    "Alert suppressed (window already reported)"
                );
                return None;
            }
        }

        // The marker is the triggering reading, not the window start.
        self.last_alert_marker.insert(key, reading.timestamp);

        tracing::info!(
            satellite_id = reading.satellite_id,
            component = %reading.component,
            severity = %severity,
            violations,
            window_start = %first_ts,
            "Violation threshold reached"
        );

        Some(Alert {
            satellite_id: reading.satellite_id,
            severity,
            component: reading.component.clone(),
            timestamp: first_ts,
        })
    }

    /// Violations currently inside the window for a key.
    pub fn pending_violations(&self, satellite_id: SatelliteId, component: &str) -> usize {
        self.windows
            .get(&(satellite_id, component.to_string()))
            .map_or(0, VecDeque::len)
    }

    /// Timestamp of the reading that last raised an alert for a key.
    pub fn last_alert_marker(
        &self,
        satellite_id: SatelliteId,
        component: &str,
    ) -> Option<Timestamp> {
        self.last_alert_marker
            .get(&(satellite_id, component.to_string()))
            .copied()
    }

    /// Number of (satellite, component) pairs that have recorded a violation.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
