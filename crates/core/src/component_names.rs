//! Well-known component identifiers as they appear in the telemetry log.
//!
//! These are the keys of the default component-to-rule mapping
//! (see [`crate::rules::RuleSet::with_defaults`]).

/// Battery voltage readings. Alerts when the value drops below the red-low limit.
pub const COMPONENT_BATT: &str = "BATT";

/// Thermostat readings. Alerts when the value rises above the red-high limit.
pub const COMPONENT_TSTAT: &str = "TSTAT";
