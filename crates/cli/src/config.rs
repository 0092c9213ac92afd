use std::fmt::Display;
use std::str::FromStr;

use satwatch_core::alert::Severity;
use satwatch_core::error::CoreError;
use satwatch_core::rules::{RuleMapping, RuleSet};
use satwatch_core::tracker::{
    TrackerConfig, ViolationTracker, DEFAULT_VIOLATION_THRESHOLD, DEFAULT_WINDOW_MINUTES,
};
use satwatch_pipeline::error::PipelineError;
use satwatch_pipeline::parser::{LineFormat, DEFAULT_DELIMITER, DEFAULT_TIMESTAMP_FORMAT};
use satwatch_pipeline::report::{ReportFormat, DEFAULT_OUTPUT_TIMESTAMP_FORMAT};

/// Default component-to-rule mapping.
pub const DEFAULT_COMPONENT_RULES: &str = "BATT=red_low,TSTAT=red_high";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid alert configuration: {0}")]
    Core(#[from] CoreError),

    #[error("Invalid format configuration: {0}")]
    Format(#[from] PipelineError),
}

/// Alerting configuration loaded from environment variables.
///
/// All fields have defaults matching the standard telemetry feed.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Threshold and window shared by every (satellite, component) pair.
    pub tracker: TrackerConfig,
    /// Component-to-rule mapping, e.g. `BATT=red_low,TSTAT=red_high`.
    pub component_rules: RuleMapping,
    pub line_format: LineFormat,
    pub report_format: ReportFormat,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                               | Default                        |
    /// |---------------------------------------|--------------------------------|
    /// | `ALERT_VIOLATION_COUNT_THRESHOLD`     | `3`                            |
    /// | `ALERT_VIOLATION_TIME_WINDOW_MINUTES` | `5`                            |
    /// | `ALERT_COMPONENT_RULES`               | `BATT=red_low,TSTAT=red_high`  |
    /// | `SEVERITY_RED_HIGH`                   | `RED HIGH`                     |
    /// | `SEVERITY_RED_LOW`                    | `RED LOW`                      |
    /// | `ALERT_TIMESTAMP_FORMAT`              | `%Y-%m-%dT%H:%M:%S%.6fZ`       |
    /// | `LOG_LINE_DELIMITER`                  | `\|`                           |
    /// | `LOG_LINE_TIMESTAMP_FORMAT`           | `%Y%m%d %H:%M:%S%.f`           |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Integers that fail to parse fall back to their default with a warning;
    /// values that parse but are out of range are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let threshold = parse_int(
            &lookup,
            "ALERT_VIOLATION_COUNT_THRESHOLD",
            DEFAULT_VIOLATION_THRESHOLD,
        );
        let window_minutes = parse_int(
            &lookup,
            "ALERT_VIOLATION_TIME_WINDOW_MINUTES",
            DEFAULT_WINDOW_MINUTES,
        );

        let component_rules = match lookup("ALERT_COMPONENT_RULES") {
            Some(raw) => RuleMapping::parse(&raw)?,
            None => RuleMapping::with_defaults(),
        };
        if component_rules.is_empty() {
            tracing::warn!("ALERT_COMPONENT_RULES is empty, no component will raise alerts");
        }

        let line_format = LineFormat::new(
            lookup("LOG_LINE_DELIMITER").unwrap_or_else(|| DEFAULT_DELIMITER.into()),
            lookup("LOG_LINE_TIMESTAMP_FORMAT").unwrap_or_else(|| DEFAULT_TIMESTAMP_FORMAT.into()),
        )?;

        let defaults = ReportFormat::default();
        let report_format = ReportFormat::new(
            lookup("SEVERITY_RED_HIGH")
                .unwrap_or_else(|| defaults.label(Severity::RedHigh).into()),
            lookup("SEVERITY_RED_LOW")
                .unwrap_or_else(|| defaults.label(Severity::RedLow).into()),
            lookup("ALERT_TIMESTAMP_FORMAT")
                .unwrap_or_else(|| DEFAULT_OUTPUT_TIMESTAMP_FORMAT.into()),
        )?;

        Ok(Self {
            tracker: tracker_config(threshold, window_minutes)?,
            component_rules,
            line_format,
            report_format,
        })
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        threshold: Option<usize>,
        window_minutes: Option<i64>,
    ) -> Result<Self, ConfigError> {
        let threshold = threshold.unwrap_or(self.tracker.violation_threshold());
        self.tracker = match window_minutes {
            Some(minutes) => tracker_config(threshold, minutes)?,
            None => TrackerConfig::new(threshold, self.tracker.window())?,
        };
        Ok(self)
    }

    /// Instantiate the configured rules.
    pub fn rule_set(&self) -> RuleSet {
        self.component_rules.build()
    }

    /// Build a fresh tracker for one processing run.
    pub fn build_tracker(&self) -> ViolationTracker {
        ViolationTracker::new(self.tracker, self.rule_set())
    }
}

fn tracker_config(threshold: usize, window_minutes: i64) -> Result<TrackerConfig, CoreError> {
    let window = chrono::Duration::try_minutes(window_minutes).ok_or_else(|| {
        CoreError::Validation(format!("window of {window_minutes} minutes is out of range"))
    })?;
    TrackerConfig::new(threshold, window)
}

/// Parse an integer variable, warning and falling back to `default` when the
/// value is not a valid integer.
fn parse_int<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, %default, "Invalid integer value, using default");
            default
        }),
    }
}
