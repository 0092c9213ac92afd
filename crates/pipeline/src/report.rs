//! JSON rendering of alerts.
//!
//! Severity labels and the timestamp layout are configurable so downstream
//! consumers can adjust the report without touching the tracker.

use std::fmt::Write as _;

use serde::Serialize;

use satwatch_core::alert::{Alert, Severity};
use satwatch_core::types::{SatelliteId, Timestamp};

use crate::error::PipelineError;
use crate::parser::validate_timestamp_format;

/// Output timestamp layout: ISO-8601, microseconds, trailing `Z`.
pub const DEFAULT_OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Indentation used by the pretty renderer.
const PRETTY_INDENT: &[u8] = b"    ";

/// Labels and timestamp layout used when rendering alerts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormat {
    red_high_label: String,
    red_low_label: String,
    timestamp_format: String,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            red_high_label: Severity::RedHigh.as_str().to_string(),
            red_low_label: Severity::RedLow.as_str().to_string(),
            timestamp_format: DEFAULT_OUTPUT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl ReportFormat {
    pub fn new(
        red_high_label: impl Into<String>,
        red_low_label: impl Into<String>,
        timestamp_format: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let timestamp_format = timestamp_format.into();
        validate_timestamp_format(&timestamp_format)?;
        Ok(Self {
            red_high_label: red_high_label.into(),
            red_low_label: red_low_label.into(),
            timestamp_format,
        })
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    pub fn label(&self, severity: Severity) -> &str {
        match severity {
            Severity::RedHigh => self.red_high_label.as_str(),
            Severity::RedLow => self.red_low_label.as_str(),
        }
    }

    pub fn format_timestamp(&self, timestamp: &Timestamp) -> Result<String, PipelineError> {
        let mut out = String::new();
        write!(out, "{}", timestamp.format(&self.timestamp_format))
            .map_err(|_| PipelineError::InvalidTimestampFormat(self.timestamp_format.clone()))?;
        Ok(out)
    }

    pub fn record(&self, alert: &Alert) -> Result<AlertRecord, PipelineError> {
        Ok(AlertRecord {
            satellite_id: alert.satellite_id,
            severity: self.label(alert.severity).to_string(),
            component: alert.component.clone(),
            timestamp: self.format_timestamp(&alert.timestamp)?,
        })
    }
}

/// Wire shape of a single alert in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub satellite_id: SatelliteId,
    pub severity: String,
    pub component: String,
    pub timestamp: String,
}

/// Render alerts as a JSON array, four-space indented when `pretty`.
pub fn render_json(
    alerts: &[Alert],
    format: &ReportFormat,
    pretty: bool,
) -> Result<String, PipelineError> {
    let records = alerts
        .iter()
        .map(|alert| format.record(alert))
        .collect::<Result<Vec<_>, _>>()?;

    if !pretty {
        return Ok(serde_json::to_string(&records)?);
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(PRETTY_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
