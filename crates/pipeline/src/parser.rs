//! Telemetry log line parser.
//!
//! Each record has eight delimited fields:
//!
//! ```text
//! <timestamp>|<satellite-id>|<red-high-limit>|<yellow-high-limit>|<yellow-low-limit>|<red-low-limit>|<raw-value>|<component>
//! ```
//!
//! Timestamps carry no zone and are interpreted as UTC.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;

use satwatch_core::reading::Reading;

use crate::error::PipelineError;

/// Field separator used when none is configured.
pub const DEFAULT_DELIMITER: &str = "|";

/// Input timestamp layout, e.g. `20180101 23:01:09.521`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y%m%d %H:%M:%S%.f";

/// Number of fields in a well-formed record.
pub const EXPECTED_FIELD_COUNT: usize = 8;

/// Why a line could not be turned into a [`Reading`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected} fields, got {got}")]
    FieldCount { expected: usize, got: usize },

    #[error("invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("component name is empty")]
    EmptyComponent,
}

/// Reject strftime patterns chrono cannot interpret.
pub fn validate_timestamp_format(format: &str) -> Result<(), PipelineError> {
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(PipelineError::InvalidTimestampFormat(format.to_string()));
    }
    Ok(())
}

/// Delimiter and timestamp layout of the input log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    delimiter: String,
    timestamp_format: String,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl LineFormat {
    pub fn new(
        delimiter: impl Into<String>,
        timestamp_format: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let delimiter = delimiter.into();
        let timestamp_format = timestamp_format.into();
        if delimiter.is_empty() {
            return Err(PipelineError::EmptyDelimiter);
        }
        validate_timestamp_format(&timestamp_format)?;
        Ok(Self {
            delimiter,
            timestamp_format,
        })
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Parse one log line. Surrounding whitespace is ignored.
    pub fn parse(&self, line: &str) -> Result<Reading, ParseError> {
        let fields: Vec<&str> = line.trim().split(self.delimiter.as_str()).collect();
        if fields.len() != EXPECTED_FIELD_COUNT {
            return Err(ParseError::FieldCount {
                expected: EXPECTED_FIELD_COUNT,
                got: fields.len(),
            });
        }

        let ts_str = fields[0].trim();
        let timestamp = NaiveDateTime::parse_from_str(ts_str, &self.timestamp_format)
            .map_err(|source| ParseError::InvalidTimestamp {
                value: ts_str.to_string(),
                source,
            })?
            .and_utc();

        let satellite_id = fields[1]
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidNumber {
                field: "satellite id",
                value: fields[1].to_string(),
            })?;

        let component = fields[7].trim();
        if component.is_empty() {
            return Err(ParseError::EmptyComponent);
        }

        Ok(Reading {
            timestamp,
            satellite_id,
            red_high_limit: parse_number(fields[2], "red-high-limit")?,
            yellow_high_limit: parse_number(fields[3], "yellow-high-limit")?,
            yellow_low_limit: parse_number(fields[4], "yellow-low-limit")?,
            red_low_limit: parse_number(fields[5], "red-low-limit")?,
            raw_value: parse_number(fields[6], "raw value")?,
            component: component.to_string(),
        })
    }
}

fn parse_number(value: &str, field: &'static str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
