//! Drives telemetry log input through the violation tracker.
//!
//! Lines are handled strictly in arrival order. Malformed lines (including
//! ones that are not valid UTF-8) are logged and dropped before they reach the
//! tracker; I/O failures abort the run.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use satwatch_core::alert::Alert;
use satwatch_core::tracker::ViolationTracker;

use crate::error::PipelineError;
use crate::parser::LineFormat;

/// Outcome of one processing run.
#[derive(Debug, Default)]
pub struct ProcessReport {
    /// Alerts in the order they were raised.
    pub alerts: Vec<Alert>,
    /// Lines read, including blank and malformed ones.
    pub lines_read: usize,
    /// Lines that parsed into a reading.
    pub readings: usize,
    /// Lines that failed to decode or parse.
    pub malformed: usize,
    /// Readings for components with no configured rule.
    pub unmapped: usize,
}

/// Process every line of `reader`.
pub fn process_reader<R: BufRead>(
    mut reader: R,
    format: &LineFormat,
    tracker: &mut ViolationTracker,
) -> Result<ProcessReport, PipelineError> {
    let mut report = ProcessReport::default();
    let mut unmapped_seen: HashSet<String> = HashSet::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        report.lines_read += 1;
        let line_number = report.lines_read;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                report.malformed += 1;
                tracing::warn!(line_number, error = %e, "Skipping line that is not valid UTF-8");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let reading = match format.parse(line) {
            Ok(reading) => reading,
            Err(e) => {
                report.malformed += 1;
                tracing::warn!(line_number, error = %e, "Skipping malformed line");
                continue;
            }
        };
        report.readings += 1;

        if !tracker.rules().contains(&reading.component) {
            report.unmapped += 1;
            note_unmapped(&mut unmapped_seen, &reading.component);
            continue;
        }

        if let Some(alert) = tracker.process(&reading) {
            report.alerts.push(alert);
        }
    }

    Ok(report)
}

/// Warn once per unmapped component, then drop to debug.
fn note_unmapped(seen: &mut HashSet<String>, component: &str) {
    if seen.contains(component) {
        tracing::debug!(component, "No violation rule configured for component");
    } else {
        tracing::warn!(component, "No violation rule configured for component");
        seen.insert(component.to_string());
    }
}

/// Open `path` and process it line by line.
pub fn process_file(
    path: &Path,
    format: &LineFormat,
    tracker: &mut ViolationTracker,
) -> Result<ProcessReport, PipelineError> {
    let file = File::open(path).map_err(|source| PipelineError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Processing telemetry log");
    process_reader(BufReader::new(file), format, tracker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use satwatch_core::rules::RuleSet;
    use satwatch_core::tracker::TrackerConfig;

    fn tracker() -> ViolationTracker {
        ViolationTracker::new(TrackerConfig::default(), RuleSet::with_defaults())
    }

    #[test]
    fn counts_blank_and_malformed_lines() {
        let input = "\
20180101 23:01:09.521|1000|17|15|9|8|7.8|BATT

not a reading
20180101 23:02:11.302|1000|17|15|9|8|7.7|BATT
20180101 23:04:11.531|1000|17|15|9|8|7.9
";
        let report =
            process_reader(input.as_bytes(), &LineFormat::default(), &mut tracker()).unwrap();

        assert_eq!(report.lines_read, 5);
        assert_eq!(report.readings, 2);
        assert_eq!(report.malformed, 2);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let report = process_reader(&b""[..], &LineFormat::default(), &mut tracker()).unwrap();
        assert_eq!(report.lines_read, 0);
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = process_file(
            Path::new("/nonexistent/satwatch/telemetry.log"),
            &LineFormat::default(),
            &mut tracker(),
        );
        assert!(matches!(result, Err(PipelineError::Open { .. })));
    }

    #[test]
    fn unmapped_components_are_counted_not_tracked() {
        let input = "\
20180101 23:01:09.521|1000|17|15|9|8|7.8|GYRO
20180101 23:01:10.521|1000|17|15|9|8|7.8|GYRO
20180101 23:01:11.521|1000|17|15|9|8|7.8|BATT
";
        let mut tracker = tracker();
        let report = process_reader(input.as_bytes(), &LineFormat::default(), &mut tracker).unwrap();

        assert_eq!(report.readings, 3);
        assert_eq!(report.unmapped, 2);
        assert_eq!(report.malformed, 0);
        assert_eq!(tracker.tracked_keys(), 1);
        assert_eq!(tracker.pending_violations(1000, "GYRO"), 0);
    }

    #[test]
    fn last_line_without_newline_is_processed() {
        let input = "20180101 23:01:09.521|1000|17|15|9|8|7.8|BATT";
        let mut tracker = tracker();
        let report = process_reader(input.as_bytes(), &LineFormat::default(), &mut tracker).unwrap();
        assert_eq!(report.lines_read, 1);
        assert_eq!(report.readings, 1);
        assert_eq!(tracker.pending_violations(1000, "BATT"), 1);
    }
}
