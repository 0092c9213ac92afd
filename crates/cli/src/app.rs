//! One processing run: build a tracker, feed it the input, print the report.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

use satwatch_pipeline::processor::{process_file, process_reader, ProcessReport};
use satwatch_pipeline::report::render_json;

use crate::config::AppConfig;

/// Where telemetry lines are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` selects stdin, anything else is a file path.
    pub fn from_arg(path: &Path) -> Self {
        if path == Path::new("-") {
            InputSource::Stdin
        } else {
            InputSource::File(path.to_path_buf())
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => f.write_str("<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Process `input` and write the JSON alert report to `out`.
pub fn run<W: Write>(
    config: &AppConfig,
    input: &InputSource,
    pretty: bool,
    out: &mut W,
) -> anyhow::Result<ProcessReport> {
    let mut tracker = config.build_tracker();

    let report = match input {
        InputSource::Stdin => {
            process_reader(io::stdin().lock(), &config.line_format, &mut tracker)
        }
        InputSource::File(path) => process_file(path, &config.line_format, &mut tracker),
    }
    .with_context(|| format!("failed to process {input}"))?;

    let json = render_json(&report.alerts, &config.report_format, pretty)?;
    writeln!(out, "{json}").context("failed to write alert report")?;

    Ok(report)
}
