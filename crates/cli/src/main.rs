//! `satwatch` -- satellite telemetry alerting.
//!
//! Reads a telemetry log, tracks limit violations per satellite and component,
//! and prints the raised alerts as a JSON array on stdout.
//!
//! Alerting and format settings come from the environment (a `.env` file is
//! honoured); see [`satwatch_cli::config::AppConfig::from_env`]. Logging is
//! controlled by `RUST_LOG`, `LOG_LEVEL` and `ENVIRONMENT`.

use std::path::PathBuf;

use clap::Parser;

use satwatch_cli::app::{self, InputSource};
use satwatch_cli::config::AppConfig;
use satwatch_cli::logging::{self, LogSettings};

/// Process a telemetry log file and generate alerts.
#[derive(Parser, Debug)]
#[command(name = "satwatch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the telemetry log (`-` reads stdin)
    #[arg(default_value = "data/sample.log")]
    logfile: PathBuf,

    /// Violations inside the window that raise an alert
    /// (overrides ALERT_VIOLATION_COUNT_THRESHOLD)
    #[arg(long)]
    threshold: Option<usize>,

    /// Window length in minutes (overrides ALERT_VIOLATION_TIME_WINDOW_MINUTES)
    #[arg(long)]
    window_minutes: Option<i64>,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    logging::init(&LogSettings::from_env());
    let _service = logging::service_span().entered();

    let config = AppConfig::from_env()?.with_overrides(args.threshold, args.window_minutes)?;
    tracing::info!(
        threshold = config.tracker.violation_threshold(),
        window_minutes = config.tracker.window().num_minutes(),
        rules = %config.component_rules,
        "Loaded alert configuration",
    );

    let input = InputSource::from_arg(&args.logfile);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let report = app::run(&config, &input, !args.compact, &mut out)?;

    tracing::info!(
        input = %input,
        lines = report.lines_read,
        readings = report.readings,
        malformed = report.malformed,
        alerts = report.alerts.len(),
        "Processing complete",
    );

    Ok(())
}
