//! Process-wide tracing setup.
//!
//! `RUST_LOG` takes precedence. Otherwise the filter is derived from
//! `LOG_LEVEL` for the workspace crates, and `ENVIRONMENT=production`
//! switches to JSON output. Everything is written to stderr so stdout stays
//! reserved for the alert report.
//!
//! The binary enters [`service_span`] right after [`init`], so every record
//! carries the service name and version.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_LEVEL: &str = "info";
const PRODUCTION_ENVIRONMENT: &str = "production";

/// Crate targets that receive the `LOG_LEVEL` directive.
const LOG_TARGETS: [&str; 4] = ["satwatch", "satwatch_cli", "satwatch_core", "satwatch_pipeline"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("LOG_LEVEL")
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.into());
        let json = lookup("ENVIRONMENT")
            .is_some_and(|env| env.trim().eq_ignore_ascii_case(PRODUCTION_ENVIRONMENT));
        Self { level, json }
    }

    /// Filter directives used when `RUST_LOG` is not set.
    pub fn directives(&self) -> String {
        LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={}", self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber. Call once, at startup.
pub fn init(settings: &LogSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| settings.directives().into());

    let (json_layer, text_layer) = if settings.json {
        (Some(fmt::layer().json().with_writer(std::io::stderr)), None)
    } else {
        (None, Some(fmt::layer().with_writer(std::io::stderr)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Root span tagging records with the package name and version.
pub fn service_span() -> tracing::Span {
    tracing::info_span!(
        "service",
        service = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    )
}
