//! Logs go to stderr; stdout carries only the estimate or the JSON outcome.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One short line per event, for people at a terminal.
    Compact,
    /// JSON lines, for runs whose logs are collected by another process.
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json_logs: bool) -> Self {
        if json_logs {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// `RUST_LOG` wins; otherwise only this crate logs, at debug when verbose.
fn pricer_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "parcel_pricer=debug,info"
    } else {
        "parcel_pricer=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init_logger(format: LogFormat, verbose: bool) {
    let (compact, json) = match format {
        LogFormat::Compact => (
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(false),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(pricer_filter(verbose))
        .with(compact)
        .with(json)
        .init();
}
