//! Logging setup. The terminal carries the conversation only, so log lines either go to
//! a file or nowhere.
//!
//! `RUST_LOG` sets the filter and `LOG_FILE` the destination (both may come from `.env`).

use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::log_format::SpanTaggedLine;

const DEFAULT_FILTER: &str = "info,hyper_util=off,reqwest=warn";

/// Where log lines end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Appended as plain text, one `SpanTaggedLine` per event.
    File(PathBuf),
    Discard,
}

impl LogTarget {
    /// Blank or missing `LOG_FILE` discards logs.
    pub fn from_log_file(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(path) if !path.is_empty() => LogTarget::File(PathBuf::from(path)),
            _ => LogTarget::Discard,
        }
    }

    pub fn from_env() -> Self {
        Self::from_log_file(std::env::var("LOG_FILE").ok().as_deref())
    }
}

fn filter_from(value: Option<&str>) -> EnvFilter {
    value
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber for `target`.
pub fn init_with(target: &LogTarget) -> Result<(), Box<dyn std::error::Error>> {
    let filter = filter_from(std::env::var("RUST_LOG").ok().as_deref());
    match target {
        LogTarget::File(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .event_format(SpanTaggedLine::new())
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
            tracing::info!(path = %path.display(), "pantry logging to file");
        }
        LogTarget::Discard => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::sink)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
    }
    Ok(())
}

pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    init_with(&LogTarget::from_env())
}
