//! Tracing setup: JSON to stdout plus a plain-text copy in the run log.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global subscriber, appending the text log to `log_file`.
pub fn init(level: Level, log_file: &Path) -> Result<()> {
    if let Some(dir) = log_file.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {:?}", dir))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {:?}", log_file))?;

    let filter = LevelFilter::from_level(level);

    let stdout = fmt::layer()
        .json()
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(filter);

    let text = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(stdout)
        .with(text)
        .try_init()
        .context("Failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }
}
