//! Logging configuration and initialization.
//!
//! Stderr output filtered by `RUST_LOG`, plus an optional rolling log file
//! under the data directory.

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Guard that must be held for the lifetime of the application.
/// When dropped, flushes any pending log writes.
#[must_use = "Dropping this guard will stop logging - keep it alive for the program's lifetime"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the logging subsystem.
///
/// `verbose` raises the default stderr level from `warn` to `debug`; an
/// explicit `RUST_LOG` always takes precedence.
pub fn init_logging(config: &LoggingConfig, data_dir: &Path, verbose: bool) -> Result<LoggingGuard> {
    let mut file_guard = None;

    let file_layer = if config.enabled {
        let log_dir = resolve_log_dir(&config.directory, data_dir);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let rotation = parse_rotation(&config.rotation);
        let file_appender = RollingFileAppender::new(rotation, &log_dir, &config.file_prefix);
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);

        Some(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(parse_level(&config.level)),
        )
    } else {
        None
    };

    let stderr_layer = if config.stderr {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(stderr_filter(verbose)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to initialize logging subscriber")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn stderr_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("doctree=debug")
        } else {
            EnvFilter::new("doctree=warn")
        }
    })
}

fn resolve_log_dir(directory: &Path, data_dir: &Path) -> PathBuf {
    if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        data_dir.join(directory)
    }
}

fn parse_level(level: &str) -> EnvFilter {
    let level_str = match level.to_lowercase().as_str() {
        "trace" => "doctree=trace",
        "debug" => "doctree=debug",
        "info" => "doctree=info",
        "warn" => "doctree=warn",
        "error" => "doctree=error",
        _ => {
            eprintln!(
                "Warning: Unknown log level '{}', defaulting to 'debug'",
                level
            );
            "doctree=debug"
        }
    };
    EnvFilter::new(level_str)
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation.to_lowercase().as_str() {
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        "minutely" => Rotation::MINUTELY,
        "never" => Rotation::NEVER,
        _ => {
            eprintln!(
                "Warning: Unknown rotation strategy '{}', defaulting to 'daily'",
                rotation
            );
            Rotation::DAILY
        }
    }
}
