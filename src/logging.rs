use crate::config::Config;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::create_dir_all;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry};

pub const LOG_FILE_NAME: &str = "nominatim-search.log";

#[derive(clap::ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    pub console_level: LogLevel,
    pub file_level: LogLevel,
    pub log_to_file: bool,
    pub log_dir: PathBuf,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            console_level: LogLevel::Info,
            file_level: LogLevel::Debug,
            log_to_file: false,
            log_dir: Config::default_dirs().state.clone(),
        }
    }
}

/// Console output goes to stderr so stdout stays machine readable.
/// Keep the returned guard alive or buffered file output is lost.
pub fn setup_logging(opts: &LoggingOptions) -> Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::from_level(opts.console_level.into()));

    let (file, guard) = if opts.log_to_file {
        create_dir_all(&opts.log_dir)?;
        let appender = tracing_appender::rolling::never(&opts.log_dir, LOG_FILE_NAME);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(LevelFilter::from_level(opts.file_level.into()));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let subscriber = registry().with(console).with(file);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}
