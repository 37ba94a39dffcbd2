//! Process-wide tracing subscriber setup.
//!
//! Output goes to stdout and, when a log directory is configured, to an
//! append-only log file as well. `RUST_LOG` overrides the configured level.

use crate::config::{LogFormat, LoggingConfig};
use crate::errors::ConfigError;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Builds the level filter: `RUST_LOG` if set and valid, else `level`.
///
/// # Errors
///
/// Returns an error if `level` is not a valid filter directive.
pub fn build_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(level)
        .map_err(|err| ConfigError::invalid(format!("invalid log level '{level}': {err}")))
}

/// Opens `dir/file_name` for appending, creating the directory if needed.
///
/// # Errors
///
/// Returns an IO error if the directory or file cannot be created.
pub fn open_log_file(dir: &Path, file_name: &str) -> Result<(PathBuf, File), ConfigError> {
    fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(file_name);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

    Ok((path, file))
}

fn stdout_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Text => fmt::layer().with_target(false).boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    }
}

fn file_layer(format: LogFormat, file: File) -> BoxedLayer {
    let writer = Mutex::new(file);
    match format {
        LogFormat::Text => fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
    }
}

/// Installs the global tracing subscriber.
///
/// Returns the path of the log file, if one was opened.
///
/// # Errors
///
/// Returns an error if the level is invalid, the log file cannot be opened,
/// or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<PathBuf>, ConfigError> {
    let filter = build_filter(&config.level)?;

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer(config.format)];
    let mut log_path = None;

    if let Some(ref dir) = config.log_dir {
        let (path, file) = open_log_file(dir, &config.file_name)?;
        layers.push(file_layer(config.format, file));
        log_path = Some(path);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|err| ConfigError::invalid(format!("failed to install logger: {err}")))?;

    Ok(log_path)
}
