//! Runner configuration.
//!
//! Configuration comes from an optional JSON file, then `STAGERUN_*`
//! environment overrides. Every field has a default, so running without a
//! file executes the standard summarizer training pipeline.

use crate::errors::{ConfigError, PipelineValidationError};
use crate::pipeline::{PipelineBuilder, PipelineDefinition, StageSpec};
use crate::stages::CommandStage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "STAGERUN_LOG_LEVEL";
/// Environment variable overriding the log format.
pub const ENV_LOG_FORMAT: &str = "STAGERUN_LOG_FORMAT";
/// Environment variable overriding the log directory. Empty disables the file.
pub const ENV_LOG_DIR: &str = "STAGERUN_LOG_DIR";

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::invalid(format!(
                "unknown log format '{other}', expected 'text' or 'json'"
            ))),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `stagerun=debug,info`.
    #[serde(default = "default_level")]
    pub level: String,
    /// Line format for every output.
    #[serde(default)]
    pub format: LogFormat,
    /// Directory of the log file; `null` logs to stdout only.
    #[serde(default = "default_log_dir")]
    pub log_dir: Option<PathBuf>,
    /// Log file name inside `log_dir`.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            log_dir: default_log_dir(),
            file_name: default_file_name(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> Option<PathBuf> {
    Some(PathBuf::from("logs"))
}

fn default_file_name() -> String {
    "running_logs.log".to_string()
}

/// One stage whose work is delegated to an external program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCommandConfig {
    /// Stage name shown in the lifecycle banners.
    pub name: String,
    /// Program to execute.
    pub program: String,
    /// Program arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Working directory; defaults to the runner's.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl StageCommandConfig {
    /// Creates a stage running `program` with `args`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }

    /// Builds the command stage.
    #[must_use]
    pub fn to_stage(&self) -> CommandStage {
        let mut stage = CommandStage::new(&self.program).with_args(self.args.iter().cloned());
        if let Some(ref dir) = self.working_dir {
            stage = stage.with_working_dir(dir);
        }
        for (key, value) in &self.env {
            stage = stage.with_env(key, value);
        }
        stage
    }

    /// Builds a pipeline entry constructing a fresh command stage per run.
    #[must_use]
    pub fn to_spec(&self) -> StageSpec {
        let config = self.clone();
        StageSpec::new(&self.name, move || config.to_stage())
    }
}

fn default_pipeline_name() -> String {
    "text-summarizer-training".to_string()
}

fn python_stage(name: &str, module: &str) -> StageCommandConfig {
    StageCommandConfig::new(
        name,
        "python",
        ["-m".to_string(), format!("TextSummarizer.pipeline.{module}")],
    )
}

fn default_stages() -> Vec<StageCommandConfig> {
    vec![
        python_stage("Data Ingestion", "stage_01_data_ingestion"),
        python_stage("Data Validation", "stage_02_data_validation"),
        python_stage("Data Transformation", "stage_03_data_transformation"),
        python_stage("Model Training", "stage_04_model_trainer"),
    ]
}

/// Top-level runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Pipeline name used in spans and reports.
    #[serde(default = "default_pipeline_name")]
    pub pipeline_name: String,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Stages in execution order.
    #[serde(default = "default_stages")]
    pub stages: Vec<StageCommandConfig>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pipeline_name: default_pipeline_name(),
            logging: LoggingConfig::default(),
            stages: default_stages(),
        }
    }
}

impl RunnerConfig {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the file (or defaults), applies environment overrides, and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, an override, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `STAGERUN_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the format override is not recognised.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.logging.format = format.parse()?;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.logging.log_dir = if dir.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }
        Ok(())
    }

    /// Checks that the configuration can be run.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline_name.trim().is_empty() {
            return Err(ConfigError::invalid("pipeline_name cannot be empty"));
        }

        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            return Err(ConfigError::invalid(format!(
                "invalid log level '{}'",
                self.logging.level
            )));
        }

        if self.logging.file_name.trim().is_empty() {
            return Err(ConfigError::invalid("logging.file_name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for stage in &self.stages {
            if stage.name.trim().is_empty() {
                return Err(ConfigError::invalid("stage name cannot be empty"));
            }
            if !seen.insert(stage.name.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "duplicate stage name '{}'",
                    stage.name
                )));
            }
            if stage.program.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "stage '{}' has no program",
                    stage.name
                )));
            }
        }

        Ok(())
    }

    /// Builds the pipeline definition described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a stage name is empty or duplicated.
    pub fn definition(&self) -> Result<PipelineDefinition, PipelineValidationError> {
        let mut builder = PipelineBuilder::new(&self.pipeline_name);
        for stage in &self.stages {
            builder.add_stage_spec(stage.to_spec())?;
        }
        builder.build()
    }
}
