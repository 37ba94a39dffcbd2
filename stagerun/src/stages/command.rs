//! Stage that delegates its work to an external program.

use super::Stage;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;

/// Errors raised by a [`CommandStage`].
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started.
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        /// The program name.
        program: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully.
    #[error("'{program}' exited with {}", describe_code(*code))]
    ExitStatus {
        /// The program name.
        program: String,
        /// The exit code, or `None` if terminated by a signal.
        code: Option<i32>,
    },
}

fn describe_code(code: Option<i32>) -> String {
    code.map_or_else(|| "no exit code (terminated by signal)".to_string(), |c| format!("status {c}"))
}

/// Runs an external program to completion; a non-zero exit fails the stage.
///
/// Standard output and error are inherited so the program's own logs land
/// next to the orchestrator's.
#[derive(Debug, Clone)]
pub struct CommandStage {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl CommandStage {
    /// Creates a stage running `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }

    /// Sets the arguments.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the working directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Adds an environment variable.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl Stage for CommandStage {
    async fn run(&mut self) -> anyhow::Result<()> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).envs(&self.env).kill_on_drop(true);
        if let Some(ref dir) = self.working_dir {
            command.current_dir(dir);
        }

        tracing::debug!(program = %self.program, args = ?self.args, "Spawning stage command");

        let status = command.status().await.map_err(|source| CommandError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !status.success() {
            return Err(CommandError::ExitStatus {
                program: self.program.clone(),
                code: status.code(),
            }
            .into());
        }

        Ok(())
    }
}
