//! `stagerun` CLI
//!
//! Runs the text summarizer training pipeline stage by stage, stopping at the
//! first failure.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stagerun::config::RunnerConfig;
use stagerun::events::{LifecycleSink, TracingLifecycleSink};
use stagerun::observability::init_logging;
use stagerun::pipeline::{PipelineDefinition, PipelineOrchestrator};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "stagerun", version)]
#[command(about = "Run the text summarizer training pipeline", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the log level (e.g. `debug`, `stagerun=trace,info`)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Run every stage in order (default if no command specified)
    Run,

    /// Print the stages in execution order
    List,

    /// Validate configuration
    Validate,

    /// Print the effective configuration as JSON
    PrintConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Run) => run_command(&config),
        Some(Commands::List) => {
            for (index, stage) in config.stages.iter().enumerate() {
                println!("{}. {}", index + 1, stage.name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Validate) => {
            config.definition()?;
            println!("Configuration OK: {} stage(s)", config.stages.len());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::PrintConfig) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(cli: &Cli) -> Result<RunnerConfig> {
    let mut config = RunnerConfig::load(cli.config.as_deref()).context("loading configuration")?;

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
        config.validate()?;
    }

    Ok(config)
}

fn run_command(config: &RunnerConfig) -> Result<ExitCode> {
    let log_path = init_logging(&config.logging)?;
    if let Some(path) = log_path {
        tracing::debug!(path = %path.display(), "Writing logs to file");
    }

    let definition = config.definition()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime")?;

    Ok(runtime.block_on(run_pipeline(&definition, Arc::new(TracingLifecycleSink))))
}

/// Runs `definition` to the end or to its first failure.
///
/// A stage failure has already been logged through `sink` by the runner, so
/// it only turns into the exit status here.
async fn run_pipeline(definition: &PipelineDefinition, sink: Arc<dyn LifecycleSink>) -> ExitCode {
    let orchestrator = PipelineOrchestrator::new(sink);
    match orchestrator.run(definition).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
