//! pipesim CLI - simulated build and test pipelines.
//!
//! Commands:
//! - `pipesim run` - Build modules, run tests, write telemetry and reports
//! - `pipesim validate` - Check a pipeline config without running it
//! - `pipesim explain` - Print what a pipeline would run
//! - `pipesim init` - Write a sample pipeline config
//!
//! `run` exits 0 when every test passes, 1 when any test fails, 2 on a
//! configuration error, and 3 on any other error (bad flags, unwritable
//! output directory).

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;

/// Exit code for configuration errors.
const EXIT_CONFIG_ERROR: u8 = 2;

/// Exit code for errors that are not configuration errors.
const EXIT_RUN_ERROR: u8 = 3;

#[derive(Parser)]
#[command(name = "pipesim")]
#[command(about = "Simulated build and test pipelines with structured telemetry")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline and write its outputs
    Run {
        /// Path to the YAML pipeline config
        #[arg(short, long)]
        config: String,

        /// Output directory for telemetry, results, and report
        #[arg(short, long = "out")]
        out_dir: String,

        /// Skip timing and force every status to OK
        #[arg(long)]
        dry_run: bool,

        /// Export formats to write (default: all)
        #[arg(short, long, value_delimiter = ',')]
        format: Vec<String>,

        /// Upper bound on simulated seconds per stage
        #[arg(long, default_value_t = 2.0)]
        max_stage_seconds: f64,
    },

    /// Validate a pipeline config
    Validate {
        /// Path to the YAML pipeline config
        #[arg(short, long)]
        config: String,
    },

    /// Print the modules and tests a config would run
    Explain {
        /// Path to the YAML pipeline config
        #[arg(short, long)]
        config: String,

        /// Include the digest each module would produce
        #[arg(long)]
        digests: bool,
    },

    /// Write a sample pipeline config
    Init {
        /// Directory to initialize
        #[arg(default_value = ".")]
        path: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let result: Result<ExitCode> = match cli.command {
        Commands::Run {
            config,
            out_dir,
            dry_run,
            format,
            max_stage_seconds,
        } => commands::run::run(&config, &out_dir, dry_run, &format, max_stage_seconds),
        Commands::Validate { config } => commands::validate::run(&config),
        Commands::Explain { config, digests } => commands::explain::run(&config, digests),
        Commands::Init { path } => commands::init::run(&path),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            if let Some(message) = config_error_message(&err) {
                println!(
                    "{}",
                    serde_json::json!({ "error": "config_error", "message": message })
                );
            } else {
                error!("{err:#}");
            }
            ExitCode::from(exit_code_for(&err))
        }
    }
}

/// Maps a command error to its exit code. Never 1, which means failed tests.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    if config_error_message(err).is_some() {
        EXIT_CONFIG_ERROR
    } else {
        EXIT_RUN_ERROR
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    // Logs go to stderr; stdout is reserved for command output.
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Finds a configuration error anywhere in the error chain.
fn config_error_message(err: &anyhow::Error) -> Option<String> {
    if let Some(config_err) = err.downcast_ref::<pipesim_config::Error>() {
        return Some(config_err.to_string());
    }
    match err.downcast_ref::<pipesim_engine::Error>() {
        Some(pipesim_engine::Error::Config(config_err)) => Some(config_err.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_comma_separated_formats() {
        let cli = Cli::parse_from([
            "pipesim", "run", "--config", "p.yml", "--out", "build", "--format", "csv,json",
        ]);
        match cli.command {
            Commands::Run { format, dry_run, .. } => {
                assert_eq!(format, ["csv", "json"]);
                assert!(!dry_run);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn config_errors_are_found_through_context() {
        let err = Err::<(), _>(pipesim_config::Error::EmptyTestName)
            .context("Failed to load config")
            .unwrap_err();
        assert_eq!(
            config_error_message(&err).as_deref(),
            Some("all tests must have a non-empty 'name'")
        );
    }

    #[test]
    fn engine_config_errors_are_config_errors() {
        let err = anyhow::Error::from(pipesim_engine::Error::Config(
            pipesim_config::Error::NotMapping,
        ));
        assert!(config_error_message(&err).is_some());

        let internal = anyhow::Error::from(pipesim_engine::Error::Internal("x".into()));
        assert!(config_error_message(&internal).is_none());
    }

    #[test]
    fn config_errors_exit_two() {
        let err = anyhow::Error::from(pipesim_config::Error::NotMapping);
        assert_eq!(exit_code_for(&err), EXIT_CONFIG_ERROR);
    }

    #[test]
    fn other_errors_do_not_look_like_failed_tests() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pipeline.yml");
        std::fs::write(&config, "modules:\n  - name: core\n    payload: p\n").unwrap();
        let out = dir.path().join("build");

        let err = commands::run::run(
            config.to_str().unwrap(),
            out.to_str().unwrap(),
            false,
            &[],
            -1.0,
        )
        .unwrap_err();

        assert_eq!(exit_code_for(&err), EXIT_RUN_ERROR);

        let internal = anyhow::Error::from(pipesim_engine::Error::Internal("x".into()));
        assert_eq!(exit_code_for(&internal), EXIT_RUN_ERROR);
    }
}
