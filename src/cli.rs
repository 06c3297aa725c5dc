//! Command-line plumbing shared by the stage binaries

use crate::config::{Config, StagePaths};
use clap::Args;
use std::path::PathBuf;
use tracing::Level;

/// Arguments accepted by every stage binary. All are optional.
#[derive(Debug, Clone, Args)]
pub struct StageArgs {
    /// Input dataset (JSON array of story records)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output dataset
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// YAML config file [default: ./storyprep.yaml if present]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log verbosity: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

impl StageArgs {
    /// Input and output paths: flag, then config, then the stage default.
    pub fn paths(
        &self,
        configured: &StagePaths,
        default_input: &str,
        default_output: &str,
    ) -> (PathBuf, PathBuf) {
        let (input, output) = configured.resolve(default_input, default_output);
        (
            self.input.clone().unwrap_or(input),
            self.output.clone().unwrap_or(output),
        )
    }

    pub fn load_config(&self) -> Result<Config, crate::config::ConfigError> {
        Config::discover(self.config.as_deref())
    }
}

/// Install the fmt subscriber on stderr, leaving stdout for results.
pub fn init_tracing(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Print an error and its source chain to stderr.
pub fn report_error(err: &dyn std::error::Error) {
    eprintln!("Error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}
