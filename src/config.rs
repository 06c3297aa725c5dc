//! Run configuration
//!
//! Optional YAML file selecting the NLP backend and overriding stage paths.
//! Every key may be omitted; omitted keys fall back to the built-in defaults.
//!
//! ```yaml
//! nlp:
//!   backend: subprocess
//!   command: ["python3", "scripts/spacy_nlp.py"]
//! preprocess:
//!   input: data/raw/stories.json
//!   output: data/processed/stories_preprocessed.json
//! characters:
//!   input: data/processed/stories_preprocessed.json
//!   output: data/processed/stories_with_characters.json
//! ```

use crate::nlp::{NlpBackend, NlpError, SubprocessNlp};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "storyprep.yaml";

pub const RAW_STORIES: &str = "data/raw/stories.json";
pub const PREPROCESSED_STORIES: &str = "data/processed/stories_preprocessed.json";
pub const STORIES_WITH_CHARACTERS: &str = "data/processed/stories_with_characters.json";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("nlp.backend is 'subprocess' but nlp.command is empty")]
    MissingCommand,

    #[error(transparent)]
    Nlp(#[from] NlpError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub nlp: NlpConfig,
    pub preprocess: StagePaths,
    pub characters: StagePaths,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Rules,
    Subprocess,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NlpConfig {
    pub backend: BackendKind,
    /// Program and arguments for the subprocess backend
    pub command: Vec<String>,
}

impl NlpConfig {
    /// Build the process-wide NLP backend.
    pub fn build(&self) -> Result<NlpBackend, ConfigError> {
        match self.backend {
            BackendKind::Rules => Ok(NlpBackend::rules()),
            BackendKind::Subprocess => {
                if self.command.is_empty() {
                    return Err(ConfigError::MissingCommand);
                }
                Ok(NlpBackend::subprocess(SubprocessNlp::spawn(&self.command)?))
            }
        }
    }
}

/// Input/output overrides for one stage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StagePaths {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl StagePaths {
    /// Resolve against the stage defaults.
    pub fn resolve(&self, default_input: &str, default_output: &str) -> (PathBuf, PathBuf) {
        (
            self.input.clone().unwrap_or_else(|| default_input.into()),
            self.output.clone().unwrap_or_else(|| default_output.into()),
        )
    }
}

impl Config {
    pub fn from_yaml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        // An empty file parses as null; treat it as all defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content, path)
    }

    /// The explicit path if given, else `storyprep.yaml` in the working
    /// directory if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "using config file");
            return Self::load(local);
        }
        Ok(Self::default())
    }
}
