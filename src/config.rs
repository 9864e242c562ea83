//! Execution configuration
//!
//! [`ExecutionConfig`] is passed to the engine at construction. It can be built in
//! code, loaded from a TOML file, or assembled by the command line. Every field is
//! optional in TOML and falls back to the defaults below.
//!
//! ```toml
//! language = "javascript"
//! max_steps = 500
//! timeout_ms = 30000
//! memory_limit_mb = 100
//! ```
//!
//! `timeout_ms` and `memory_limit_mb` are accepted and carried into exports, but the
//! engine only enforces `max_steps`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_STEPS: usize = 1000;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 100;

/// Source language tag. Only JavaScript has executable semantics; the other tags are
/// accepted and traced with the same rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Javascript,
    Python,
    Java,
    Cpp,
}

impl Language {
    pub fn is_executable(self) -> bool {
        matches!(self, Language::Javascript)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub language: Language,
    /// Hard cap on processed lines
    pub max_steps: usize,
    pub timeout_ms: u64,
    pub memory_limit_mb: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            language: Language::default(),
            max_steps: DEFAULT_MAX_STEPS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            memory_limit_mb: DEFAULT_MEMORY_LIMIT_MB,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Syntax(#[from] toml::de::Error),
}

impl ExecutionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// The step budget actually enforced; zero is treated as one
    pub fn effective_max_steps(&self) -> usize {
        self.max_steps.max(1)
    }
}
