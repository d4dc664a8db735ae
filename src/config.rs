//! Configuration file for doccheck.
//!
//! Optional; discovered as `doccheck.yaml` or `.doccheck.yaml` in the
//! working directory. Command-line flags override file values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::analysis::SUPPORTED_EXTENSIONS;
use crate::detect::ScopeSelector;

/// Config file names searched in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["doccheck.yaml", ".doccheck.yaml"];

/// Errors from loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid glob in excluded_paths: {0}")]
    Glob(#[from] globset::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Default scope when no mode flag is given.
    pub mode: ScopeSelector,
    /// Directory checked by default and monitored for changes, relative to
    /// the repository root.
    pub source_root: String,
    /// File extensions (without dot) to check; empty means all supported.
    pub extensions: Vec<String>,
    /// Glob patterns for paths to skip (e.g. `"**/*.test.ts"`).
    pub excluded_paths: Vec<String>,
    pub git: GitConfig,
    pub docs: DocsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ScopeSelector::Full,
            source_root: "src".to_string(),
            extensions: Vec::new(),
            excluded_paths: Vec::new(),
            git: GitConfig::default(),
            docs: DocsConfig::default(),
        }
    }
}

/// Version-control settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitConfig {
    /// Executable to run.
    pub program: String,
    /// Per-invocation timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl GitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Documentation generation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DocsConfig {
    pub readme: String,
    pub heading: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            readme: "README.md".to_string(),
            heading: "API Documentation".to_string(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate YAML text. An empty document yields the defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load `explicit` if given, else a discovered file in `dir`, else defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::parse_file(path),
            None => match Self::discover(dir) {
                Some(path) => Self::parse_file(path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.git.program.trim().is_empty() {
            return Err(ConfigError::Invalid("git.program must not be empty".to_string()));
        }
        if self.git.timeout_ms == 0 {
            return Err(ConfigError::Invalid("git.timeout_ms must be positive".to_string()));
        }
        for ext in &self.extensions {
            let ext = ext.trim_start_matches('.');
            if !SUPPORTED_EXTENSIONS.contains(&ext) {
                return Err(ConfigError::Invalid(format!("unsupported extension: {}", ext)));
            }
        }
        self.excluded_matcher()?;
        Ok(())
    }

    /// Compiled `excluded_paths`.
    pub fn excluded_matcher(&self) -> Result<globset::GlobSet, ConfigError> {
        let mut builder = globset::GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            builder.add(globset::Glob::new(pattern)?);
        }
        Ok(builder.build()?)
    }

    /// Whether files with `ext` are checked.
    pub fn includes_extension(&self, ext: &str) -> bool {
        if self.extensions.is_empty() {
            return SUPPORTED_EXTENSIONS.contains(&ext);
        }
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.') == ext)
    }
}
