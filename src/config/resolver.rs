//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. `KADMIN_SERVER` environment variable (server only)
//! 3. config.kdl (`$KADMIN_CONFIG` or `~/.config/kadmin/config.kdl`)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::config::schema::{ConsoleConfig, OutputFormat, validate_server_url};
use crate::{Error, Result};

/// Environment variable overriding the backend URL.
pub const SERVER_ENV: &str = "KADMIN_SERVER";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "KADMIN_CONFIG";

/// Backend URL used when nothing else is configured.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from the config file at this path
    ConfigFile(PathBuf),
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile(path) => write!(f, "file:{}", path.display()),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// Config file consulted (it may not exist)
    pub config_path: Option<PathBuf>,
    /// Backend base URL, without trailing slash
    pub server: Resolved<String>,
    /// Output format preference
    pub output_format: Resolved<OutputFormat>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<Resolved<u64>>,
    /// Directory for the TUI log file
    pub log_dir: Option<Resolved<PathBuf>>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            server: Resolved::new(DEFAULT_SERVER.to_string(), ValueSource::Default),
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            timeout_secs: None,
            log_dir: None,
        }
    }
}

impl ResolvedConfig {
    pub fn server(&self) -> &str {
        &self.server.value
    }

    pub fn output_format(&self) -> &OutputFormat {
        &self.output_format.value
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .as_ref()
            .map(|r| Duration::from_secs(r.value))
    }

    /// Configured log directory, if any.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_ref().map(|r| r.value.as_path())
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Server override from `--server`
    pub server: Option<String>,
    /// Output format override from `-H/--human`
    pub output_format: Option<OutputFormat>,
    /// Config file from `--config`
    pub config_path: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }
}

/// Default config file location: `~/.config/kadmin/config.kdl`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kadmin").join("config.kdl"))
}

/// Resolve configuration from flags, the environment and the config file.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let path = overrides
        .config_path
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(default_config_path);

    let file = match &path {
        Some(p) => ConsoleConfig::load(p)?,
        None => ConsoleConfig::new(),
    };
    let env_server = std::env::var(SERVER_ENV).ok().filter(|s| !s.is_empty());

    resolve_config_with(overrides, env_server, path.as_deref(), &file)
}

/// Resolve configuration from already-gathered inputs.
pub fn resolve_config_with(
    overrides: &ConfigOverrides,
    env_server: Option<String>,
    config_path: Option<&Path>,
    file: &ConsoleConfig,
) -> Result<ResolvedConfig> {
    let mut result = ResolvedConfig {
        config_path: config_path.map(Path::to_path_buf),
        ..ResolvedConfig::default()
    };
    let file_source = || {
        ValueSource::ConfigFile(config_path.map(Path::to_path_buf).unwrap_or_default())
    };

    // Resolve server
    if let Some(ref server) = overrides.server {
        result.server = Resolved::new(server.clone(), ValueSource::CliFlag);
    } else if let Some(server) = env_server {
        result.server = Resolved::new(server, ValueSource::EnvVar(SERVER_ENV.to_string()));
    } else if let Some(ref server) = file.server {
        result.server = Resolved::new(server.clone(), file_source());
    }
    validate_server_url(&result.server.value)
        .map_err(|e| Error::Config(format!("{} ({})", e, result.server.source)))?;
    let trimmed = result.server.value.trim_end_matches('/').len();
    result.server.value.truncate(trimmed);

    // Resolve output_format
    if let Some(ref format) = overrides.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::CliFlag);
    } else if let Some(ref format) = file.output_format {
        result.output_format = Resolved::new(format.clone(), file_source());
    }

    if let Some(secs) = file.timeout_secs {
        result.timeout_secs = Some(Resolved::new(secs, file_source()));
    }
    if let Some(ref dir) = file.log_dir {
        result.log_dir = Some(Resolved::new(dir.clone(), file_source()));
    }

    Ok(result)
}
