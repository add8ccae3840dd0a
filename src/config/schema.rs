//! KDL schema for config.kdl.
//!
//! This module provides:
//! - the `ConsoleConfig` struct mirroring the file
//! - parsing from KDL documents
//! - validation
//! - loading from disk (a missing file means "nothing set")

use std::path::{Path, PathBuf};

use kdl::KdlDocument;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// server "http://127.0.0.1:8000"
/// output-format "human"  // or "json"
/// timeout-secs 30
/// log-dir "/var/tmp/kadmin"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the knowledge backend
    pub server: Option<String>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Per-request timeout; unset leaves the transport default
    pub timeout_secs: Option<u64>,

    /// Directory for the TUI log file
    pub log_dir: Option<PathBuf>,
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(ref server) = self.server {
            validate_server_url(server)?;
        }
        if self.timeout_secs == Some(0) {
            return Err("timeout-secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown nodes are ignored.
    ///
    /// An `output-format` other than "json" or "human" is an error.
    pub fn from_kdl(doc: &KdlDocument) -> std::result::Result<Self, String> {
        let mut config = Self::new();

        if let Some(s) = first_string(doc, "server") {
            config.server = Some(s.to_string());
        }

        if let Some(s) = first_string(doc, "output-format") {
            let format = OutputFormat::parse(s).ok_or_else(|| {
                format!("output-format must be \"json\" or \"human\", got {:?}", s)
            })?;
            config.output_format = Some(format);
        }

        if let Some(node) = doc.get("timeout-secs") {
            if let Some(entry) = node.entries().first() {
                if let Some(i) = entry.value().as_integer() {
                    config.timeout_secs = u64::try_from(i).ok();
                }
            }
        }

        if let Some(s) = first_string(doc, "log-dir") {
            config.log_dir = Some(PathBuf::from(s));
        }

        Ok(config)
    }

    /// Load and validate the config file at `path`.
    ///
    /// A missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };
        let doc: KdlDocument = text.parse()?;
        let config = Self::from_kdl(&doc)
            .and_then(|config| config.validate().map(|()| config))
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }
}

fn first_string<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a str> {
    doc.get(name)?.entries().first()?.value().as_string()
}

/// Check that `url` is an http(s) URL.
pub fn validate_server_url(url: &str) -> std::result::Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!(
            "server must start with http:// or https://, got {}",
            url
        ))
    }
}
