//! Configuration for kadmin.
//!
//! ## config.kdl - User preferences
//!
//! Located at `$KADMIN_CONFIG`, else `~/.config/kadmin/config.kdl`.
//!
//! Contains:
//! - `server` - Base URL of the knowledge backend
//! - `output-format` - "json" or "human"
//! - `timeout-secs` - Per-request timeout
//! - `log-dir` - Where the TUI writes its log file
//!
//! ## Precedence
//!
//! CLI flag > environment > config file > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_ENV, ConfigOverrides, DEFAULT_SERVER, Resolved, ResolvedConfig, SERVER_ENV,
    ValueSource, default_config_path, resolve_config, resolve_config_with,
};
pub use schema::{ConsoleConfig, OutputFormat};
