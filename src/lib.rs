//! kadmin - admin console for a REST-backed knowledge base.
//!
//! This library provides the core functionality for the `kadmin` binary:
//! the knowledge API client, the console controller driving list, form and
//! upload workflows, configuration, and the terminal front end.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod logging;
pub mod models;
pub mod tui;

/// Library-level error type for kadmin operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("{0}")]
    Api(#[from] api::ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for kadmin operations.
pub type Result<T> = std::result::Result<T, Error>;
