//! Tracing subscriber setup.
//!
//! Environment variables:
//!   KADMIN_LOG         - env filter directives (default: "kadmin=warn" on
//!                        stderr, "kadmin=info" in the TUI log file)
//!   KADMIN_LOG_FORMAT  - "json" or "text" (default: "text")
//!
//! One-shot commands log to stderr so stdout stays parseable. The TUI owns
//! the terminal, so it logs to a daily rolling file instead.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "KADMIN_LOG";

/// Environment variable selecting the line format.
pub const LOG_FORMAT_ENV: &str = "KADMIN_LOG_FORMAT";

const STDERR_DIRECTIVES: &str = "kadmin=warn";
const FILE_DIRECTIVES: &str = "kadmin=info";
const LOG_FILE_NAME: &str = "kadmin.log";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Daily rolling file in this directory
    File(PathBuf),
}

/// Default TUI log directory: `~/.local/state/kadmin`.
pub fn default_log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("state")))
        .unwrap_or_else(std::env::temp_dir)
        .join("kadmin")
}

/// Build the env filter from `KADMIN_LOG`, falling back to `default`.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

fn json_requested() -> bool {
    std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process when logging
/// to a file, otherwise buffered lines are lost. Installing twice is a no-op.
pub fn init_logging(target: &LogTarget) -> crate::Result<Option<WorkerGuard>> {
    let json = json_requested();

    match target {
        LogTarget::Stderr => {
            let registry = tracing_subscriber::registry().with(env_filter(STDERR_DIRECTIVES));
            let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            let _ = if json {
                registry.with(layer.json()).try_init()
            } else {
                registry.with(layer).try_init()
            };
            Ok(None)
        }
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir)?;
            let registry = tracing_subscriber::registry().with(env_filter(FILE_DIRECTIVES));
            let (writer, guard) = tracing_appender::non_blocking(rolling_file(dir));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            let _ = if json {
                registry.with(layer.json()).try_init()
            } else {
                registry.with(layer).try_init()
            };
            Ok(Some(guard))
        }
    }
}

fn rolling_file(dir: &Path) -> tracing_appender::rolling::RollingFileAppender {
    tracing_appender::rolling::daily(dir, LOG_FILE_NAME)
}
