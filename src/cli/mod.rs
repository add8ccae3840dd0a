//! CLI argument definitions for kadmin.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::logging::LogTarget;

/// Version string with the commit and build time injected by build.rs.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("KADMIN_GIT_COMMIT"),
    " ",
    env!("KADMIN_BUILD_TIMESTAMP"),
    ")"
);

/// kadmin - admin console for a knowledge base REST backend.
///
/// Run `kadmin tui` for the interactive console, or use the one-shot
/// subcommands to script the same operations.
#[derive(Parser, Debug)]
#[command(name = "kadmin")]
#[command(author, version = VERSION, about = "Admin console for a knowledge base REST backend", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Base URL of the knowledge backend (overrides KADMIN_SERVER and config)
    #[arg(short = 's', long = "server", global = true)]
    pub server: Option<String>,

    /// Path to config.kdl (default: ~/.config/kadmin/config.kdl)
    #[arg(long = "config", global = true, env = "KADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all knowledge items
    List,

    /// Show a single knowledge item by ID
    Show {
        /// Knowledge item ID
        id: String,
    },

    /// Create a knowledge item
    Add {
        #[command(flatten)]
        fields: KnowledgeArgs,
    },

    /// Replace the title, content and source of a knowledge item
    Update {
        /// Knowledge item ID
        id: String,

        #[command(flatten)]
        fields: KnowledgeArgs,
    },

    /// Delete a knowledge item (asks for confirmation)
    Delete {
        /// Knowledge item ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Bulk import from a text, CSV or JSON file
    Upload {
        #[command(subcommand)]
        command: UploadCommands,
    },

    /// Launch the interactive terminal console
    #[cfg(feature = "tui")]
    Tui,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Commands {
    /// Where this command logs. The TUI owns the terminal, so it logs to a
    /// file in `log_dir` (or the default state directory).
    #[cfg_attr(not(feature = "tui"), allow(unused_variables))]
    pub fn log_target(&self, log_dir: Option<&Path>) -> LogTarget {
        match self {
            #[cfg(feature = "tui")]
            Commands::Tui => LogTarget::File(
                log_dir
                    .map(Path::to_path_buf)
                    .unwrap_or_else(crate::logging::default_log_dir),
            ),
            _ => LogTarget::Stderr,
        }
    }
}

/// Fields of a knowledge item, shared by `add` and `update`.
#[derive(clap::Args, Debug, Clone)]
pub struct KnowledgeArgs {
    /// Item title
    #[arg(short, long)]
    pub title: String,

    /// Item content ('-' reads from stdin)
    #[arg(short, long)]
    pub content: String,

    /// Where the content came from (omitted or empty means none)
    #[arg(long)]
    pub source: Option<String>,
}

/// Upload subcommands, one per file format
#[derive(Subcommand, Debug)]
pub enum UploadCommands {
    /// Upload a plain text file as one item
    Txt {
        /// Path to the .txt file
        file: PathBuf,

        /// Title for the new item
        #[arg(short, long)]
        title: String,

        /// Source label (defaults to the file name on the server)
        #[arg(long, default_value = "")]
        source: String,
    },

    /// Upload a CSV file, one item per row
    Csv {
        /// Path to the .csv file
        file: PathBuf,

        /// Column holding each item's title
        #[arg(long)]
        title_column: String,

        /// Column holding each item's content
        #[arg(long)]
        content_column: String,
    },

    /// Upload a JSON array, one item per element
    Json {
        /// Path to the .json file
        file: PathBuf,

        /// Field holding each item's title
        #[arg(long)]
        title_field: String,

        /// Field holding each item's content
        #[arg(long)]
        content_field: String,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration and where each value came from
    Show,
}
