//! Terminal User Interface module for kadmin
//!
//! A keyboard-driven console with three tabs (Knowledge Base, Add Knowledge,
//! Upload Files) on top of the [`crate::console`] controller. Requests run on
//! the tokio runtime and their outcomes are applied on the UI task.

#[cfg(feature = "tui")]
mod app;
#[cfg(feature = "tui")]
mod notifications;
#[cfg(feature = "tui")]
mod views;

#[cfg(feature = "tui")]
pub use app::{TuiApp, run_tui};
#[cfg(feature = "tui")]
pub use notifications::{HistoryEntry, NotificationManager, Toast};
#[cfg(feature = "tui")]
pub use views::{KnowledgeFormView, KnowledgeListView, UploadFormsView};
