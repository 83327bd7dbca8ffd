//! Slack Workspace Exporter Library
//!
//! This library provides tools to:
//! - Walk a channel's full message history through the cursor-based
//!   `channels.history` API, throttling between pages
//! - Snapshot the channel roster and user directory of a workspace
//! - Write everything to disk as pretty-printed JSON for archival
//!   or migration

pub mod api;
pub mod error;
pub mod export;
pub mod history;

// Re-export common types
pub use api::{Channel, HistoryPage, Message, SlackClient, User};
pub use error::{Error, Result};
pub use export::SlackExporter;
pub use history::{HistoryPager, DEFAULT_PAGE_SIZE, DEFAULT_PAUSE};
