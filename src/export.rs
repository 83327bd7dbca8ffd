//! Workspace export: per-channel history, channel directory, user directory.

use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::fs;
use tracing::info;

use crate::api::{Channel, Message, SlackClient, User};
use crate::history::{HistoryPager, DEFAULT_PAGE_SIZE, DEFAULT_PAUSE};
use crate::Result;

/// Drives one full workspace export.
///
/// The three datasets are fetched lazily and cached for the lifetime of the
/// exporter, so repeated accessor calls within one run never re-query the
/// API. Maps preserve API enumeration order; a duplicate channel or user
/// name replaces the earlier record (last write wins).
pub struct SlackExporter {
    client: SlackClient,
    page_size: u32,
    pause: Duration,
    channels: Option<IndexMap<String, Channel>>,
    users: Option<IndexMap<String, User>>,
    history: Option<IndexMap<String, Vec<Message>>>,
}

impl SlackExporter {
    pub fn new(client: SlackClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
            pause: DEFAULT_PAUSE,
            channels: None,
            users: None,
            history: None,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the inter-page pause used during history retrieval.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Channel directory keyed by channel name, fetched once and cached.
    pub async fn channels(&mut self) -> Result<&IndexMap<String, Channel>> {
        if self.channels.is_none() {
            let fetched = self.client.list_channels().await?;
            let mut map = IndexMap::new();
            for channel in fetched {
                map.insert(channel.name.clone(), channel);
            }
            info!(count = map.len(), "Fetched channel directory");
            self.channels = Some(map);
        }

        // Populated above; the fallback closure never runs.
        Ok(self.channels.get_or_insert_with(IndexMap::new))
    }

    /// User directory keyed by user name, fetched once and cached.
    pub async fn users(&mut self) -> Result<&IndexMap<String, User>> {
        if self.users.is_none() {
            let fetched = self.client.list_users().await?;
            let mut map = IndexMap::new();
            for user in fetched {
                map.insert(user.name.clone(), user);
            }
            info!(count = map.len(), "Fetched user directory");
            self.users = Some(map);
        }

        Ok(self.users.get_or_insert_with(IndexMap::new))
    }

    /// Full message history keyed by channel name, one pagination run per
    /// channel in directory order, built once and cached.
    pub async fn history(&mut self) -> Result<&IndexMap<String, Vec<Message>>> {
        if self.history.is_none() {
            let targets: Vec<(String, String)> = self
                .channels()
                .await?
                .iter()
                .map(|(name, channel)| (name.clone(), channel.id.clone()))
                .collect();

            let pager = HistoryPager::new(&self.client)
                .with_page_size(self.page_size)
                .with_pause(self.pause);

            let mut map = IndexMap::new();
            for (name, id) in targets {
                let messages = pager.fetch_all(&id, &name).await?;
                map.insert(name, messages);
            }
            self.history = Some(map);
        }

        Ok(self.history.get_or_insert_with(IndexMap::new))
    }

    /// Write the whole export under `output_dir`:
    ///
    /// ```text
    /// <output_dir>/channels/<name>.json   message array per channel
    /// <output_dir>/channels.json          channel directory
    /// <output_dir>/users.json             user directory
    /// ```
    ///
    /// Existing files are overwritten. The first filesystem error aborts the
    /// remaining writes; files already written stay on disk.
    pub async fn export_all(&mut self, output_dir: &Path) -> Result<()> {
        self.history().await?;
        self.users().await?;

        let channels_dir = output_dir.join("channels");
        fs::create_dir_all(&channels_dir).await?;

        if let Some(history) = &self.history {
            for (name, messages) in history {
                write_json(&channels_dir.join(format!("{}.json", name)), messages).await?;
            }
        }
        if let Some(channels) = &self.channels {
            write_json(&output_dir.join("channels.json"), channels).await?;
        }
        if let Some(users) = &self.users {
            write_json(&output_dir.join("users.json"), users).await?;
        }

        Ok(())
    }
}

/// Write a value as UTF-8 JSON, pretty-printed with 4-space indentation.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    fs::write(path, buf).await?;
    info!(path = %path.display(), "Wrote file");

    Ok(())
}
