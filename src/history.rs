//! Cursor pagination over a channel's full message history.

use std::time::Duration;

use tracing::{info, warn};

use crate::api::{Message, SlackClient};
use crate::{Error, Result};

/// Messages requested per page. Slack accepts up to 1000 for history calls.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Pause between successive page requests, to stay under API rate limits.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(500);

/// Walks `channels.history` oldest-ward until the API reports no more pages.
///
/// Each page is returned newest-first; pages are appended in fetch order, so
/// the accumulated result is the whole history newest-first without any
/// re-sorting. The cursor is always the `ts` of the last (oldest) message of
/// the most recent non-empty page.
#[derive(Debug, Clone)]
pub struct HistoryPager<'a> {
    client: &'a SlackClient,
    page_size: u32,
    pause: Duration,
}

impl<'a> HistoryPager<'a> {
    pub fn new(client: &'a SlackClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
            pause: DEFAULT_PAUSE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Override the inter-page pause. Tests use `Duration::ZERO`.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Fetch the complete history of one channel. The channel name is only
    /// used for progress logging.
    pub async fn fetch_all(&self, channel_id: &str, channel_name: &str) -> Result<Vec<Message>> {
        if channel_id.trim().is_empty() {
            return Err(Error::InvalidArgument("channel id is empty".to_string()));
        }

        let mut latest: Option<String> = None;
        let mut messages: Vec<Message> = Vec::new();

        loop {
            let page = self
                .client
                .history_page(channel_id, self.page_size, latest.as_deref())
                .await?;

            let page_len = page.messages.len();
            messages.extend(page.messages);

            info!(
                channel = %channel_name,
                total = messages.len(),
                "Retrieved messages"
            );

            if page_len == 0 {
                // An empty page with has_more set would never advance the
                // cursor; stop instead of looping forever.
                if page.has_more {
                    warn!(
                        channel = %channel_name,
                        "Empty page with has_more set, stopping pagination"
                    );
                }
                break;
            }

            // Last message of the page just appended is the oldest seen.
            latest = messages.last().map(|m| m.ts.clone());

            if !page.has_more {
                break;
            }

            tokio::time::sleep(self.pause).await;
        }

        Ok(messages)
    }
}
