//! Long-polling update loop.
//!
//! Updates are handled strictly one at a time, in arrival order. The offset
//! advances past every update before it is handled, so a crash mid-handler
//! never replays the same update.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::BotApiClient;
use super::types::Update;
use crate::commands::CommandHandler;
use crate::store::Store;

/// Pause after a failed `getUpdates` call.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Messages that can be sent to the poller.
#[derive(Debug, Clone)]
pub enum PollerMessage {
    /// Stop polling after the current update.
    Shutdown,
}

/// Feeds Bot API updates into a [`CommandHandler`].
#[derive(Debug)]
pub struct UpdatePoller {
    /// Long-poll timeout passed to `getUpdates`.
    poll_timeout_secs: u64,

    /// Attachments above this size are flagged as large files.
    max_file_bytes: u64,

    /// Next update id to request.
    offset: Option<i64>,
}

impl UpdatePoller {
    /// Creates a poller starting from the oldest pending update.
    #[must_use]
    pub const fn new(poll_timeout_secs: u64, max_file_bytes: u64) -> Self {
        Self {
            poll_timeout_secs,
            max_file_bytes,
            offset: None,
        }
    }

    /// Polls until a shutdown message arrives or the sender is dropped.
    pub async fn run<S: Store>(
        &mut self,
        handler: &CommandHandler<BotApiClient, S>,
        mut rx: mpsc::Receiver<PollerMessage>,
    ) {
        info!("Update poller started");

        loop {
            let updates = tokio::select! {
                msg = rx.recv() => {
                    match msg {
                        Some(PollerMessage::Shutdown) | None => {
                            info!("Poller shutting down");
                            break;
                        }
                    }
                }
                result = handler
                    .transport()
                    .get_updates(self.offset, self.poll_timeout_secs) => result,
            };

            let updates = match updates {
                Ok(updates) => updates,
                Err(e) => {
                    error!("Failed to fetch updates: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            self.dispatch(handler, updates).await;
        }
    }

    /// Hands a batch of updates to `handler` in order.
    ///
    /// Every callback query is answered, including ones the bot skips, so
    /// the client's loading indicator always clears.
    pub async fn dispatch<S: Store>(
        &mut self,
        handler: &CommandHandler<BotApiClient, S>,
        updates: Vec<Update>,
    ) {
        if !updates.is_empty() {
            debug!("Received {} updates", updates.len());
        }

        for update in updates {
            self.offset = Some(update.update_id.saturating_add(1));

            if let Some(query) = &update.callback_query
                && let Err(e) = handler.transport().answer_callback_query(&query.id).await
            {
                warn!("Failed to answer callback query: {}", e);
            }

            let Some(event) = update.into_event(self.max_file_bytes) else {
                debug!("Skipping unsupported update");
                continue;
            };

            handler.handle_event(&event).await;
        }
    }
}
