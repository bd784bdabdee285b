//! Telegram Bot API module.
//!
//! Provides the outbound chat operations behind a transport trait, the
//! HTTPS client that implements it, the update poller and rate limiting.

mod client;
mod mock;
mod poller;
mod rate_limiter;
mod transport;
mod types;

pub use client::BotApiClient;
pub use mock::{MockTransport, SentItem};
pub use poller::{PollerMessage, UpdatePoller};
pub use rate_limiter::RateLimiter;
pub use transport::{ChatTransport, InlineButton, InlineKeyboard, TelegramError};
pub use types::{CallbackQuery, Chat, Message, Update, User};
