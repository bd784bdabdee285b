//! Command handling module.
//!
//! Authorizes, filters and routes owner messages and settings button presses,
//! executing commands against the persisted state.

mod activity_log;
mod cleanup_list;
mod handler;
mod settings;
mod tasks;
mod types;

pub use activity_log::read_log_tail;
pub use cleanup_list::cleanup_list_report;
pub use handler::{BotError, CommandHandler, UNAUTHORIZED_NOTICE};
pub use settings::{settings_keyboard, status_text};
pub use tasks::{EchoProcessor, TaskError, TaskProcessor, failed_tasks_report, source_link};
pub use types::{BotCommand, CommandResult, IndexError, parse_index};
