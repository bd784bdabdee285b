//! Status summary, settings menu and the toggle callback handler.

use tracing::{info, warn};

use super::handler::{BotError, CommandHandler};
use super::types::BotCommand;
use crate::event::CallbackEvent;
use crate::store::{BotConfig, Store, Toggle, on_off};
use crate::telegram::{ChatTransport, InlineButton, InlineKeyboard};

const SETTINGS_MENU_TEXT: &str = "⚙️ Bot Settings (Persistent)\n\
     Click a button to toggle the setting. The status updates instantly.";

/// Two-row toggle keyboard showing the live state of both toggles.
#[must_use]
pub fn settings_keyboard(config: &BotConfig) -> InlineKeyboard {
    InlineKeyboard::single_column(Toggle::ALL.map(|toggle| {
        InlineButton::callback(
            format!("{}: {}", toggle.label(), on_off(config.flag(toggle))),
            toggle.callback_data(),
        )
    }))
}

/// Status summary shown by `/start`.
#[must_use]
pub fn status_text(config: &BotConfig) -> String {
    let mut lines = vec![
        "🤖 Private Bot Status".to_owned(),
        String::new(),
        format!(
            "File Filter: {} (Only Photo/Video allowed)",
            on_off(config.photo_video_only_enabled)
        ),
        format!("Sticker Block: {}", on_off(config.sticker_block_enabled)),
        format!("Cleanup Phrases: {}", config.cleanup_strings.len()),
        String::new(),
        "--- Commands ---".to_owned(),
    ];

    for (cmd, desc) in BotCommand::all_commands() {
        lines.push(format!("- {cmd} - {desc}"));
    }

    lines.join("\n")
}

impl<T: ChatTransport, S: Store> CommandHandler<T, S> {
    pub(super) fn status_text(&self) -> Result<String, BotError> {
        Ok(status_text(&self.store.load_config()?))
    }

    /// Sends the toggle menu and returns its message id.
    pub async fn send_settings_menu(&self, chat_id: i64) -> Result<i64, BotError> {
        let config = self.store.load_config()?;
        let message_id = self
            .transport
            .send_inline_keyboard(chat_id, SETTINGS_MENU_TEXT, &settings_keyboard(&config))
            .await?;
        Ok(message_id)
    }

    /// Handles a settings button press: flips the toggle, re-renders the
    /// keyboard from freshly loaded state and confirms the new value.
    pub async fn handle_callback(&self, callback: &CallbackEvent) -> Result<(), BotError> {
        let chat_id = callback.chat_id;

        if !self.is_owner(callback.from_user_id) {
            warn!(
                "Ignoring button press from {:?} in chat {}",
                callback.from_user_id, chat_id
            );
            self.send_unauthorized_notice(chat_id).await;
            return Ok(());
        }

        let Some(toggle) = Toggle::from_callback_data(&callback.data) else {
            warn!("Unknown callback payload: {:?}", callback.data);
            self.transport.send_text(chat_id, "❓ Unknown action.").await?;
            return Ok(());
        };

        let enabled = !self.store.flag(toggle)?;
        if let Err(e) = self.store.set_flag(toggle, enabled) {
            warn!("Failed to save {}: {}", toggle.config_key(), e);
        }
        info!("{} set to {}", toggle.config_key(), on_off(enabled));

        let config = self.store.load_config()?;
        self.transport
            .edit_markup(chat_id, callback.message_id, &settings_keyboard(&config))
            .await?;

        self.transport
            .send_text(
                chat_id,
                &format!("✅ {} set to {}", toggle.label(), on_off(enabled)),
            )
            .await?;
        Ok(())
    }
}
