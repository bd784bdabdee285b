//! Telegram Bot API client over HTTPS.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use super::transport::{ChatTransport, InlineKeyboard, TelegramError};
use super::types::{ApiResponse, SentMessage, Update};
use super::RateLimiter;

const API_BASE: &str = "https://api.telegram.org";

/// Bot API client. Owns the rate limiter that spaces every outbound call.
pub struct BotApiClient {
    http: Client,
    api_url: String,
    rate_limiter: RateLimiter,
}

impl BotApiClient {
    /// Creates a client for the given bot token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        token: &str,
        min_call_interval: Duration,
        poll_timeout_secs: u64,
    ) -> Result<Self, TelegramError> {
        let http = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(30))
            // Long polls hold the connection for the poll timeout.
            .timeout(Duration::from_secs(poll_timeout_secs.saturating_add(30)))
            .tcp_keepalive(Some(Duration::from_secs(30)))
            .build()
            .map_err(|e| TelegramError::Client(e.to_string()))?;

        Ok(Self {
            http,
            api_url: format!("{API_BASE}/bot{token}"),
            rate_limiter: RateLimiter::new(min_call_interval),
        })
    }

    /// Points the client at another API root (for testing with wiremock).
    #[cfg(test)]
    pub(crate) fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_url)
    }

    /// Calls a method with a JSON payload, without rate limiting.
    async fn post<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &serde_json::Value,
    ) -> Result<T, TelegramError> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await?;
        Self::unwrap_response(method, response).await
    }

    /// Calls a method after waiting on the rate limiter.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &serde_json::Value,
    ) -> Result<T, TelegramError> {
        let waited = self.rate_limiter.acquire().await;
        if !waited.is_zero() {
            debug!("Waited {:?} before {}", waited, method);
        }
        self.post(method, payload).await
    }

    async fn unwrap_response<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> Result<T, TelegramError> {
        // Error statuses still carry a JSON envelope with a description.
        let parsed: ApiResponse<T> = response.json().await?;

        match parsed {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                ok: true,
                result: None,
                ..
            } => Err(TelegramError::Decode(format!("{method} returned no result"))),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(TelegramError::Api {
                code: error_code.unwrap_or_default(),
                description: description.unwrap_or_else(|| format!("{method} failed")),
            }),
        }
    }

    /// Long-polls for updates after `offset`.
    ///
    /// Not rate limited: the call itself blocks for up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut payload = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(offset) = offset {
            payload["offset"] = json!(offset);
        }

        self.post("getUpdates", &payload).await
    }

    /// Acknowledges a button press so the client stops its loading indicator.
    pub async fn answer_callback_query(&self, query_id: &str) -> Result<(), TelegramError> {
        let _: bool = self
            .call("answerCallbackQuery", &json!({ "callback_query_id": query_id }))
            .await?;
        Ok(())
    }
}

impl ChatTransport for BotApiClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<i64, TelegramError> {
        info!("Sending message to chat {}: \"{}\"", chat_id, truncate_for_log(text, 50));
        let sent: SentMessage = self
            .call("sendMessage", &json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(sent.message_id)
    }

    async fn send_document(
        &self,
        chat_id: i64,
        content: Vec<u8>,
        filename: &str,
    ) -> Result<(), TelegramError> {
        info!("Sending document '{}' to chat {}", filename, chat_id);
        self.rate_limiter.acquire().await;

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", Part::bytes(content).file_name(filename.to_owned()));

        let response = self
            .http
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;
        let _: SentMessage = Self::unwrap_response("sendDocument", response).await?;
        Ok(())
    }

    async fn send_inline_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<i64, TelegramError> {
        info!(
            "Sending inline keyboard ({} buttons) to chat {}",
            keyboard.buttons().count(),
            chat_id
        );
        let sent: SentMessage = self
            .call(
                "sendMessage",
                &json!({ "chat_id": chat_id, "text": text, "reply_markup": keyboard }),
            )
            .await?;
        Ok(sent.message_id)
    }

    async fn edit_markup(
        &self,
        chat_id: i64,
        message_id: i64,
        keyboard: &InlineKeyboard,
    ) -> Result<(), TelegramError> {
        info!("Editing reply markup of message {} in chat {}", message_id, chat_id);
        // Returns the edited Message, or `true` for inline messages.
        let _: serde_json::Value = self
            .call(
                "editMessageReplyMarkup",
                &json!({ "chat_id": chat_id, "message_id": message_id, "reply_markup": keyboard }),
            )
            .await?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TelegramError> {
        info!("Deleting message {} from chat {}", message_id, chat_id);
        let _: bool = self
            .call(
                "deleteMessage",
                &json!({ "chat_id": chat_id, "message_id": message_id }),
            )
            .await?;
        Ok(())
    }

    async fn leave_chat(&self, chat_id: i64) -> Result<(), TelegramError> {
        warn!("Leaving unauthorized chat {}", chat_id);
        let _: bool = self.call("leaveChat", &json!({ "chat_id": chat_id })).await?;
        Ok(())
    }
}

impl std::fmt::Debug for BotApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The API URL embeds the token.
        f.debug_struct("BotApiClient")
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

/// Truncates a string for logging purposes.
pub(crate) fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}
