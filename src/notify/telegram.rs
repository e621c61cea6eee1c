use error_stack::{Report, ResultExt};
use thiserror::Error;

use super::{DeliveryReport, Notifier};
use crate::config::telegram_config::TelegramConfig;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram bot token is not configured")]
    MissingToken,
    #[error("Failed to build HTTP client")]
    Client,
}

#[derive(Debug, serde::Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    /// Contains the bot token; never log it
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> error_stack::Result<Self, TelegramError> {
        let token = config
            .bot_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Report::new(TelegramError::MissingToken))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .change_context(TelegramError::Client)?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.api_base.trim_end_matches('/'),
                token
            ),
            chat_id: config.chat_id.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> DeliveryReport {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text: message,
        };

        let response = match self.client.post(&self.endpoint).json(&payload).send().await {
            Ok(response) => response,
            Err(error) => {
                let error = error.without_url();
                log::error!("Failed to send telegram message: {}", error);
                return DeliveryReport::failed(error.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Failed to send telegram message: HTTP {} {}", status, body);
            return DeliveryReport::failed(format!("HTTP {}: {}", status, body));
        }

        log::debug!("Telegram message delivered to {}", self.chat_id);
        DeliveryReport::delivered()
    }
}
