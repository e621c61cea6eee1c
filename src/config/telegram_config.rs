use std::time::Duration;

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: Option<Box<str>>,
    pub chat_id: Box<str>,
    pub api_base: Box<str>,
    pub timeout_secs: u64,
    /// Log the alert instead of sending it
    pub dry_run: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: "@lswcoinm".into(),
            api_base: "https://api.telegram.org".into(),
            timeout_secs: 10,
            dry_run: false,
        }
    }
}

impl TelegramConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
