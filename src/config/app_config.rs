use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use error_stack::{Report, ResultExt};
use thiserror::Error;

use super::{
    alert_config::AlertConfig, scraping_config::ScrapingConfig, telegram_config::TelegramConfig,
    webdriver_config::WebDriverConfig,
};

pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const ENV_PREFIX: &str = "APY_WATCH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration sources")]
    Read,
    #[error("Failed to deserialize configuration (field path: {path})")]
    Deserialize { path: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scraping: ScrapingConfig,
    #[serde(default)]
    pub webdriver: WebDriverConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

impl AppConfig {
    /// Loads the configuration from the optional config file named by `CONFIG_PATH`
    /// (default `Config`), `APY_WATCH_*` environment variables and `BOT_TOKEN`.
    pub fn load() -> error_stack::Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "Config".to_string());
        log::debug!("Loading configuration from '{}' (optional)", config_path);

        let builder = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("telegram.bot_token", std::env::var(BOT_TOKEN_VAR).ok())
            .change_context(ConfigError::Read)?;

        Self::from_builder(builder)
            .attach_printable_lazy(|| format!("Config file: {}", config_path))
    }

    pub fn from_builder(
        builder: ConfigBuilder<DefaultState>,
    ) -> error_stack::Result<Self, ConfigError> {
        let config = builder.build().change_context(ConfigError::Read)?;

        let app_config: AppConfig = serde_path_to_error::deserialize(config).map_err(|error| {
            let path = error.path().to_string();
            Report::new(error.into_inner()).change_context(ConfigError::Deserialize { path })
        })?;

        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> error_stack::Result<(), ConfigError> {
        let invalid = |message: &str| Err(Report::new(ConfigError::Invalid(message.to_owned())));

        if self.scraping.max_attempts == 0 {
            return invalid("scraping.max_attempts must be at least 1");
        }
        let longest_wait = self
            .scraping
            .try_base_wait()
            .and_then(|base_wait| base_wait.checked_mul(self.scraping.max_attempts));
        if longest_wait.is_none() {
            return invalid(
                "scraping.base_wait_secs must be a non-negative number of seconds \
                 whose longest attempt wait fits a Duration",
            );
        }
        if self.scraping.label.trim().is_empty() {
            return invalid("scraping.label must not be empty");
        }
        if !self.alert.threshold.is_finite() || self.alert.threshold < 0.0 {
            return invalid("alert.threshold must be a non-negative number");
        }
        let has_token = self
            .telegram
            .bot_token
            .as_deref()
            .is_some_and(|token| !token.is_empty());
        if !has_token && !self.telegram.dry_run {
            return Err(Report::new(ConfigError::Invalid(
                "telegram.bot_token is required unless telegram.dry_run is set".to_owned(),
            ))
            .attach_printable(format!("Set the {} environment variable", BOT_TOKEN_VAR)));
        }

        Ok(())
    }
}
