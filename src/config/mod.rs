pub mod alert_config;
pub mod app_config;
pub mod scraping_config;
pub mod telegram_config;
pub mod webdriver_config;

pub use app_config::{AppConfig, ConfigError};
