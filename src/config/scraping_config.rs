use std::time::Duration;

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ScrapingConfig {
    pub url: Box<str>,
    /// Rows are kept when their text contains this, case-insensitively
    pub label: Box<str>,
    pub max_attempts: u32,
    pub base_wait_secs: f64,
    pub navigation_timeout_secs: u64,
    pub network_idle_timeout_secs: u64,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            url: "https://www.exponent.finance/income".into(),
            label: "xSOL".into(),
            max_attempts: 4,
            base_wait_secs: 2.0,
            navigation_timeout_secs: 60,
            network_idle_timeout_secs: 30,
        }
    }
}

impl ScrapingConfig {
    /// `None` when `base_wait_secs` is negative, NaN or too large for a `Duration`.
    pub fn try_base_wait(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.base_wait_secs).ok()
    }

    /// Saturates instead of panicking; validated configs never hit the fallback.
    pub fn base_wait(&self) -> Duration {
        self.try_base_wait().unwrap_or(Duration::MAX)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn network_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.network_idle_timeout_secs)
    }
}
