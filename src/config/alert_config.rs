#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AlertConfig {
    /// Percentage points
    pub threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { threshold: 3.0 }
    }
}
