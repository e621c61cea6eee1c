#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WebDriverConfig {
    pub geckodriver_path: Box<str>,
    pub headless: bool,
    pub user_agent: Box<str>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            geckodriver_path: "geckodriver".into(),
            headless: true,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                .into(),
        }
    }
}
