use std::fmt;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use error_stack::{Report, ResultExt};
use fantoccini::{wd::TimeoutConfiguration, Client, ClientBuilder};
use tokio::time::Instant;

use super::rendering::{RenderingEngine, RenderingError, RenderingSession};
use crate::config::webdriver_config::WebDriverConfig;
use crate::script::NETWORK_ACTIVITY_SCRIPT;

const CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(500);
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const NAVIGATION_GRACE: Duration = Duration::from_secs(5);

fn random_port() -> u16 {
    rand::random::<u16>() % (65535 - 1024) + 1024
}

fn spawn_geckodriver_process(
    geckodriver_path: &str,
    port: u16,
) -> error_stack::Result<Child, RenderingError> {
    Command::new(geckodriver_path)
        .arg("--port")
        .arg(port.to_string())
        .arg("--log")
        .arg("fatal")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .change_context(RenderingError::Launch)
        .attach_printable_lazy(|| format!("Failed to start {}", geckodriver_path))
}

fn firefox_capabilities(config: &WebDriverConfig) -> serde_json::Map<String, serde_json::Value> {
    let args: Vec<&str> = if config.headless {
        vec!["-headless"]
    } else {
        Vec::new()
    };

    let mut capabilities = serde_json::Map::new();
    capabilities.insert(
        "moz:firefoxOptions".to_owned(),
        serde_json::json!({
            "args": args,
            "prefs": { "general.useragent.override": config.user_agent.as_ref() },
        }),
    );
    capabilities
}

async fn create_and_configure_client(
    port: u16,
    config: &WebDriverConfig,
) -> error_stack::Result<Client, RenderingError> {
    let webdriver_url = format!("http://localhost:{}", port);
    let capabilities = firefox_capabilities(config);

    let mut attempt = 1;
    loop {
        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities.clone());

        match builder.connect(&webdriver_url).await {
            Ok(client) => return Ok(client),
            Err(error) if attempt < CONNECT_ATTEMPTS => {
                // geckodriver may still be booting
                log::trace!(
                    "Connecting to geckodriver on port {} failed (attempt {}): {}",
                    port,
                    attempt,
                    error
                );
                attempt += 1;
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
            Err(error) => {
                return Err(Report::new(error)
                    .change_context(RenderingError::Launch)
                    .attach_printable(format!(
                        "Failed to connect to geckodriver on port {} after {} attempts",
                        port, CONNECT_ATTEMPTS
                    )));
            }
        }
    }
}

/// Launches a headless Firefox through a private geckodriver process per session.
pub struct GeckodriverEngine {
    config: WebDriverConfig,
}

impl GeckodriverEngine {
    pub fn new(config: WebDriverConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl RenderingEngine for GeckodriverEngine {
    type Session = FantocciniSession;

    async fn launch(&self) -> error_stack::Result<FantocciniSession, RenderingError> {
        let port = random_port();
        log::debug!("Spawning geckodriver on port {}", port);

        let mut driver_process = spawn_geckodriver_process(&self.config.geckodriver_path, port)?;

        let client = match create_and_configure_client(port, &self.config).await {
            Ok(client) => client,
            Err(report) => {
                kill_process(&mut driver_process);
                return Err(report);
            }
        };

        Ok(FantocciniSession {
            driver_process: Some(driver_process),
            client,
        })
    }
}

fn kill_process(process: &mut Child) {
    process
        .kill()
        .unwrap_or_else(|error| log::error!("Failed to kill geckodriver process: {}", error));
    let _ = process.wait();
}

pub struct FantocciniSession {
    driver_process: Option<Child>,
    client: Client,
}

impl fmt::Debug for FantocciniSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FantocciniSession").finish()
    }
}

impl FantocciniSession {
    fn kill_driver(&mut self) {
        if let Some(mut process) = self.driver_process.take() {
            kill_process(&mut process);
        }
    }
}

/// One poll of `NETWORK_ACTIVITY_SCRIPT`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
struct NetworkActivity(String, u64);

impl NetworkActivity {
    /// Loaded, and no resource entries were added since the previous poll.
    fn is_idle_since(&self, previous: Option<&NetworkActivity>) -> bool {
        self.0 == "complete" && previous.is_some_and(|previous| previous.1 == self.1)
    }
}

#[async_trait::async_trait]
impl RenderingSession for FantocciniSession {
    async fn navigate(
        &mut self,
        url: &str,
        timeout: Duration,
    ) -> error_stack::Result<(), RenderingError> {
        let navigation_error = || RenderingError::Navigation {
            url: url.to_owned(),
        };

        self.client
            .update_timeouts(TimeoutConfiguration::new(
                Some(timeout),
                Some(timeout),
                Some(Duration::ZERO),
            ))
            .await
            .change_context_lazy(navigation_error)?;

        log::trace!("Navigating to {}", url);
        tokio::time::timeout(timeout + NAVIGATION_GRACE, self.client.goto(url))
            .await
            .map_err(|_| {
                Report::new(navigation_error())
                    .attach_printable(format!("Timed out after {:?}", timeout))
            })?
            .change_context_lazy(navigation_error)?;

        log::trace!("Page loaded successfully");
        Ok(())
    }

    async fn wait_for_network_idle(
        &mut self,
        timeout: Duration,
    ) -> error_stack::Result<(), RenderingError> {
        let deadline = Instant::now() + timeout;
        let mut previous: Option<NetworkActivity> = None;

        loop {
            let value = self
                .client
                .execute(NETWORK_ACTIVITY_SCRIPT, Vec::new())
                .await
                .change_context(RenderingError::Script)?;
            let activity: NetworkActivity = serde_json::from_value(value)
                .change_context(RenderingError::Script)
                .attach_printable("Unexpected network activity poll result")?;

            if activity.is_idle_since(previous.as_ref()) {
                log::trace!("Network idle ({} resources)", activity.1);
                return Ok(());
            }

            if Instant::now() >= deadline {
                log::warn!(
                    "Network did not settle within {:?}, continuing anyway",
                    timeout
                );
                return Ok(());
            }

            previous = Some(activity);
            tokio::time::sleep(IDLE_POLL_INTERVAL).await;
        }
    }

    async fn evaluate(
        &mut self,
        script: &str,
    ) -> error_stack::Result<serde_json::Value, RenderingError> {
        self.client
            .execute(script, Vec::new())
            .await
            .change_context(RenderingError::Script)
    }

    async fn close(mut self) -> error_stack::Result<(), RenderingError> {
        log::info!("Closing browser session");
        let result = self
            .client
            .clone()
            .close()
            .await
            .change_context(RenderingError::Close);

        self.kill_driver();
        result
    }
}

impl Drop for FantocciniSession {
    fn drop(&mut self) {
        // Only reached with a live process when `close` was skipped
        self.kill_driver();
    }
}
