use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderingError {
    #[error("Failed to launch rendering session")]
    Launch,
    #[error("Failed to navigate to {url}")]
    Navigation { url: String },
    #[error("Failed to evaluate in-page script")]
    Script,
    #[error("Failed to close rendering session")]
    Close,
}

/// Something that can start a fresh, isolated browser session.
#[async_trait::async_trait]
pub trait RenderingEngine: Send + Sync {
    type Session: RenderingSession;

    async fn launch(&self) -> error_stack::Result<Self::Session, RenderingError>;
}

/// The narrow slice of a live page the fetcher needs.
#[async_trait::async_trait]
pub trait RenderingSession: Send {
    async fn navigate(
        &mut self,
        url: &str,
        timeout: Duration,
    ) -> error_stack::Result<(), RenderingError>;

    /// Best effort: returning `Ok` does not guarantee the page finished rendering.
    async fn wait_for_network_idle(
        &mut self,
        timeout: Duration,
    ) -> error_stack::Result<(), RenderingError>;

    async fn wait(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn evaluate(
        &mut self,
        script: &str,
    ) -> error_stack::Result<serde_json::Value, RenderingError>;

    async fn close(self) -> error_stack::Result<(), RenderingError>
    where
        Self: Sized;
}
