pub mod telegram;

pub use telegram::TelegramNotifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: bool,
    pub detail: Option<String>,
}

impl DeliveryReport {
    pub fn delivered() -> Self {
        Self {
            delivered: true,
            detail: None,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: Some(detail.into()),
        }
    }
}

/// Delivers alert text somewhere a human will see it.
///
/// Implementations never fail: transport problems come back as an undelivered report.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> DeliveryReport;
}

/// Logs the message instead of sending it.
pub struct DryRunNotifier;

#[async_trait::async_trait]
impl Notifier for DryRunNotifier {
    async fn notify(&self, message: &str) -> DeliveryReport {
        log::info!("Dry run, not sending alert:\n{}", message);
        DeliveryReport::failed("dry run")
    }
}
