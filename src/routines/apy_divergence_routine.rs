use std::time::Duration;

use error_stack::ResultExt;

use super::routine::{Routine, RoutineError};
use crate::alert::message::{format_alert, format_insufficient_data, format_status};
use crate::alert::{evaluate, AlertDecision};
use crate::config::AppConfig;
use crate::notify::{DeliveryReport, Notifier};
use crate::scraping::{ExtractionResult, FetcherOptions, RenderingEngine, RetryingFetcher};

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Fewer than two values parsed after every attempt
    InsufficientData { result: ExtractionResult },
    BelowThreshold { decision: AlertDecision },
    Alerted {
        decision: AlertDecision,
        report: DeliveryReport,
    },
}

impl RunOutcome {
    /// Human-readable status for stdout.
    pub fn render(&self, label: &str) -> String {
        match self {
            RunOutcome::InsufficientData { result } => {
                format_insufficient_data(label, &result.raw_rows)
            }
            RunOutcome::BelowThreshold { decision } => format!(
                "{}\nDifference below threshold; no alert.",
                format_status(label, decision)
            ),
            RunOutcome::Alerted { decision, report } if report.delivered => format!(
                "{}\nAlert sent to Telegram.",
                format_status(label, decision)
            ),
            RunOutcome::Alerted { decision, report } => format!(
                "{}\nAlert not delivered: {}",
                format_status(label, decision),
                report.detail.as_deref().unwrap_or("unknown reason")
            ),
        }
    }
}

/// One check of the configured page: fetch the label's APYs, compare the first two, and
/// alert when they diverge by at least the threshold.
pub struct ApyDivergenceRoutine<E, N> {
    fetcher: RetryingFetcher<E>,
    notifier: N,
    url: String,
    label: String,
    max_attempts: u32,
    base_wait: Duration,
    threshold: f64,
}

impl<E: RenderingEngine, N: Notifier> ApyDivergenceRoutine<E, N> {
    pub fn new(config: &AppConfig, engine: E, notifier: N) -> Self {
        Self {
            fetcher: RetryingFetcher::new(engine, FetcherOptions::from(&config.scraping)),
            notifier,
            url: config.scraping.url.to_string(),
            label: config.scraping.label.to_string(),
            max_attempts: config.scraping.max_attempts,
            base_wait: config.scraping.base_wait(),
            threshold: config.alert.threshold,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    async fn alert(&self, decision: &AlertDecision) -> DeliveryReport {
        let message = format_alert(
            &self.label,
            decision,
            self.threshold,
            &self.url,
            chrono::Utc::now(),
        );

        let report = self.notifier.notify(&message).await;
        if report.delivered {
            log::info!("Alert delivered");
        } else {
            log::warn!(
                "Alert not delivered: {}",
                report.detail.as_deref().unwrap_or("unknown reason")
            );
        }
        report
    }
}

#[async_trait::async_trait]
impl<E: RenderingEngine, N: Notifier> Routine<RunOutcome> for ApyDivergenceRoutine<E, N> {
    fn name(&self) -> &str {
        "APY divergence"
    }

    async fn run(&self) -> error_stack::Result<RunOutcome, RoutineError> {
        let result = self
            .fetcher
            .fetch(&self.url, self.max_attempts, self.base_wait)
            .await
            .change_context_lazy(|| RoutineError::routine_failure("fetching APY values"))?;

        let Some(decision) = evaluate(&result.values, self.threshold) else {
            log::warn!(
                "Only {} {} APY value(s) after {} attempt(s)",
                result.values.len(),
                self.label,
                result.attempts
            );
            return Ok(RunOutcome::InsufficientData { result });
        };

        log::info!("{}", format_status(&self.label, &decision));

        if !decision.should_alert {
            return Ok(RunOutcome::BelowThreshold { decision });
        }

        let report = self.alert(&decision).await;
        Ok(RunOutcome::Alerted { decision, report })
    }
}
