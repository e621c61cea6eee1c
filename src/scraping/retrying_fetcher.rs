use std::time::Duration;

use error_stack::ResultExt;
use thiserror::Error;

use super::rendering::{RenderingEngine, RenderingSession};
use super::row_extractor::{ExtractedRow, RowExtractor, RowSnapshot};
use crate::config::scraping_config::ScrapingConfig;
use crate::script::TABLE_ROWS_SCRIPT;

/// Values needed before the fetcher stops retrying.
pub const MIN_VALUES: usize = 2;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to start the browser")]
    Launch,
    #[error("Failed to navigate to {url}")]
    Navigation { url: String },
}

/// Outcome of the last extraction attempt that ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    /// Successfully parsed values, in document order
    pub values: Vec<f64>,
    /// Every row matching the label, parsed or not
    pub raw_rows: Vec<ExtractedRow>,
    /// 1-based number of the attempt that produced this result
    pub attempts: u32,
}

impl ExtractionResult {
    pub fn has_enough_values(&self) -> bool {
        self.values.len() >= MIN_VALUES
    }
}

#[derive(Debug, Clone)]
pub struct FetcherOptions {
    pub label: String,
    pub navigation_timeout: Duration,
    pub network_idle_timeout: Duration,
}

impl From<&ScrapingConfig> for FetcherOptions {
    fn from(config: &ScrapingConfig) -> Self {
        Self {
            label: config.label.to_string(),
            navigation_timeout: config.navigation_timeout(),
            network_idle_timeout: config.network_idle_timeout(),
        }
    }
}

/// Extra wait before attempt `attempt` (0-based); grows linearly, saturating at `Duration::MAX`.
pub fn attempt_wait(base_wait: Duration, attempt: u32) -> Duration {
    base_wait
        .checked_mul(attempt.saturating_add(1))
        .unwrap_or(Duration::MAX)
}

pub struct RetryingFetcher<E> {
    engine: E,
    extractor: RowExtractor,
    options: FetcherOptions,
}

impl<E: RenderingEngine> RetryingFetcher<E> {
    pub fn new(engine: E, options: FetcherOptions) -> Self {
        Self {
            extractor: RowExtractor::new(&options.label),
            engine,
            options,
        }
    }

    /// Navigates once, then extracts until at least [`MIN_VALUES`] values parse or
    /// `max_attempts` run out. Exhaustion is not an error: the last attempt's result is
    /// returned and callers check [`ExtractionResult::has_enough_values`].
    ///
    /// The browser session is closed on every path.
    pub async fn fetch(
        &self,
        url: &str,
        max_attempts: u32,
        base_wait: Duration,
    ) -> error_stack::Result<ExtractionResult, FetchError> {
        let mut session = self
            .engine
            .launch()
            .await
            .change_context(FetchError::Launch)?;

        let outcome = self
            .fetch_in_session(&mut session, url, max_attempts, base_wait)
            .await;

        if let Err(report) = session.close().await {
            log::warn!("Failed to close browser session: {:?}", report);
        }

        outcome
    }

    async fn fetch_in_session(
        &self,
        session: &mut E::Session,
        url: &str,
        max_attempts: u32,
        base_wait: Duration,
    ) -> error_stack::Result<ExtractionResult, FetchError> {
        session
            .navigate(url, self.options.navigation_timeout)
            .await
            .change_context_lazy(|| FetchError::Navigation {
                url: url.to_owned(),
            })?;

        let max_attempts = max_attempts.max(1);
        let mut latest = ExtractionResult::default();

        for attempt in 0..max_attempts {
            if let Err(report) = session
                .wait_for_network_idle(self.options.network_idle_timeout)
                .await
            {
                log::warn!("Network idle wait failed: {:?}", report);
            }

            let wait = attempt_wait(base_wait, attempt);
            log::trace!(
                "Attempt {}/{}: waiting {:?} for content",
                attempt + 1,
                max_attempts,
                wait
            );
            session.wait(wait).await;

            let rows = self.snapshot_rows(session).await;
            latest = self.parse_attempt(&rows, attempt + 1);

            if latest.has_enough_values() {
                log::info!(
                    "Attempt {}/{}: found {} value(s) in {} matching row(s)",
                    attempt + 1,
                    max_attempts,
                    latest.values.len(),
                    latest.raw_rows.len()
                );
                return Ok(latest);
            }

            log::info!(
                "Attempt {}/{}: only {} value(s) in {} matching row(s)",
                attempt + 1,
                max_attempts,
                latest.values.len(),
                latest.raw_rows.len()
            );
        }

        log::warn!(
            "Giving up after {} attempts with {} value(s)",
            max_attempts,
            latest.values.len()
        );
        Ok(latest)
    }

    /// A failed or malformed evaluation yields no rows for this attempt.
    async fn snapshot_rows(&self, session: &mut E::Session) -> Vec<RowSnapshot> {
        let value = match session.evaluate(TABLE_ROWS_SCRIPT).await {
            Ok(value) => value,
            Err(report) => {
                log::warn!("Row snapshot script failed: {:?}", report);
                return Vec::new();
            }
        };

        serde_json::from_value(value).unwrap_or_else(|error| {
            log::warn!("Unexpected row snapshot shape: {}", error);
            Vec::new()
        })
    }

    fn parse_attempt(&self, rows: &[RowSnapshot], attempt: u32) -> ExtractionResult {
        let raw_rows = self.extractor.extract(rows);

        let values = raw_rows
            .iter()
            .filter_map(|row| {
                let value = row.parse_value();
                if value.is_none() {
                    log::debug!("Unparsed row: {:?}", row);
                }
                value
            })
            .collect();

        ExtractionResult {
            values,
            raw_rows,
            attempts: attempt,
        }
    }
}
