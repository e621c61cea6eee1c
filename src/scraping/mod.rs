pub mod formatting;
pub mod rendering;
pub mod retrying_fetcher;
pub mod row_extractor;
pub mod scraper_driver;

#[cfg(test)]
pub(crate) mod testing;

pub use rendering::{RenderingEngine, RenderingError, RenderingSession};
pub use retrying_fetcher::{ExtractionResult, FetchError, FetcherOptions, RetryingFetcher};
pub use row_extractor::{ExtractedRow, RowExtractor, RowSnapshot};
pub use scraper_driver::GeckodriverEngine;
