use std::sync::LazyLock;

use regex::Regex;

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([-+]?\d+(?:\.\d+)?)\s*%").expect("percent pattern should compile")
});

/// Returns the first signed decimal followed by a `%` in `text`, if any.
///
/// Only the leftmost match is considered, e.g. `"Fixed APY: 44.80% (was 40%)"` gives `44.80`.
pub fn parse_percent(text: &str) -> Option<f64> {
    let captures = PERCENT_RE.captures(text)?;
    let number = captures.get(1)?.as_str();

    number
        .parse::<f64>()
        .map_err(|error| log::trace!("Failed to parse percent {:?}: {}", number, error))
        .ok()
}
