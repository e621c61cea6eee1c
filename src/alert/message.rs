use chrono::{DateTime, SecondsFormat, Utc};

use super::divergence::AlertDecision;
use crate::scraping::ExtractedRow;

pub fn format_status(label: &str, decision: &AlertDecision) -> String {
    format!(
        "Found APYs for {}: {}% vs {}% (diff = {:.2}%)",
        label, decision.first, decision.second, decision.difference
    )
}

pub fn format_alert(
    label: &str,
    decision: &AlertDecision,
    threshold: f64,
    source_url: &str,
    checked_at: DateTime<Utc>,
) -> String {
    format!(
        "⚠️ {label} APY difference alert: {difference:.2}%\n\
         First: {first}%\n\
         Second: {second}%\n\
         Threshold: {threshold}%\n\
         Source: {source_url}\n\
         Checked: {checked}",
        difference = decision.difference,
        first = decision.first,
        second = decision.second,
        checked = checked_at.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Lists every matched row so selector drift can be diagnosed by hand.
pub fn format_insufficient_data(label: &str, rows: &[ExtractedRow]) -> String {
    let mut report = format!(
        "⚠️ Found fewer than 2 {label} APY values.\n\
         Raw rows found that mention '{label}' (apyText may be empty):"
    );
    if rows.is_empty() {
        report.push_str("\n  (none)");
    }
    for (index, row) in rows.iter().enumerate() {
        report.push_str(&format!(
            "\n  [{}] rowText: {:?}\n       apyText: {:?}",
            index, row.row_text, row.apy_text
        ));
    }
    report
}
