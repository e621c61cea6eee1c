use super::formatting::percent::parse_percent;

/// Zero-based position of the APY column in the fixed table layout.
///
/// Positional and therefore fragile: if the table gains or loses a column the fast path stops
/// matching and every row falls through to the descendant scan.
pub const APY_CELL_INDEX: usize = 3;

/// Visible text of one `tr` as reported by the in-page script.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct RowSnapshot {
    pub text: String,
    pub cells: Vec<String>,
    /// Every descendant element of the row, in document order
    pub descendants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRow {
    pub row_text: String,
    /// Empty when neither the APY cell nor any descendant carried a `%`
    pub apy_text: String,
}

impl ExtractedRow {
    /// Parses the APY candidate first, then the whole row text.
    pub fn parse_value(&self) -> Option<f64> {
        parse_percent(&self.apy_text).or_else(|| parse_percent(&self.row_text))
    }
}

pub struct RowExtractor {
    label_lowercase: String,
}

impl RowExtractor {
    pub fn new(label: &str) -> Self {
        Self {
            label_lowercase: label.to_lowercase(),
        }
    }

    pub fn matches(&self, row: &RowSnapshot) -> bool {
        row.text.to_lowercase().contains(&self.label_lowercase)
    }

    /// Keeps rows mentioning the label, in document order, including those without a usable
    /// APY candidate.
    pub fn extract(&self, rows: &[RowSnapshot]) -> Vec<ExtractedRow> {
        rows.iter()
            .filter(|row| self.matches(row))
            .map(|row| {
                let extracted = ExtractedRow {
                    row_text: row.text.trim().to_owned(),
                    apy_text: find_apy_text(row),
                };
                log::trace!("Matched row: {:?}", extracted);
                extracted
            })
            .collect()
    }
}

fn find_apy_text(row: &RowSnapshot) -> String {
    let cell_candidate = row
        .cells
        .get(APY_CELL_INDEX)
        .map(|cell| cell.trim())
        .filter(|cell| cell.contains('%'));

    if let Some(cell) = cell_candidate {
        return cell.to_owned();
    }

    row.descendants
        .iter()
        .map(|text| text.trim())
        .find(|text| text.contains('%'))
        .unwrap_or_default()
        .to_owned()
}
