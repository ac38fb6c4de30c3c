use serde::{Deserialize, Serialize};
use std::fmt;

/// Markers a spreadsheet reader treats as a missing value rather than text
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single report cell as delivered by a report reader or an API caller.
///
/// Serializes untagged, so a record round-trips to the same JSON shape
/// the report had: numbers stay numbers, text stays text and missing
/// cells become `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Infers a cell from raw report text. Blank cells and NA markers are
    /// `Empty`, finite numeric text is a `Number`, everything else
    /// (including `$1.50`, `12%` and `-`) stays `Text`.
    pub fn infer(raw: &str) -> CellValue {
        if NA_MARKERS.contains(&raw.trim()) {
            return CellValue::Empty;
        }

        match raw.trim().parse::<f64>() {
            Ok(num) if num.is_finite() => CellValue::Number(num),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Missing in the dataframe sense: an empty cell or a NaN number
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(num) => num.is_nan(),
            CellValue::Text(_) => false,
        }
    }

    /// Cell rendered as plain text, empty string when missing
    pub fn to_text(&self) -> String {
        if self.is_missing() {
            return String::new();
        }

        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(num) => write!(f, "{}", num),
            CellValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}
