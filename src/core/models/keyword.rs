use crate::core::models::cell::CellValue;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// One keyword or targeting group row of an advertising report, augmented
/// with the batch target ACOS and the recommended bid.
///
/// Field renames are the output column contract, and their declaration
/// order is the column order of both the JSON and the HTML table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Builder)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct KeywordBidRecord {
    #[serde(rename = "Keyword/Automatic targeting groups")]
    pub keyword: String,
    #[serde(rename = "Match Type")]
    pub match_type: CellValue,
    #[serde(rename = "State")]
    pub state: CellValue,
    #[serde(rename = "Keyword bid(USD)")]
    pub keyword_bid: CellValue,
    #[serde(rename = "CPC(USD)")]
    pub cost_per_click: CellValue,
    #[serde(rename = "ACOS")]
    pub acos: CellValue,
    #[serde(rename = "Target ACOS")]
    pub target_acos: CellValue,
    #[serde(rename = "New Max Bid")]
    pub recommended_bid: f64,
}

impl KeywordBidRecord {
    /// Output column headers, in serialization order
    pub const COLUMNS: [&'static str; 8] = [
        "Keyword/Automatic targeting groups",
        "Match Type",
        "State",
        "Keyword bid(USD)",
        "CPC(USD)",
        "ACOS",
        "Target ACOS",
        "New Max Bid",
    ];

    /// Assigns the batch target ACOS unless the row carries its own
    pub fn inject_target_acos(&mut self, default_target_acos: f64) {
        if self.target_acos.is_missing() {
            self.target_acos = CellValue::Number(default_target_acos);
        }
    }

    /// Cells in [`Self::COLUMNS`] order, the recommended bid formatted to cents
    pub fn display_cells(&self) -> [String; 8] {
        [
            self.keyword.clone(),
            self.match_type.to_text(),
            self.state.to_text(),
            self.keyword_bid.to_text(),
            self.cost_per_click.to_text(),
            self.acos.to_text(),
            self.target_acos.to_text(),
            format!("{:.2}", self.recommended_bid),
        ]
    }
}
