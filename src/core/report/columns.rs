use crate::core::models::cell::CellValue;
use crate::core::models::keyword::KeywordBidRecord;
use crate::core::report::{RawTable, ReportError};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Header names the report reader expects for each keyword field.
/// Matching ignores surrounding whitespace but is otherwise exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
#[builder(default, setter(into))]
pub struct ColumnContract {
    pub keyword: String,
    /// Alternate headers accepted for the keyword column
    pub keyword_aliases: Vec<String>,
    pub match_type: String,
    pub state: String,
    pub keyword_bid: String,
    pub cost_per_click: String,
    pub acos: String,
    /// Optional, when present a non empty cell overrides the batch target
    pub target_acos: String,
}

impl Default for ColumnContract {
    fn default() -> Self {
        Self {
            keyword: "Keyword".into(),
            keyword_aliases: vec!["Keyword/Automatic targeting groups".into()],
            match_type: "Match Type".into(),
            state: "State".into(),
            keyword_bid: "Keyword bid(USD)".into(),
            cost_per_click: "CPC(USD)".into(),
            acos: "ACOS".into(),
            target_acos: "Target ACOS".into(),
        }
    }
}

/// Resolved column positions for one table
struct ColumnIndex {
    keyword: usize,
    match_type: usize,
    state: usize,
    keyword_bid: usize,
    cost_per_click: usize,
    acos: usize,
    target_acos: Option<usize>,
}

fn position(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name.trim())
}

fn take(row: &[CellValue], idx: usize) -> CellValue {
    row.get(idx).cloned().unwrap_or_default()
}

impl ColumnContract {
    fn resolve(&self, headers: &[String]) -> Result<ColumnIndex, ReportError> {
        let mut missing = Vec::new();

        let keyword = std::iter::once(&self.keyword)
            .chain(self.keyword_aliases.iter())
            .find_map(|name| position(headers, name));
        if keyword.is_none() {
            missing.push(self.keyword.clone());
        }

        let mut required = |name: &String| {
            let found = position(headers, name);
            if found.is_none() {
                missing.push(name.clone());
            }
            found
        };

        let match_type = required(&self.match_type);
        let state = required(&self.state);
        let keyword_bid = required(&self.keyword_bid);
        let cost_per_click = required(&self.cost_per_click);
        let acos = required(&self.acos);

        match (keyword, match_type, state, keyword_bid, cost_per_click, acos) {
            (
                Some(keyword),
                Some(match_type),
                Some(state),
                Some(keyword_bid),
                Some(cost_per_click),
                Some(acos),
            ) => Ok(ColumnIndex {
                keyword,
                match_type,
                state,
                keyword_bid,
                cost_per_click,
                acos,
                target_acos: position(headers, &self.target_acos),
            }),
            _ => Err(ReportError::MissingColumns(missing)),
        }
    }

    /// Projects a raw table onto keyword rows. Fails when a required column
    /// is absent; rows with nothing but empty cells are dropped.
    pub fn project(&self, table: RawTable) -> Result<Vec<KeywordBidRecord>, ReportError> {
        let index = self.resolve(&table.headers)?;

        let records = table
            .rows
            .iter()
            .map(|row| KeywordBidRecord {
                keyword: take(row, index.keyword).to_text(),
                match_type: take(row, index.match_type),
                state: take(row, index.state),
                keyword_bid: take(row, index.keyword_bid),
                cost_per_click: take(row, index.cost_per_click),
                acos: take(row, index.acos),
                target_acos: index
                    .target_acos
                    .map(|idx| take(row, idx))
                    .unwrap_or_default(),
                recommended_bid: 0.0,
            })
            .filter(|record| !is_blank(record))
            .collect();

        Ok(records)
    }
}

fn is_blank(record: &KeywordBidRecord) -> bool {
    record.keyword.is_empty()
        && [
            &record.match_type,
            &record.state,
            &record.keyword_bid,
            &record.cost_per_click,
            &record.acos,
            &record.target_acos,
        ]
        .iter()
        .all(|cell| cell.is_missing())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn report_headers() -> Vec<String> {
        headers(&[
            "Keyword",
            "Match Type",
            "State",
            "Keyword bid(USD)",
            "CPC(USD)",
            "ACOS",
            "Impressions",
        ])
    }

    #[test]
    fn test_projects_rows_by_header_name() {
        let table = RawTable {
            headers: report_headers(),
            rows: vec![vec![
                CellValue::Text("shoes".into()),
                CellValue::Text("EXACT".into()),
                CellValue::Text("enabled".into()),
                CellValue::Number(0.75),
                CellValue::Text("$1.50".into()),
                CellValue::Text("-".into()),
                CellValue::Number(1200.0),
            ]],
        };

        let records = ColumnContract::default().project(table).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].keyword, "shoes");
        assert_eq!(records[0].keyword_bid, CellValue::Number(0.75));
        assert_eq!(records[0].cost_per_click, CellValue::Text("$1.50".into()));
        assert_eq!(records[0].acos, CellValue::Text("-".into()));
        assert_eq!(records[0].target_acos, CellValue::Empty);
    }

    #[test]
    fn test_reports_every_missing_column() {
        let table = RawTable {
            headers: headers(&["Keyword", "State", "ACOS"]),
            rows: vec![],
        };

        let err = ColumnContract::default().project(table).unwrap_err();

        match err {
            ReportError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["Match Type", "Keyword bid(USD)", "CPC(USD)"])
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_keyword_alias_and_target_column() {
        let table = RawTable {
            headers: headers(&[
                " Keyword/Automatic targeting groups ",
                "Match Type",
                "State",
                "Keyword bid(USD)",
                "CPC(USD)",
                "ACOS",
                "Target ACOS",
            ]),
            rows: vec![
                vec![
                    CellValue::Text("auto group".into()),
                    CellValue::Empty,
                    CellValue::Empty,
                    CellValue::Empty,
                    CellValue::Number(1.0),
                    CellValue::Number(10.0),
                    CellValue::Number(45.0),
                ],
                vec![CellValue::Text("short row".into()), CellValue::Empty],
            ],
        };

        let records = ColumnContract::default().project(table).unwrap();

        assert_eq!(records[0].keyword, "auto group");
        assert_eq!(records[0].target_acos, CellValue::Number(45.0));
        assert_eq!(records[1].keyword, "short row");
        assert_eq!(records[1].cost_per_click, CellValue::Empty);
    }

    #[test]
    fn test_drops_blank_rows() {
        let table = RawTable {
            headers: report_headers(),
            rows: vec![
                vec![CellValue::Empty; 7],
                vec![],
                vec![CellValue::Text("kept".into())],
            ],
        };

        let records = ColumnContract::default().project(table).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].keyword, "kept");
    }

    #[test]
    fn test_custom_contract() {
        let contract = ColumnContractBuilder::default()
            .keyword("Search term")
            .match_type("Match")
            .state("Status")
            .keyword_bid("Bid")
            .cost_per_click("CPC")
            .acos("ACoS")
            .build()
            .unwrap();

        let table = RawTable {
            headers: headers(&["Search term", "Match", "Status", "Bid", "CPC", "ACoS"]),
            rows: vec![vec![CellValue::Text("term".into())]],
        };

        assert_eq!(contract.project(table).unwrap()[0].keyword, "term");
    }
}
