use crate::core::bidding::BidError;
use crate::core::bidding::formula::BidInputs;
use crate::core::models::cell::CellValue;
use crate::core::models::keyword::KeywordBidRecord;
use tracing::debug;

/// Bid computation that reports why a row could not be priced.
///
/// Normalization and the formula run as separate steps, so each failure
/// mode surfaces as its own [`BidError`] variant.
pub fn try_compute_new_max_bid(
    cost_per_click: &CellValue,
    observed_acos: &CellValue,
    target_acos: &CellValue,
) -> Result<f64, BidError> {
    BidInputs::normalize(cost_per_click, observed_acos, target_acos)?.new_max_bid()
}

/// Recommended new max bid for one keyword. Never fails: any
/// normalization or arithmetic error collapses to a bid of `0`.
pub fn compute_new_max_bid(
    cost_per_click: &CellValue,
    observed_acos: &CellValue,
    target_acos: &CellValue,
) -> f64 {
    try_compute_new_max_bid(cost_per_click, observed_acos, target_acos).unwrap_or_else(|e| {
        debug!("Bid fell back to 0: {}", e);
        0.0
    })
}

/// Prices the rows of one report batch
#[derive(Debug, Clone, Copy)]
pub struct BidRecalculator {
    default_target_acos: f64,
}

impl BidRecalculator {
    pub fn new(default_target_acos: f64) -> Self {
        Self {
            default_target_acos,
        }
    }

    /// Fills the row's target ACOS from the batch default when absent, then
    /// assigns its recommended bid. The row always ends up with a bid; the
    /// returned error only tells the caller that bid is the `0` fallback.
    pub fn apply(&self, record: &mut KeywordBidRecord) -> Result<f64, BidError> {
        record.inject_target_acos(self.default_target_acos);

        let outcome =
            try_compute_new_max_bid(&record.cost_per_click, &record.acos, &record.target_acos);

        record.recommended_bid = match &outcome {
            Ok(bid) => *bid,
            Err(e) => {
                debug!("Bid for keyword '{}' fell back to 0: {}", record.keyword, e);
                0.0
            }
        };

        outcome
    }
}

/// Attaches a recommended bid to every row, using `default_target_acos`
/// for rows which carry no target of their own
pub fn recompute<I>(rows: I, default_target_acos: f64) -> impl Iterator<Item = KeywordBidRecord>
where
    I: IntoIterator<Item = KeywordBidRecord>,
{
    rows.into_iter().map(move |mut record| {
        record.inject_target_acos(default_target_acos);
        record.recommended_bid =
            compute_new_max_bid(&record.cost_per_click, &record.acos, &record.target_acos);
        record
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bidding::formula::round_cents;
    use crate::core::bidding::normalize::BidField;
    use crate::core::models::keyword::KeywordBidRecordBuilder;

    /// Fraction of target that keeps a keyword safely on the uplift side
    const WELL_UNDER_TARGET: f64 = 0.5;

    fn text(raw: &str) -> CellValue {
        CellValue::Text(raw.to_string())
    }

    fn num(value: f64) -> CellValue {
        CellValue::Number(value)
    }

    #[test]
    fn test_concrete_scenarios() {
        assert_eq!(compute_new_max_bid(&num(1.0), &num(10.0), &num(30.0)), 1.2);
        assert_eq!(compute_new_max_bid(&num(2.0), &num(40.0), &num(30.0)), 1.5);
        assert_eq!(compute_new_max_bid(&text("$1.50"), &text("-"), &num(30.0)), 1.8);
        assert_eq!(compute_new_max_bid(&num(0.0), &num(0.0), &num(30.0)), 0.0);
        assert_eq!(compute_new_max_bid(&text("abc"), &num(10.0), &num(30.0)), 0.0);
    }

    #[test]
    fn test_uplift_property_holds_across_grid() {
        for cpc in [0.0, 0.37, 1.0, 2.49, 10.0] {
            for target in [5.0, 30.0, 75.0] {
                let acos = WELL_UNDER_TARGET * target;
                let bid = compute_new_max_bid(&num(cpc), &num(acos), &num(target));

                assert_eq!(bid, round_cents(cpc * 1.2), "cpc {} acos {} target {}", cpc, acos, target);
            }
        }
    }

    #[test]
    fn test_proportional_property_holds_across_grid() {
        for cpc in [0.0, 0.37, 1.0, 2.49, 10.0] {
            for (acos, target) in [(40.0, 30.0), (25.2, 30.0), (100.0, 10.0), (12.5, 12.5)] {
                let bid = compute_new_max_bid(&num(cpc), &num(acos), &num(target));

                assert_eq!(bid, round_cents((cpc / acos) * target));
            }
        }
    }

    #[test]
    fn test_sentinel_matches_missing() {
        let dash = text("-");

        assert_eq!(
            compute_new_max_bid(&num(1.3), &dash, &num(30.0)),
            compute_new_max_bid(&num(1.3), &CellValue::Empty, &num(30.0)),
        );
        assert_eq!(
            compute_new_max_bid(&dash, &num(50.0), &num(30.0)),
            compute_new_max_bid(&CellValue::Empty, &num(50.0), &num(30.0)),
        );
        // dash target means 30, so 26 sits on the proportional side
        assert_eq!(compute_new_max_bid(&num(1.3), &num(26.0), &dash), 1.5);
        assert_eq!(compute_new_max_bid(&num(1.3), &num(26.0), &CellValue::Empty), 1.5);
    }

    #[test]
    fn test_failure_modes_are_distinguishable() {
        let bad_cpc = try_compute_new_max_bid(&text("N/A"), &num(10.0), &num(30.0)).unwrap_err();
        assert!(matches!(bad_cpc, BidError::Malformed { field: BidField::CostPerClick, .. }));

        let bad_acos = try_compute_new_max_bid(&num(1.0), &text("ten"), &num(30.0)).unwrap_err();
        assert!(matches!(bad_acos, BidError::Malformed { field: BidField::ObservedAcos, .. }));

        let bad_target = try_compute_new_max_bid(&num(1.0), &num(10.0), &text("?")).unwrap_err();
        assert!(matches!(bad_target, BidError::Malformed { field: BidField::TargetAcos, .. }));

        let overflow = try_compute_new_max_bid(&num(f64::MAX), &num(1.0), &num(30.0)).unwrap_err();
        assert_eq!(overflow, BidError::NonFiniteBid);

        // every one of them still prices the row at 0
        assert_eq!(compute_new_max_bid(&text("N/A"), &num(10.0), &num(30.0)), 0.0);
        assert_eq!(compute_new_max_bid(&num(1.0), &text("ten"), &num(30.0)), 0.0);
        assert_eq!(compute_new_max_bid(&num(f64::MAX), &num(1.0), &num(30.0)), 0.0);
    }

    #[test]
    fn test_recompute_uses_batch_default_and_row_overrides() {
        let rows = vec![
            KeywordBidRecordBuilder::default()
                .keyword("batch target")
                .cost_per_click(2.0)
                .acos(40.0)
                .build()
                .unwrap(),
            KeywordBidRecordBuilder::default()
                .keyword("own target")
                .cost_per_click(2.0)
                .acos(40.0)
                .target_acos(60.0)
                .build()
                .unwrap(),
            KeywordBidRecordBuilder::default()
                .keyword("broken")
                .cost_per_click("abc")
                .acos(40.0)
                .build()
                .unwrap(),
        ];

        let priced: Vec<KeywordBidRecord> = recompute(rows, 20.0).collect();

        assert_eq!(priced.len(), 3);
        assert_eq!(priced[0].target_acos, num(20.0));
        assert_eq!(priced[0].recommended_bid, 1.0);
        assert_eq!(priced[1].target_acos, num(60.0));
        assert_eq!(priced[1].recommended_bid, 2.4);
        assert_eq!(priced[2].recommended_bid, 0.0);
    }

    #[test]
    fn test_apply_reports_fallback() {
        let recalculator = BidRecalculator::new(30.0);
        let mut record = KeywordBidRecordBuilder::default()
            .cost_per_click("$1.50")
            .acos("oops")
            .recommended_bid(9.99)
            .build()
            .unwrap();

        assert!(recalculator.apply(&mut record).is_err());
        assert_eq!(record.recommended_bid, 0.0);
        assert_eq!(record.target_acos, num(30.0));
    }
}
