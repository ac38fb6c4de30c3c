use crate::core::bidding::BidError;
use crate::core::bidding::normalize::{BidField, normalize};
use crate::core::models::cell::CellValue;

/// Share of the target ACOS an observed ACOS must stay under to earn the
/// flat uplift instead of a proportional recompute
pub const EFFICIENCY_MARGIN: f64 = 0.84;
/// Flat multiplier applied to CPC for keywords comfortably under target
pub const BID_UPLIFT: f64 = 1.2;

/// Which side of the efficiency threshold a keyword fell on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidRule {
    /// Observed ACOS under the margin, CPC raised by [`BID_UPLIFT`]
    Uplift,
    /// CPC scaled so the ACOS would trend toward target at constant click cost
    Proportional,
}

/// Normalized, always valid inputs of the bid formula.
///
/// ACOS values are both in the percentage scale the report uses,
/// e.g. `25.0` meaning 25%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BidInputs {
    pub cost_per_click: f64,
    pub observed_acos: f64,
    pub target_acos: f64,
}

impl BidInputs {
    /// Runs each raw field through the normalization stage
    pub fn normalize(
        cost_per_click: &CellValue,
        observed_acos: &CellValue,
        target_acos: &CellValue,
    ) -> Result<BidInputs, BidError> {
        Ok(BidInputs {
            cost_per_click: normalize(BidField::CostPerClick, cost_per_click)?.value(),
            observed_acos: normalize(BidField::ObservedAcos, observed_acos)?.value(),
            target_acos: normalize(BidField::TargetAcos, target_acos)?.value(),
        })
    }

    pub fn rule(&self) -> BidRule {
        if self.observed_acos < EFFICIENCY_MARGIN * self.target_acos {
            BidRule::Uplift
        } else {
            BidRule::Proportional
        }
    }

    /// The recommended max bid, rounded to cents.
    ///
    /// A zero observed ACOS on the proportional side yields 0 rather than
    /// dividing. Non-finite or negative results are errors so the caller's
    /// fallback keeps the bid at a sane value.
    pub fn new_max_bid(&self) -> Result<f64, BidError> {
        let bid = match self.rule() {
            BidRule::Uplift => self.cost_per_click * BID_UPLIFT,
            BidRule::Proportional if self.observed_acos != 0.0 => {
                (self.cost_per_click / self.observed_acos) * self.target_acos
            }
            BidRule::Proportional => 0.0,
        };

        let rounded = round_cents(bid);

        if !rounded.is_finite() {
            return Err(BidError::NonFiniteBid);
        }

        if rounded < 0.0 {
            return Err(BidError::NegativeBid(rounded));
        }

        // folds -0.0 into 0.0
        Ok(rounded + 0.0)
    }
}

/// Rounds half to even at two decimals, matching spreadsheet tooling
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
