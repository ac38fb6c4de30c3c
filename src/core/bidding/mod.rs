//! Per keyword bid recalculation.
//!
//! Raw report cells pass through `normalize` into a typed `BidInputs`
//! triple, the formula prices it, and `compute_new_max_bid` is the
//! boundary where any failure becomes a bid of `0`.

mod formula;
mod normalize;
mod recalculator;

pub use normalize::{BidField, DEFAULT_TARGET_ACOS};
pub use recalculator::{BidRecalculator, recompute};

use thiserror::Error;

/// Why a row could not be priced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BidError {
    #[error("{field} is not a number: {raw:?}")]
    Malformed { field: BidField, raw: String },
    #[error("{field} is not finite")]
    NonFinite { field: BidField },
    #[error("bid computed to a non-finite value")]
    NonFiniteBid,
    #[error("bid computed to a negative value {0}")]
    NegativeBid(f64),
}

impl BidError {
    /// Short label used for metric attributes
    pub fn kind(&self) -> &'static str {
        match self {
            BidError::Malformed { .. } => "malformed",
            BidError::NonFinite { .. } => "non_finite_input",
            BidError::NonFiniteBid => "non_finite_bid",
            BidError::NegativeBid(_) => "negative_bid",
        }
    }
}
