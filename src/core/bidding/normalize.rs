use crate::core::bidding::BidError;
use crate::core::models::cell::CellValue;
use strum::Display;

/// Literal a report uses for "no data"
pub const SENTINEL: &str = "-";
/// Target ACOS assumed when a row's target is the sentinel or missing
pub const DEFAULT_TARGET_ACOS: f64 = 30.0;

/// The numeric inputs of the bid formula, each with its own fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BidField {
    #[strum(serialize = "cost_per_click")]
    CostPerClick,
    #[strum(serialize = "observed_acos")]
    ObservedAcos,
    #[strum(serialize = "target_acos")]
    TargetAcos,
}

impl BidField {
    /// Value substituted for the sentinel or a missing cell
    pub fn default_value(self) -> f64 {
        match self {
            BidField::CostPerClick => 0.0,
            BidField::ObservedAcos => 0.0,
            BidField::TargetAcos => DEFAULT_TARGET_ACOS,
        }
    }
}

/// Outcome of normalizing one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized {
    /// Parsed from the cell
    Value(f64),
    /// The cell was missing or the sentinel, so the field default applies
    Defaulted(f64),
}

impl Normalized {
    pub fn value(self) -> f64 {
        match self {
            Normalized::Value(v) | Normalized::Defaulted(v) => v,
        }
    }
}

/// Turns a raw cell into a plain decimal.
///
/// Sentinel and not-a-number checks run on the raw cell before any
/// cleaning, so `" - "` is malformed while `"-"` is defaulted. Text is then
/// stripped of `$`, `%` and surrounding whitespace and parsed.
pub fn normalize(field: BidField, cell: &CellValue) -> Result<Normalized, BidError> {
    match cell {
        CellValue::Empty => Ok(Normalized::Defaulted(field.default_value())),
        CellValue::Number(num) => checked(field, *num),
        CellValue::Text(raw) if raw == SENTINEL => Ok(Normalized::Defaulted(field.default_value())),
        CellValue::Text(raw) => parse_decimal(field, raw),
    }
}

fn parse_decimal(field: BidField, raw: &str) -> Result<Normalized, BidError> {
    let cleaned = raw.replace(['$', '%'], "");

    let parsed = cleaned
        .trim()
        .parse::<f64>()
        .map_err(|_| BidError::Malformed {
            field,
            raw: raw.to_string(),
        })?;

    checked(field, parsed)
}

fn checked(field: BidField, value: f64) -> Result<Normalized, BidError> {
    if value.is_nan() {
        return Ok(Normalized::Defaulted(field.default_value()));
    }

    if value.is_infinite() {
        return Err(BidError::NonFinite { field });
    }

    Ok(Normalized::Value(value))
}
