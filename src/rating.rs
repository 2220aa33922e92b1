//! Qualitative rating of a priced credit, shown next to each quote.
//!
//! The thresholds and weights are business policy of the dealership quoter and are
//! kept literally.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::CalculationResult;
use crate::error::{EngineError, EngineResult};

/// Upper bounds (inclusive) of the Good, Large and Poor cost buckets, in percent of the principal.
pub const COST_THRESHOLDS: [Decimal; 3] = [dec!(15), dec!(25), dec!(35)];
/// Upper bounds (inclusive) of the CAT minus rate spread buckets, in percentage points.
pub const RATE_SPREAD_THRESHOLDS: [Decimal; 3] = [dec!(3), dec!(5), dec!(8)];
/// Upper bounds (inclusive) of the term buckets, in months.
pub const TERM_THRESHOLDS: [u32; 3] = [36, 48, 60];
/// Lower bounds (inclusive) of the Good, Large and Poor overall score buckets.
pub const OVERALL_THRESHOLDS: [Decimal; 3] = [dec!(75), dec!(50), dec!(25)];

/// Weights of the cost, rate spread and term scores in the overall score.
pub const COST_WEIGHT: Decimal = dec!(0.5);
pub const RATE_WEIGHT: Decimal = dec!(0.3);
pub const TERM_WEIGHT: Decimal = dec!(0.2);

const MAX_SCORE: Decimal = dec!(100);

/// Qualitative bucket, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingLabel {
    Good,
    Large,
    Poor,
    Bad,
}

impl RatingLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingLabel::Good => "Good",
            RatingLabel::Large => "Large",
            RatingLabel::Poor => "Poor",
            RatingLabel::Bad => "Bad",
        }
    }

    /// Bucket for a value where lower is better.
    fn from_upper_bounds<T: PartialOrd>(value: T, bounds: [T; 3]) -> Self {
        let [good, large, poor] = bounds;
        if value <= good {
            RatingLabel::Good
        } else if value <= large {
            RatingLabel::Large
        } else if value <= poor {
            RatingLabel::Poor
        } else {
            RatingLabel::Bad
        }
    }

    /// Bucket for a score where higher is better.
    fn from_lower_bounds(score: Decimal, bounds: [Decimal; 3]) -> Self {
        let [good, large, poor] = bounds;
        if score >= good {
            RatingLabel::Good
        } else if score >= large {
            RatingLabel::Large
        } else if score >= poor {
            RatingLabel::Poor
        } else {
            RatingLabel::Bad
        }
    }
}

impl std::fmt::Display for RatingLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display classification of a priced credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRating {
    /// Interest plus opening commission, in percent of the principal.
    pub cost_percentage: Decimal,
    /// CAT minus the nominal rate, in percentage points.
    pub cat_vs_rate_diff: Decimal,
    /// Principal in percent of the vehicle value.
    pub financed_percentage: Decimal,
    /// Bucket of each dimension and of the weighted score.
    pub cost: RatingLabel,
    pub rate: RatingLabel,
    pub term: RatingLabel,
    pub overall: RatingLabel,
    /// Scores from 0 to 100, higher is better.
    pub cost_score: Decimal,
    pub rate_score: Decimal,
    pub term_score: Decimal,
    pub overall_score: Decimal,
}

/// Bucket for the cost of the credit: `<= 15` Good, `<= 25` Large, `<= 35` Poor.
pub fn classify_cost(cost_percentage: Decimal) -> RatingLabel {
    RatingLabel::from_upper_bounds(cost_percentage, COST_THRESHOLDS)
}

/// Bucket for CAT minus rate: `<= 3` Good, `<= 5` Large, `<= 8` Poor.
pub fn classify_rate_spread(cat_vs_rate_diff: Decimal) -> RatingLabel {
    RatingLabel::from_upper_bounds(cat_vs_rate_diff, RATE_SPREAD_THRESHOLDS)
}

/// Bucket for the term: `<= 36` Good, `<= 48` Large, `<= 60` Poor.
pub fn classify_term(term_months: u32) -> RatingLabel {
    RatingLabel::from_upper_bounds(term_months, TERM_THRESHOLDS)
}

/// Bucket for the weighted score: `>= 75` Good, `>= 50` Large, `>= 25` Poor.
pub fn classify_overall(overall_score: Decimal) -> RatingLabel {
    RatingLabel::from_lower_bounds(overall_score, OVERALL_THRESHOLDS)
}

fn score(penalty: Decimal) -> Decimal {
    (MAX_SCORE - penalty).clamp(Decimal::ZERO, MAX_SCORE)
}

fn term_penalty(term_months: u32) -> Decimal {
    Decimal::from(term_months.saturating_sub(12)) * dec!(1.25)
}

/// `value * factor`, with a penalty too large to represent scoring as zero.
fn scaled_score(value: Decimal, factor: Decimal) -> Decimal {
    value.checked_mul(factor).map_or(Decimal::ZERO, score)
}

fn percentage_of(part: Decimal, whole: Decimal, operation: &str) -> EngineResult<Decimal> {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .ok_or_else(|| EngineError::overflow(operation))
}

/// Rates a priced credit against the vehicle it finances.
///
/// # Arguments
///
/// * `result` - The priced credit.
/// * `vehicle_value` - Sale price of the vehicle, for the financed percentage.
/// * `term_months` - Term used for the term bucket.
/// * `effective_rate` - Annual rate actually charged, after any override.
/// * `effective_cat` - CAT actually disclosed, after any override.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if the result has no principal or the vehicle
/// value is not positive, and [`EngineError::Overflow`] if a percentage does not fit.
pub fn rate_credit(
    result: &CalculationResult,
    vehicle_value: Decimal,
    term_months: u32,
    effective_rate: Decimal,
    effective_cat: Decimal,
) -> EngineResult<CreditRating> {
    if result.principal <= Decimal::ZERO {
        return Err(EngineError::invalid("principal", "a rating needs a positive principal"));
    }
    if vehicle_value <= Decimal::ZERO {
        return Err(EngineError::invalid(
            "vehicle_value",
            format!("must be positive, got {vehicle_value}"),
        ));
    }

    let cost = result
        .total_interest
        .checked_add(result.opening_commission_amount)
        .ok_or_else(|| EngineError::overflow("credit cost"))?;
    let cost_percentage = percentage_of(cost, result.principal, "cost percentage")?;
    let financed_percentage =
        percentage_of(result.principal, vehicle_value, "financed percentage")?;
    let cat_vs_rate_diff = effective_cat
        .checked_sub(effective_rate)
        .ok_or_else(|| EngineError::overflow("CAT spread"))?;

    let cost_score = scaled_score(cost_percentage, dec!(2));
    let rate_score = scaled_score(cat_vs_rate_diff, dec!(10));
    let term_score = score(term_penalty(term_months));
    let overall_score =
        cost_score * COST_WEIGHT + rate_score * RATE_WEIGHT + term_score * TERM_WEIGHT;

    Ok(CreditRating {
        cost_percentage,
        cat_vs_rate_diff,
        financed_percentage,
        cost: classify_cost(cost_percentage),
        rate: classify_rate_spread(cat_vs_rate_diff),
        term: classify_term(term_months),
        overall: classify_overall(overall_score),
        cost_score,
        rate_score,
        term_score,
        overall_score,
    })
}
