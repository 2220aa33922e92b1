//! Inputs of a credit calculation and their validation rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::offer::BankOffer;

/// Terms offered by the quoter screens. Any positive term is still accepted by the engine.
pub const ALLOWED_TERMS: [u32; 5] = [12, 24, 36, 48, 60];

/// Highest annual nominal rate accepted, as a percentage.
pub const MAX_ANNUAL_RATE_PERCENT: Decimal = dec!(99);

/// Input parameters for a single credit calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRequest {
    /// Amount to finance, after the down payment.
    pub principal: Decimal,
    /// The annual nominal rate as a percentage (e.g., 12.5 for 12.5%).
    pub annual_rate_percent: Decimal,
    /// Number of monthly payments.
    pub term_months: u32,
    /// One-time fee charged on the principal, as a percentage.
    #[serde(default)]
    pub opening_commission_percent: Decimal,
    /// Date the credit is granted; the first payment falls one month later.
    pub start_date: NaiveDate,
}

impl CreditRequest {
    /// Checks every field against the ranges the formulas accept.
    pub fn validate(&self) -> EngineResult<()> {
        validate_loan_terms(self.principal, self.annual_rate_percent, self.term_months)?;
        validate_commission(self.opening_commission_percent)
    }

    /// Copy of the request priced with the offer's rate and commission.
    pub fn with_offer(&self, offer: &BankOffer) -> Self {
        Self {
            annual_rate_percent: offer.annual_rate_percent,
            opening_commission_percent: offer.opening_commission_percent,
            ..self.clone()
        }
    }
}

/// Whether the term is one of the standard [`ALLOWED_TERMS`].
pub fn is_standard_term(term_months: u32) -> bool {
    ALLOWED_TERMS.contains(&term_months)
}

pub(crate) fn validate_principal_and_term(
    principal: Decimal,
    term_months: u32,
) -> EngineResult<()> {
    if principal <= Decimal::ZERO {
        return Err(EngineError::invalid(
            "principal",
            format!("must be positive, got {principal}"),
        ));
    }
    if term_months == 0 {
        return Err(EngineError::invalid("term_months", "must be at least one month"));
    }
    Ok(())
}

pub(crate) fn validate_annual_rate(annual_rate_percent: Decimal) -> EngineResult<()> {
    if annual_rate_percent < Decimal::ZERO {
        return Err(EngineError::invalid(
            "annual_rate_percent",
            format!("must not be negative, got {annual_rate_percent}"),
        ));
    }
    if annual_rate_percent > MAX_ANNUAL_RATE_PERCENT {
        return Err(EngineError::invalid(
            "annual_rate_percent",
            format!("must not exceed {MAX_ANNUAL_RATE_PERCENT}, got {annual_rate_percent}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_cat(cat_percent: Decimal) -> EngineResult<()> {
    if cat_percent < Decimal::ZERO || cat_percent > MAX_ANNUAL_RATE_PERCENT {
        return Err(EngineError::invalid(
            "cat_percent",
            format!("must be within 0-{MAX_ANNUAL_RATE_PERCENT}, got {cat_percent}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_commission(opening_commission_percent: Decimal) -> EngineResult<()> {
    if opening_commission_percent < Decimal::ZERO {
        return Err(EngineError::invalid(
            "opening_commission_percent",
            format!("must not be negative, got {opening_commission_percent}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_loan_terms(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> EngineResult<()> {
    validate_principal_and_term(principal, term_months)?;
    validate_annual_rate(annual_rate_percent)
}
