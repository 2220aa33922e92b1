//! Vehicle quote: splits the vehicle price into down payment (enganche) and financed
//! amount, compares the bank offers and rates the cheapest one.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::CalculationResult;
use crate::comparison::{OfferOutcome, best_offer, compare_offers};
use crate::error::{EngineError, EngineResult};
use crate::offer::{BankOffer, Overrides};
use crate::rating::{CreditRating, rate_credit};
use crate::request::CreditRequest;

/// What the salesperson fills in on the quoter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleQuoteInput {
    /// Sale price of the vehicle.
    pub vehicle_value: Decimal,
    /// Down payment as a percentage of the vehicle value.
    pub down_payment_percent: Decimal,
    /// Number of monthly payments.
    pub term_months: u32,
    /// Date the credit is granted.
    pub start_date: NaiveDate,
}

impl VehicleQuoteInput {
    /// Checks the vehicle value is positive and the down payment is in `[0, 100)`.
    pub fn validate(&self) -> EngineResult<()> {
        if self.vehicle_value <= Decimal::ZERO {
            return Err(EngineError::invalid(
                "vehicle_value",
                format!("must be positive, got {}", self.vehicle_value),
            ));
        }
        if self.down_payment_percent < Decimal::ZERO || self.down_payment_percent >= dec!(100) {
            return Err(EngineError::invalid(
                "down_payment_percent",
                format!("must be in [0, 100), got {}", self.down_payment_percent),
            ));
        }
        Ok(())
    }

    /// Enganche paid up front.
    pub fn down_payment_amount(&self) -> Decimal {
        self.vehicle_value * (self.down_payment_percent / dec!(100))
    }

    /// Amount left to finance after the down payment.
    pub fn financed_amount(&self) -> Decimal {
        self.vehicle_value - self.down_payment_amount()
    }
}

/// Everything the quoter shows for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleQuote {
    pub vehicle_value: Decimal,
    /// Enganche paid up front.
    pub down_payment_amount: Decimal,
    /// Principal priced by every bank.
    pub financed_amount: Decimal,
    pub term_months: u32,
    /// Ranked comparison, cheapest monthly payment first.
    pub comparison: Vec<OfferOutcome>,
    /// Rating of the first computed offer, if any.
    pub best_rating: Option<CreditRating>,
}

impl VehicleQuote {
    /// The cheapest computed offer, if any bank could be priced.
    pub fn best_offer(&self) -> Option<&CalculationResult> {
        best_offer(&self.comparison)
    }
}

/// Quotes a vehicle against a bank table.
///
/// The vehicle value is split into down payment and financed amount, the financed
/// amount is compared across `offers` (see [`compare_offers`]), and the cheapest
/// computed offer is rated.
///
/// # Arguments
///
/// * `input` - Vehicle value, down payment percentage, term and start date.
/// * `offers` - The bank table, usually [`crate::offer::default_offers`].
/// * `overrides` - Custom rate/CAT per offer id; may be empty.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] for a non-positive vehicle value, a down payment
/// outside `[0, 100)` or a zero term, and [`EngineError::Overflow`] if rating the best
/// offer does not fit a `Decimal`. Failures of single offers stay inside
/// [`VehicleQuote::comparison`].
pub fn quote_vehicle(
    input: &VehicleQuoteInput,
    offers: &[BankOffer],
    overrides: &Overrides,
) -> EngineResult<VehicleQuote> {
    input.validate()?;

    let base = CreditRequest {
        principal: input.financed_amount(),
        annual_rate_percent: Decimal::ZERO,
        term_months: input.term_months,
        opening_commission_percent: Decimal::ZERO,
        start_date: input.start_date,
    };
    let comparison = compare_offers(&base, offers, overrides)?;

    let best_rating = best_offer(&comparison)
        .map(|best| {
            rate_credit(
                best,
                input.vehicle_value,
                best.term_months,
                best.annual_rate_percent,
                best.cat_percent,
            )
        })
        .transpose()?;

    Ok(VehicleQuote {
        vehicle_value: input.vehicle_value,
        down_payment_amount: input.down_payment_amount(),
        financed_amount: input.financed_amount(),
        term_months: input.term_months,
        comparison,
        best_rating,
    })
}
