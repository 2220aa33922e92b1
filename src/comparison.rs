//! Prices the same credit with several banks and ranks the results.

use serde::{Deserialize, Serialize};

use crate::amortization::{CalculationResult, calculate};
use crate::error::{EngineError, EngineResult};
use crate::offer::{BankOffer, Overrides, RateOverride};
use crate::request::{CreditRequest, validate_principal_and_term};

/// Outcome of pricing one offer inside a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OfferOutcome {
    /// The offer was priced.
    Computed(CalculationResult),
    /// The offer could not be priced; `offer` is the table entry before any override.
    Failed { offer: BankOffer, error: EngineError },
}

impl OfferOutcome {
    /// The bank offer this line belongs to.
    pub fn offer(&self) -> &BankOffer {
        match self {
            OfferOutcome::Computed(result) => &result.bank,
            OfferOutcome::Failed { offer, .. } => offer,
        }
    }

    /// The priced result, or `None` for a failed offer.
    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            OfferOutcome::Computed(result) => Some(result),
            OfferOutcome::Failed { .. } => None,
        }
    }
}

/// Prices `base` with every offer, cheapest monthly payment first.
///
/// `base` supplies the principal, term and start date; rate and commission come from
/// each offer, after applying the override registered under the offer id. Offers that
/// cannot be computed, including those whose override text did not parse, are kept as
/// [`OfferOutcome::Failed`] after the ranked ones, in input order. Ties keep input order.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when the base principal or term is invalid,
/// since no offer could be priced.
pub fn compare_offers(
    base: &CreditRequest,
    offers: &[BankOffer],
    overrides: &Overrides,
) -> EngineResult<Vec<OfferOutcome>> {
    validate_principal_and_term(base.principal, base.term_months)?;

    let mut computed = Vec::with_capacity(offers.len());
    let mut failed = Vec::new();

    for offer in offers {
        match price_offer(base, offer, overrides.get(&offer.id)) {
            Ok(result) => {
                tracing::debug!(
                    offer_id = %offer.id,
                    monthly_payment = %result.monthly_payment.round_dp(2),
                    "offer computed"
                );
                computed.push(result);
            }
            Err(error) => {
                tracing::warn!(offer_id = %offer.id, %error, "offer excluded from ranking");
                failed.push(OfferOutcome::Failed {
                    offer: offer.clone(),
                    error,
                });
            }
        }
    }

    computed.sort_by(|a, b| a.monthly_payment.cmp(&b.monthly_payment));

    if let Some(best) = computed.first() {
        tracing::debug!(offer_id = %best.bank.id, "best offer selected");
    }

    Ok(computed
        .into_iter()
        .map(OfferOutcome::Computed)
        .chain(failed)
        .collect())
}

fn price_offer(
    base: &CreditRequest,
    offer: &BankOffer,
    rate_override: Option<&EngineResult<RateOverride>>,
) -> EngineResult<CalculationResult> {
    let effective = match rate_override {
        Some(Ok(rate_override)) => offer.apply_override(rate_override)?,
        Some(Err(error)) => return Err(error.clone().for_offer(&offer.id)),
        None => offer.clone(),
    };
    calculate(&base.with_offer(&effective), &effective).map_err(|e| e.for_offer(&offer.id))
}

/// The cheapest computed offer of a ranked comparison.
pub fn best_offer(outcomes: &[OfferOutcome]) -> Option<&CalculationResult> {
    outcomes.iter().find_map(OfferOutcome::result)
}
