//! Bank offers: the reference table the quoter compares against, and per-offer
//! custom rate overrides entered by the salesperson.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, bail, ensure};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::request::{MAX_ANNUAL_RATE_PERCENT, validate_annual_rate, validate_cat};

/// A named credit offer from a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankOffer {
    /// Stable key used to attach overrides, e.g. `"bbva"`.
    pub id: String,
    /// Name shown in the comparison table.
    pub name: String,
    /// Annual nominal rate as a percentage.
    pub annual_rate_percent: Decimal,
    /// Costo Anual Total disclosed by the bank, as a percentage.
    pub cat_percent: Decimal,
    /// One-time fee charged on the principal, as a percentage.
    #[serde(default)]
    pub opening_commission_percent: Decimal,
}

/// Custom rate and/or CAT replacing the values of a single offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOverride {
    /// Custom annual nominal rate, as a percentage.
    #[serde(default)]
    pub annual_rate_percent: Option<Decimal>,
    /// Custom CAT, as a percentage.
    #[serde(default)]
    pub cat_percent: Option<Decimal>,
}

/// Overrides keyed by offer id. An `Err` entry is custom text that could not be
/// parsed; the comparison reports that offer as failed instead of pricing it.
pub type Overrides = HashMap<String, EngineResult<RateOverride>>;

impl RateOverride {
    /// Builds an override from text typed in the quoter. Blank fields keep the offer's value.
    pub fn parse(annual_rate: &str, cat: &str) -> EngineResult<Self> {
        Ok(Self {
            annual_rate_percent: parse_percent("annual_rate_percent", annual_rate)?,
            cat_percent: parse_percent("cat_percent", cat)?,
        })
    }

    /// Like [`RateOverride::parse`], but a parse failure is reported as an
    /// [`EngineError::OfferComputation`] of `offer_id`, ready to be stored in [`Overrides`].
    pub fn parse_for(offer_id: &str, annual_rate: &str, cat: &str) -> EngineResult<Self> {
        Self::parse(annual_rate, cat).map_err(|e| e.for_offer(offer_id))
    }

    pub fn is_empty(&self) -> bool {
        self.annual_rate_percent.is_none() && self.cat_percent.is_none()
    }
}

fn parse_percent(field: &'static str, text: &str) -> EngineResult<Option<Decimal>> {
    let trimmed = text.trim().trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(trimmed)
        .map(Some)
        .map_err(|_| EngineError::invalid(field, format!("'{text}' is not a number")))
}

impl BankOffer {
    /// The offer as it should be priced once the override is applied.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OfferComputation`] when the custom rate or CAT is outside
    /// `0..=99`.
    pub fn apply_override(&self, rate_override: &RateOverride) -> EngineResult<BankOffer> {
        let mut effective = self.clone();
        if let Some(rate) = rate_override.annual_rate_percent {
            validate_annual_rate(rate).map_err(|e| e.for_offer(&self.id))?;
            effective.annual_rate_percent = rate;
        }
        if let Some(cat) = rate_override.cat_percent {
            validate_cat(cat).map_err(|e| e.for_offer(&self.id))?;
            effective.cat_percent = cat;
        }
        Ok(effective)
    }
}

/// The bank table shown by the quoter when no other table is supplied.
pub fn default_offers() -> Vec<BankOffer> {
    vec![
        offer("bbva", "BBVA", dec!(12.5), dec!(16.9), dec!(2.0)),
        offer("banorte", "Banorte", dec!(13.8), dec!(18.2), dec!(2.5)),
        offer("santander", "Santander", dec!(14.5), dec!(19.4), dec!(1.5)),
        offer("hsbc", "HSBC", dec!(13.2), dec!(17.6), dec!(2.0)),
        offer("scotiabank", "Scotiabank", dec!(14.0), dec!(18.7), dec!(1.8)),
    ]
}

fn offer(id: &str, name: &str, rate: Decimal, cat: Decimal, commission: Decimal) -> BankOffer {
    BankOffer {
        id: id.to_string(),
        name: name.to_string(),
        annual_rate_percent: rate,
        cat_percent: cat,
        opening_commission_percent: commission,
    }
}

/// Parses a JSON array of bank offers and checks the table is usable.
pub fn parse_offers(json: &str) -> anyhow::Result<Vec<BankOffer>> {
    let offers: Vec<BankOffer> =
        serde_json::from_str(json).context("Bank table is not a valid offer list")?;

    let mut seen = HashSet::new();
    for offer in &offers {
        ensure!(
            !offer.id.trim().is_empty(),
            "Bank offer '{}' has an empty id",
            offer.name
        );
        if !seen.insert(offer.id.as_str()) {
            bail!("Bank offer id '{}' appears more than once", offer.id);
        }
        for (label, value) in [("rate", offer.annual_rate_percent), ("CAT", offer.cat_percent)] {
            ensure!(
                value >= Decimal::ZERO && value <= MAX_ANNUAL_RATE_PERCENT,
                "Bank offer '{}' has {} {} outside 0-{}",
                offer.id,
                label,
                value,
                MAX_ANNUAL_RATE_PERCENT
            );
        }
        ensure!(
            offer.opening_commission_percent >= Decimal::ZERO,
            "Bank offer '{}' has a negative opening commission",
            offer.id
        );
    }

    tracing::debug!(offers = offers.len(), "bank table parsed");
    Ok(offers)
}

/// Reads a bank table from a JSON file.
pub fn load_offers(path: impl AsRef<Path>) -> anyhow::Result<Vec<BankOffer>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bank table {}", path.display()))?;
    parse_offers(&json).with_context(|| format!("Invalid bank table {}", path.display()))
}
