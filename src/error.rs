//! Error taxonomy of the calculation engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised by the engine. All of them are local to a single computation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineError {
    /// A numeric input is outside the range the formulas accept.
    #[error("Invalid value for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A single bank offer could not be computed, usually because of its custom rate or CAT.
    #[error("Offer '{offer_id}' could not be computed: {reason}")]
    OfferComputation { offer_id: String, reason: String },

    /// A due date falls outside the calendar range supported by `chrono`.
    #[error("Due date for payment {payment_number} is out of range")]
    DateOutOfRange { payment_number: u32 },

    /// Decimal arithmetic overflowed.
    #[error("Arithmetic overflow while computing {operation}")]
    Overflow { operation: String },
}

impl EngineError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(operation: &str) -> Self {
        EngineError::Overflow {
            operation: operation.to_string(),
        }
    }

    /// Wraps any failure as an [`EngineError::OfferComputation`] for the given offer.
    pub(crate) fn for_offer(self, offer_id: &str) -> Self {
        match self {
            EngineError::OfferComputation { .. } => self,
            other => EngineError::OfferComputation {
                offer_id: offer_id.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// The input field an [`EngineError::InvalidInput`] refers to, so a form can highlight it.
    pub fn field(&self) -> Option<&str> {
        match self {
            EngineError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// The offer an [`EngineError::OfferComputation`] belongs to.
    pub fn offer_id(&self) -> Option<&str> {
        match self {
            EngineError::OfferComputation { offer_id, .. } => Some(offer_id),
            _ => None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_offer_wraps_invalid_input() {
        let err = EngineError::invalid("annual_rate_percent", "must not be negative")
            .for_offer("bbva");

        assert_eq!(
            err,
            EngineError::OfferComputation {
                offer_id: "bbva".to_string(),
                reason: "Invalid value for annual_rate_percent: must not be negative".to_string(),
            }
        );
        assert_eq!(err.offer_id(), Some("bbva"));
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_for_offer_keeps_existing_offer_error() {
        let original = EngineError::OfferComputation {
            offer_id: "hsbc".to_string(),
            reason: "custom CAT is not a number".to_string(),
        };

        assert_eq!(original.clone().for_offer("bbva"), original);
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(EngineError::overflow("monthly payment")).unwrap();

        assert_eq!(json["kind"], "overflow");
        assert_eq!(json["operation"], "monthly payment");
    }

    #[test]
    fn test_deserializes_from_tagged_json() {
        let json =
            r#"{"kind": "invalid_input", "field": "principal", "reason": "must be positive"}"#;

        let err: EngineError = serde_json::from_str(json).unwrap();

        assert_eq!(err, EngineError::invalid("principal", "must be positive"));
        assert_eq!(err.field(), Some("principal"));
    }
}
