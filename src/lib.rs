//! `mx_auto_credit` is a Rust library for quoting automotive credit in Mexico.
//!
//! It provides the calculation engine behind a dealership credit quoter:
//! - **Level-payment amortization**: fixed monthly payment, month-by-month schedule and
//!   totals (interest, opening commission, total paid).
//! - **Bank comparison**: the same credit priced with several banks, cheapest monthly
//!   payment first, with per-bank custom rate/CAT overrides.
//! - **Credit rating**: a qualitative Good / Large / Poor / Bad classification of a quote.
//! - **Vehicle quote**: down payment (enganche), financed amount, comparison and rating in
//!   one call, plus `es-MX` formatted table rows for the printed quote.
//!
//! ## Usage
//!
//! Add `mx_auto_credit` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mx_auto_credit = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! chrono = "0.4"
//! ```
//!
//! Then, use `quote_vehicle` to compare the bank table for a vehicle:
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use chrono::NaiveDate;
//! use mx_auto_credit::{VehicleQuoteInput, default_offers, format_mxn, quote_vehicle};
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let input = VehicleQuoteInput {
//!         vehicle_value: dec!(450_000),
//!         down_payment_percent: dec!(20),
//!         term_months: 48,
//!         start_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
//!     };
//!
//!     match quote_vehicle(&input, &default_offers(), &HashMap::new()) {
//!         Ok(quote) => {
//!             println!("Financed amount: {}", format_mxn(quote.financed_amount));
//!             if let Some(best) = quote.best_offer() {
//!                 println!("Best bank:       {}", best.bank.name);
//!                 println!("Monthly payment: {}", format_mxn(best.monthly_payment));
//!                 println!("Total interest:  {}", format_mxn(best.total_interest));
//!             }
//!         }
//!         Err(e) => {
//!             eprintln!("Error quoting vehicle: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod amortization;
pub mod comparison;
pub mod error;
pub mod export;
pub mod offer;
pub mod quote;
pub mod rating;
pub mod request;

pub use amortization::{
    AmortizationRow, BALANCE_EPSILON, CalculationResult, ScheduleTotals, calculate,
    compute_monthly_payment, generate_schedule, monthly_rate, summarize,
};
pub use comparison::{OfferOutcome, best_offer, compare_offers};
pub use error::{EngineError, EngineResult};
pub use export::{ScheduleExportRow, export_rows, format_due_date, format_es_mx, format_mxn};
pub use offer::{BankOffer, Overrides, RateOverride, default_offers, load_offers, parse_offers};
pub use quote::{VehicleQuote, VehicleQuoteInput, quote_vehicle};
pub use rating::{CreditRating, RatingLabel, rate_credit};
pub use request::{ALLOWED_TERMS, CreditRequest, MAX_ANNUAL_RATE_PERCENT, is_standard_term};
