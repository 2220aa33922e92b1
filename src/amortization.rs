//! Level-payment amortization: the monthly payment, the schedule of payments and
//! its aggregate totals.
//!
//! The payment formula is the French (level payment) one:
//!
//! `PMT = P * [i(1 + i)^n] / [(1 + i)^n – 1]`, with `i = annual_rate / 100 / 12`.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::offer::BankOffer;
use crate::request::{CreditRequest, validate_loan_terms};

/// Balances below this amount are treated as fully paid.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

/// One line of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Position in the schedule, starting at 1.
    pub payment_number: u32,
    /// Date the payment falls due.
    pub due_date: NaiveDate,
    /// The fixed monthly payment.
    pub payment_amount: Decimal,
    /// The portion of the payment that reduces the balance.
    pub principal_portion: Decimal,
    /// The portion of the payment that covers interest.
    pub interest_portion: Decimal,
    /// The balance left after this payment.
    pub remaining_balance: Decimal,
}

/// Aggregates of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    /// Sum of every payment of the schedule.
    pub total_amount_paid: Decimal,
    /// Total paid minus the principal.
    pub total_interest: Decimal,
    /// One-time fee charged on the principal.
    pub opening_commission_amount: Decimal,
}

/// Result of pricing one credit request with one bank offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub bank: BankOffer,
    pub principal: Decimal,
    pub term_months: u32,
    /// Rate actually used for the schedule, after any custom override.
    pub annual_rate_percent: Decimal,
    /// CAT disclosed for the effective offer.
    pub cat_percent: Decimal,
    pub monthly_payment: Decimal,
    pub total_amount_paid: Decimal,
    pub total_interest: Decimal,
    pub opening_commission_amount: Decimal,
    pub schedule: Vec<AmortizationRow>,
}

/// Converts an annual nominal percentage into the monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// Fixed monthly payment of a loan. A zero rate falls back to `principal / term_months`.
///
/// The value is not rounded; round only for display.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] for a non-positive principal or term, or a
/// rate outside `0..=99`, and [`EngineError::Overflow`] when the payment does not fit.
pub fn compute_monthly_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
) -> EngineResult<Decimal> {
    validate_loan_terms(principal, annual_rate_percent, term_months)?;
    level_payment(principal, monthly_rate(annual_rate_percent), term_months)
}

fn level_payment(principal: Decimal, rate: Decimal, term_months: u32) -> EngineResult<Decimal> {
    const OPERATION: &str = "monthly payment";

    if rate.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let factor = (Decimal::ONE + rate)
        .checked_powu(term_months.into())
        .ok_or_else(|| EngineError::overflow(OPERATION))?;
    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(factor - Decimal::ONE))
        .ok_or_else(|| EngineError::overflow(OPERATION))
}

/// Builds the month-by-month schedule. The first payment is due one month after
/// `start_date`.
///
/// A zero principal or zero term yields an empty schedule.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] for a negative principal or an out-of-range rate,
/// and [`EngineError::DateOutOfRange`] when a due date cannot be represented.
pub fn generate_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_months: u32,
    start_date: NaiveDate,
) -> EngineResult<Vec<AmortizationRow>> {
    if principal.is_zero() || term_months == 0 {
        return Ok(Vec::new());
    }
    validate_loan_terms(principal, annual_rate_percent, term_months)?;

    let rate = monthly_rate(annual_rate_percent);
    let payment = level_payment(principal, rate, term_months)?;

    let mut balance = principal;
    let mut schedule = Vec::with_capacity(term_months as usize);

    for payment_number in 1..=term_months {
        let interest_portion = balance * rate;
        let principal_portion = payment - interest_portion;
        balance -= principal_portion;
        if balance < BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }

        let due_date = start_date
            .checked_add_months(Months::new(payment_number))
            .ok_or(EngineError::DateOutOfRange { payment_number })?;

        schedule.push(AmortizationRow {
            payment_number,
            due_date,
            payment_amount: payment,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
        });
    }

    Ok(schedule)
}

/// Totals of a schedule: amount paid, interest, and the opening commission.
///
/// # Errors
///
/// Returns [`EngineError::Overflow`] when a total does not fit in a `Decimal`.
pub fn summarize(
    schedule: &[AmortizationRow],
    opening_commission_percent: Decimal,
    principal: Decimal,
) -> EngineResult<ScheduleTotals> {
    let total_amount_paid = schedule
        .iter()
        .try_fold(Decimal::ZERO, |total, row| total.checked_add(row.payment_amount))
        .ok_or_else(|| EngineError::overflow("total amount paid"))?;
    let total_interest = total_amount_paid
        .checked_sub(principal)
        .ok_or_else(|| EngineError::overflow("total interest"))?;
    let opening_commission_amount = principal
        .checked_mul(opening_commission_percent)
        .map(|v| v / dec!(100))
        .ok_or_else(|| EngineError::overflow("opening commission"))?;

    Ok(ScheduleTotals {
        total_amount_paid,
        total_interest,
        opening_commission_amount,
    })
}

/// Prices a request. `bank` identifies the offer whose rate and commission the
/// request carries (see [`CreditRequest::with_offer`]).
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] for an invalid request, and
/// [`EngineError::Overflow`] or [`EngineError::DateOutOfRange`] when the schedule
/// cannot be represented.
pub fn calculate(request: &CreditRequest, bank: &BankOffer) -> EngineResult<CalculationResult> {
    request.validate()?;

    let monthly_payment = compute_monthly_payment(
        request.principal,
        request.annual_rate_percent,
        request.term_months,
    )?;
    let schedule = generate_schedule(
        request.principal,
        request.annual_rate_percent,
        request.term_months,
        request.start_date,
    )?;
    let totals = summarize(&schedule, request.opening_commission_percent, request.principal)?;

    Ok(CalculationResult {
        bank: bank.clone(),
        principal: request.principal,
        term_months: request.term_months,
        annual_rate_percent: request.annual_rate_percent,
        cat_percent: bank.cat_percent,
        monthly_payment,
        total_amount_paid: totals.total_amount_paid,
        total_interest: totals.total_interest,
        opening_commission_amount: totals.opening_commission_amount,
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    #[test]
    fn test_zero_rate_falls_back_to_straight_line() {
        assert_eq!(compute_monthly_payment(dec!(12000), dec!(0), 12).unwrap(), dec!(1000));
    }

    #[test]
    fn test_known_payment() {
        let payment = compute_monthly_payment(dec!(100000), dec!(12.5), 36).unwrap();

        assert_eq!(payment.round_dp(2), dec!(3345.36));
    }

    #[rstest]
    #[case(dec!(12000), dec!(12), 12, dec!(1066.19))]
    #[case(dec!(250000), dec!(13.8), 48, dec!(6806.56))]
    #[case(dec!(100000), dec!(14.5), 36, dec!(3442.10))]
    fn test_payment_regressions(
        #[case] principal: Decimal,
        #[case] rate: Decimal,
        #[case] term: u32,
        #[case] expected: Decimal,
    ) {
        let payment = compute_monthly_payment(principal, rate, term).unwrap();

        assert_eq!(payment.round_dp(2), expected);
    }

    #[rstest]
    #[case(dec!(0), dec!(12), 12)]
    #[case(dec!(-500), dec!(12), 12)]
    #[case(dec!(1000), dec!(12), 0)]
    #[case(dec!(1000), dec!(-1), 12)]
    fn test_compute_monthly_payment_rejects_invalid_input(
        #[case] principal: Decimal,
        #[case] rate: Decimal,
        #[case] term: u32,
    ) {
        let result = compute_monthly_payment(principal, rate, term);

        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_huge_principal_reports_overflow() {
        let result = compute_monthly_payment(Decimal::MAX, dec!(99), 60);

        assert!(matches!(result, Err(EngineError::Overflow { .. })));
    }

    #[test]
    fn test_total_paid_overflow_is_an_error() {
        let principal = Decimal::MAX * dec!(0.9);
        let bank = BankOffer {
            id: "bbva".to_string(),
            name: "BBVA".to_string(),
            annual_rate_percent: dec!(12),
            cat_percent: dec!(16),
            opening_commission_percent: Decimal::ZERO,
        };
        let request = CreditRequest {
            principal,
            annual_rate_percent: dec!(12),
            term_months: 60,
            opening_commission_percent: Decimal::ZERO,
            start_date: start(),
        };

        assert!(compute_monthly_payment(principal, dec!(12), 60).is_ok());
        assert_eq!(
            calculate(&request, &bank).unwrap_err(),
            EngineError::overflow("total amount paid")
        );
    }

    #[test]
    fn test_summarize_commission_overflow_is_an_error() {
        let err = summarize(&[], Decimal::MAX, Decimal::MAX).unwrap_err();

        assert_eq!(err, EngineError::overflow("opening commission"));
    }

    #[test]
    fn test_due_date_beyond_calendar_is_an_error() {
        let err = generate_schedule(dec!(1000), dec!(12), 12, NaiveDate::MAX).unwrap_err();

        assert_eq!(err, EngineError::DateOutOfRange { payment_number: 1 });
    }

    #[rstest]
    #[case(dec!(100000), dec!(12.5), 36)]
    #[case(dec!(350000), dec!(14.5), 60)]
    #[case(dec!(18500.75), dec!(9.99), 12)]
    #[case(dec!(12000), dec!(0), 24)]
    fn test_schedule_invariants(
        #[case] principal: Decimal,
        #[case] rate: Decimal,
        #[case] term: u32,
    ) {
        let schedule = generate_schedule(principal, rate, term, start()).unwrap();

        assert_eq!(schedule.len(), term as usize);
        assert_eq!(schedule.last().unwrap().remaining_balance, Decimal::ZERO);

        let repaid: Decimal = schedule.iter().map(|row| row.principal_portion).sum();
        assert_close(repaid, principal, dec!(0.01));

        let mut previous = principal;
        for (index, row) in schedule.iter().enumerate() {
            assert_eq!(row.payment_number, index as u32 + 1);
            assert_close(
                row.principal_portion + row.interest_portion,
                row.payment_amount,
                dec!(0.000001),
            );
            assert!(row.remaining_balance <= previous);
            previous = row.remaining_balance;
        }
    }

    #[test]
    fn test_schedule_due_dates_advance_monthly() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

        let schedule = generate_schedule(dec!(50000), dec!(12), 3, start).unwrap();

        let dates: Vec<_> = schedule.iter().map(|row| row.due_date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            ]
        );
    }

    #[test]
    fn test_first_row_interest() {
        let schedule = generate_schedule(dec!(12000), dec!(12), 12, start()).unwrap();

        assert_eq!(schedule[0].interest_portion, dec!(120));
        assert_eq!(schedule[0].principal_portion.round_dp(2), dec!(946.19));
        assert_eq!(schedule[0].remaining_balance.round_dp(2), dec!(11053.81));
    }

    #[rstest]
    #[case(dec!(0), 12)]
    #[case(dec!(1000), 0)]
    fn test_degenerate_schedule_is_empty(#[case] principal: Decimal, #[case] term: u32) {
        assert!(generate_schedule(principal, dec!(12), term, start()).unwrap().is_empty());
    }

    #[test]
    fn test_schedule_rejects_negative_rate() {
        let result = generate_schedule(dec!(1000), dec!(-3), 12, start());

        assert_eq!(result.unwrap_err().field(), Some("annual_rate_percent"));
    }

    #[test]
    fn test_schedule_is_idempotent() {
        let first = generate_schedule(dec!(100000), dec!(12.5), 36, start()).unwrap();
        let second = generate_schedule(dec!(100000), dec!(12.5), 36, start()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_summarize() {
        let schedule = generate_schedule(dec!(100000), dec!(12.5), 36, start()).unwrap();

        let totals = summarize(&schedule, dec!(2), dec!(100000)).unwrap();

        assert_eq!(totals.total_amount_paid.round_dp(2), dec!(120433.05));
        assert_eq!(totals.total_interest.round_dp(2), dec!(20433.05));
        assert_eq!(totals.opening_commission_amount, dec!(2000));
    }

    #[test]
    fn test_summarize_empty_schedule() {
        let totals = summarize(&[], dec!(2), dec!(0)).unwrap();

        assert_eq!(totals.total_amount_paid, Decimal::ZERO);
        assert_eq!(totals.total_interest, Decimal::ZERO);
        assert_eq!(totals.opening_commission_amount, Decimal::ZERO);
    }

    #[test]
    fn test_calculate_happy_path() {
        let bank = BankOffer {
            id: "bbva".to_string(),
            name: "BBVA".to_string(),
            annual_rate_percent: dec!(12.5),
            cat_percent: dec!(16.9),
            opening_commission_percent: dec!(2),
        };
        let base = CreditRequest {
            principal: dec!(100000),
            annual_rate_percent: Decimal::ZERO,
            term_months: 36,
            opening_commission_percent: Decimal::ZERO,
            start_date: start(),
        };

        let result = calculate(&base.with_offer(&bank), &bank).unwrap();

        assert_eq!(result.bank.id, "bbva");
        assert_eq!(result.monthly_payment.round_dp(2), dec!(3345.36));
        assert_eq!(result.total_interest.round_dp(2), dec!(20433.05));
        assert_eq!(result.opening_commission_amount, dec!(2000));
        assert_eq!(result.cat_percent, dec!(16.9));
        assert_eq!(result.schedule.len(), 36);
    }
}
