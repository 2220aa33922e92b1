//! Table data for the printed quote: schedule rows formatted the way the PDF shows them.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::amortization::AmortizationRow;

/// Column headers of the amortization table, in print order.
pub const SCHEDULE_COLUMNS: [&str; 6] =
    ["No. de pago", "Fecha", "Pago", "Capital", "Interés", "Saldo"];

/// One printed row of the amortization table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExportRow {
    pub payment_number: String,
    pub due_date: String,
    pub payment: String,
    pub principal: String,
    pub interest: String,
    pub balance: String,
}

impl ScheduleExportRow {
    /// Cells in the order of [`SCHEDULE_COLUMNS`].
    pub fn cells(&self) -> [&str; 6] {
        [
            self.payment_number.as_str(),
            self.due_date.as_str(),
            self.payment.as_str(),
            self.principal.as_str(),
            self.interest.as_str(),
            self.balance.as_str(),
        ]
    }
}

/// Formats an amount like the `es-MX` locale with two decimals: `1234567.891` -> `1,234,567.89`.
pub fn format_es_mx(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}.{fraction}")
}

/// Formats an amount in pesos: `$1,234.50`.
pub fn format_mxn(amount: Decimal) -> String {
    let formatted = format_es_mx(amount);
    match formatted.strip_prefix('-') {
        Some(positive) => format!("-${positive}"),
        None => format!("${formatted}"),
    }
}

/// Formats a due date as `dd/mm/yyyy`.
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Formats one schedule row: the payment number as is, the date with
/// [`format_due_date`] and every amount with [`format_es_mx`].
pub fn export_row(row: &AmortizationRow) -> ScheduleExportRow {
    ScheduleExportRow {
        payment_number: row.payment_number.to_string(),
        due_date: format_due_date(row.due_date),
        payment: format_es_mx(row.payment_amount),
        principal: format_es_mx(row.principal_portion),
        interest: format_es_mx(row.interest_portion),
        balance: format_es_mx(row.remaining_balance),
    }
}

/// Formats a whole schedule, keeping its order.
///
/// # Arguments
///
/// * `schedule` - Rows as produced by [`crate::amortization::generate_schedule`].
pub fn export_rows(schedule: &[AmortizationRow]) -> Vec<ScheduleExportRow> {
    schedule.iter().map(export_row).collect()
}
