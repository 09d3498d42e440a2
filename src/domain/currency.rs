//! Canonical currency formatting for display and export.

use crate::domain::models::payroll::Money;

/// Format an integer amount with `.` as the thousands separator and the
/// `VNĐ` suffix, e.g. `120000` becomes `"120.000 VNĐ"`.
pub fn format_currency(amount: Money) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{} VNĐ", grouped)
    } else {
        format!("{} VNĐ", grouped)
    }
}
