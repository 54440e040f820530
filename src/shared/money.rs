//! Currency formatting for VND amounts.
//!
//! The shop prices everything in whole đồng, so amounts are rounded to an
//! integer and grouped by thousands with `.` (e.g. `1.250.000`).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::shared::constants::MAX_PRICE;

/// Format an amount as whole VND with `.` thousands separators
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Like [`format_currency`], treating a missing amount as zero
pub fn format_optional_currency(amount: Option<Decimal>) -> String {
    format_currency(amount.unwrap_or(Decimal::ZERO))
}

/// Currency with the unit suffix used on invoices
pub fn format_vnd(amount: Decimal) -> String {
    format!("{} VND", format_currency(amount))
}

/// Exact price for a form input, with `,` as the decimal separator.
///
/// Never contains `.`, so [`parse_price`] reads it back unchanged.
pub fn format_price_input(amount: Decimal) -> String {
    amount.normalize().to_string().replace('.', ",")
}

/// Parse a price typed into a form.
///
/// Accepts plain numbers and numbers grouped the way [`format_currency`] prints them.
/// Prices above [`MAX_PRICE`] are refused.
pub fn parse_price(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = if trimmed.matches('.').count() > 1
        || (trimmed.contains('.') && trimmed.rsplit('.').next().is_some_and(|s| s.len() == 3))
    {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.replace(',', ".")
    };

    normalized
        .parse::<Decimal>()
        .ok()
        .filter(|price| !price.is_sign_negative() && *price <= Decimal::from(MAX_PRICE))
}
