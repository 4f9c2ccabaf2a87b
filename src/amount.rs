//! Parsing of user-entered and imported monetary amounts.
//!
//! Amounts may use either a comma or a full stop as the decimal separator,
//! e.g. "1.234,56", "1,234.56", "-12,5" and "R$ 10,00" are all accepted.

use crate::Error;

/// The largest amount a single transaction may have.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// Parse a positive amount as entered in a form.
///
/// The amount is rounded to whole cents, so "0,004" is rejected as zero.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the text is not a number, is larger than
/// [MAX_AMOUNT] or is not at least one cent.
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    let amount = parse_signed_amount(text)?;

    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(text.to_owned()))
    }
}

/// Parse an amount that may be negative, ignoring currency symbols and
/// whitespace. The result is rounded to whole cents.
///
/// When both separators appear, the last one is the decimal separator. A
/// separator that appears more than once is a thousands separator. A single
/// comma or full stop is a decimal separator.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the text does not contain a number or the
/// magnitude is larger than [MAX_AMOUNT].
pub fn parse_signed_amount(text: &str) -> Result<f64, Error> {
    let invalid = || Error::InvalidAmount(text.to_owned());

    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-' | '+'))
        .collect();

    let (is_negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    if unsigned.is_empty() || unsigned.contains(['-', '+']) {
        return Err(invalid());
    }

    let decimal_separator = decimal_separator(unsigned);

    let normalized: String = unsigned
        .chars()
        .filter_map(|c| match c {
            c if Some(c) == decimal_separator => Some('.'),
            ',' | '.' => None,
            c => Some(c),
        })
        .collect();

    let magnitude: f64 = normalized.parse().map_err(|_| invalid())?;

    if !magnitude.is_finite() || magnitude > MAX_AMOUNT {
        return Err(invalid());
    }

    let magnitude = round_to_cents(magnitude);

    Ok(if is_negative { -magnitude } else { magnitude })
}

fn decimal_separator(number: &str) -> Option<char> {
    let last_comma = number.rfind(',');
    let last_point = number.rfind('.');

    match (last_comma, last_point) {
        (Some(comma), Some(point)) => Some(if comma > point { ',' } else { '.' }),
        (Some(_), None) if number.matches(',').count() == 1 => Some(','),
        (None, Some(_)) if number.matches('.').count() == 1 => Some('.'),
        _ => None,
    }
}

/// Convert an amount to whole cents, rounding to the nearest cent.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Convert whole cents back into an amount.
pub fn from_cents(cents: impl Into<i128>) -> f64 {
    cents.into() as f64 / 100.0
}

/// Round `amount` to the nearest cent.
pub fn round_to_cents(amount: f64) -> f64 {
    from_cents(to_cents(amount))
}

/// Whether `amount` can be stored as a transaction amount: a whole number of
/// cents, at least one cent and at most [MAX_AMOUNT].
pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite()
        && amount > 0.0
        && amount <= MAX_AMOUNT
        && to_cents(amount) > 0
        && round_to_cents(amount) == amount
}
