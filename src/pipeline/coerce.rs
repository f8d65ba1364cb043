//! The one rule for turning sheet cells into numbers: parse or fall back to a
//! default, never fail.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_PRICE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.,]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericPolicy {
    /// Truncated toward zero.
    Integer,
    Decimal,
}

/// Parses a plain number written with either `.` or `,` as the decimal
/// separator. Only digits, separators and a sign are accepted, so `inf`,
/// `NaN` and exponents are rejected.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '+' | '-'))
    {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Negative values count as malformed: every field fed by this helper is a
/// quantity or a price.
pub fn parse_or_default(cell: &str, policy: NumericPolicy, default: f64) -> f64 {
    match parse_number(cell) {
        Some(v) if v >= 0.0 => match policy {
            NumericPolicy::Integer => v.trunc(),
            NumericPolicy::Decimal => v,
        },
        _ => default,
    }
}

/// Millilitre counts: integer policy, default zero.
pub fn to_ml(cell: &str) -> u32 {
    parse_or_default(cell, NumericPolicy::Integer, 0.0) as u32
}

/// Currency signs organizers type next to prices.
fn is_currency_sign(c: char) -> bool {
    matches!(
        c,
        '$' | '€' | '£' | '¥' | '¢' | '₸' | '₽' | '₴' | '₹' | '₺' | '₩' | '₪' | '₫' | '₦' | '₱' | '₾'
            | '₼' | '₿'
    )
}

/// A cell is a price candidate when, after dropping surrounding whitespace and
/// currency signs, it parses as a strictly positive number. Anything else
/// around the digits (`%`, `№`, letters, a Unicode minus) disqualifies it.
pub fn price_candidate(cell: &str) -> Option<f64> {
    let core = cell.trim_matches(|c: char| c.is_whitespace() || is_currency_sign(c));
    parse_number(core).filter(|v| *v > 0.0)
}

/// Final pass over the chosen price cell: keep digits and separators only.
pub fn sanitize_price(cell: &str) -> f64 {
    let digits = NON_PRICE_CHARS.replace_all(cell, "");
    parse_or_default(&digits, NumericPolicy::Decimal, 0.0)
}

/// Price of a row: the first candidate cell in column order, sanitized, or zero.
pub fn extract_price<'a>(cells: impl IntoIterator<Item = &'a String>) -> f64 {
    cells
        .into_iter()
        .find(|cell| price_candidate(cell).is_some())
        .map(|cell| sanitize_price(cell))
        .unwrap_or(0.0)
}
