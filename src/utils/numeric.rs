// src/utils/numeric.rs
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// numerator / denominator, or zero when the denominator is zero or the
/// quotient does not fit in a `Decimal`.
pub fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Reads a price that may arrive as a JSON number or as a string
/// ("71500", "71,500"). Goes through the textual form so 0.1 stays 0.1.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(&s.trim().replace(',', "")).ok(),
        _ => None,
    }
}
