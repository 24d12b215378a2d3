// src/types.rs
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    #[default]
    Long,
    Short,
}

impl FromStr for Side {
    type Err = String;

    /// Case-insensitive: "long", "Long" and "LONG" are the same side.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LONG" => Ok(Side::Long),
            "SHORT" => Ok(Side::Short),
            _ => Err(format!("unknown side '{}'", s)),
        }
    }
}

/// A validated position, as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub symbol: String,
    pub name: String,
    pub side: Side,
    #[serde(rename = "qty", with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_price: Decimal, // cost basis
    pub group: String,
}

/// Outcome of a single quote fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Last(Decimal),
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Quote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPosition {
    #[serde(flatten)]
    pub position: Position,
    #[serde(with = "rust_decimal::serde::float")]
    pub last_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub exposure: Decimal,
    #[serde(rename = "mv", with = "rust_decimal::serde::float")]
    pub market_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pnl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pnl_ratio: Decimal,
    pub price_source: PriceSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub exposure: Decimal,
    pub pnl: Decimal,
    pub pnl_ratio: Decimal,
}

/// Subtotal of the positions sharing one display group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotals {
    pub group: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub exposure: Decimal,
    #[serde(rename = "mv", with = "rust_decimal::serde::float")]
    pub market_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pnl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pnl_ratio: Decimal,
}

/// The document handed to the publisher. Field names are what the viewer reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSnapshot {
    pub as_of: String,
    pub currency: String,
    pub positions: Vec<EnrichedPosition>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_exposure: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_pnl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_pnl_ratio: Decimal,
    pub groups: Vec<GroupTotals>,
    pub skipped: Vec<String>,
}
