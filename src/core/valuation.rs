// src/core/valuation.rs
use crate::types::{EnrichedPosition, Position, PriceSource, Quote, Side};
use crate::utils::numeric::safe_ratio;
use rust_decimal::Decimal;
use serde::Deserialize;

/// What to do with a position whose quote could not be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingQuotePolicy {
    /// Leave the position out of the snapshot and out of the totals.
    Skip,
    /// Value the position at its average price: zero P&L, exposure still counts.
    #[default]
    Fallback,
}

/// Denominator of `pnl_ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioBasis {
    /// avg_price * qty, fixed for the life of the position.
    #[default]
    Exposure,
    /// last_price * qty, moves with the market.
    MarketValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Valuation {
    Priced(EnrichedPosition),
    Skipped,
}

/// Marks one position to market. Both policies come from the `[valuation]`
/// config section; the struct itself is that section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PositionValuator {
    pub missing_quote: MissingQuotePolicy,
    pub ratio_basis: RatioBasis,
}

impl PositionValuator {
    pub fn new(missing_quote: MissingQuotePolicy, ratio_basis: RatioBasis) -> Self {
        Self {
            missing_quote,
            ratio_basis,
        }
    }

    /// A quote whose notional does not fit in a `Decimal` is handled like an
    /// unavailable one, so valuation never panics on overflow.
    pub fn valuate(&self, position: &Position, quote: Quote) -> Valuation {
        if let Quote::Last(price) = quote {
            if let Some(enriched) = self.mark(position, price, PriceSource::Quote) {
                return Valuation::Priced(enriched);
            }
        }

        match self.missing_quote {
            MissingQuotePolicy::Skip => Valuation::Skipped,
            MissingQuotePolicy::Fallback => self
                .mark(position, position.avg_price, PriceSource::Fallback)
                .map(Valuation::Priced)
                .unwrap_or(Valuation::Skipped),
        }
    }

    /// `None` on arithmetic overflow.
    fn mark(
        &self,
        position: &Position,
        last_price: Decimal,
        price_source: PriceSource,
    ) -> Option<EnrichedPosition> {
        let qty = position.quantity;
        let exposure = position.avg_price.checked_mul(qty)?;
        let market_value = last_price.checked_mul(qty)?;
        let spread = match position.side {
            Side::Long => last_price.checked_sub(position.avg_price)?,
            Side::Short => position.avg_price.checked_sub(last_price)?,
        };
        let pnl = spread.checked_mul(qty)?;
        let denominator = match self.ratio_basis {
            RatioBasis::Exposure => exposure,
            RatioBasis::MarketValue => market_value,
        };

        Some(EnrichedPosition {
            position: position.clone(),
            last_price,
            exposure,
            market_value,
            pnl,
            pnl_ratio: safe_ratio(pnl, denominator),
            price_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn position(side: Side, qty: Decimal, avg_price: Decimal) -> Position {
        Position {
            symbol: "000660".to_string(),
            name: "SK hynix".to_string(),
            side,
            quantity: qty,
            avg_price,
            group: "Semis".to_string(),
        }
    }

    fn priced(valuation: Valuation) -> EnrichedPosition {
        match valuation {
            Valuation::Priced(e) => e,
            Valuation::Skipped => panic!("expected a priced position"),
        }
    }

    #[test]
    fn exposure_ignores_last_price() {
        let v = PositionValuator::default();
        let pos = position(Side::Long, dec!(3), dec!(200));
        for last in [dec!(0), dec!(150), dec!(200), dec!(10000)] {
            let e = priced(v.valuate(&pos, Quote::Last(last)));
            assert_eq!(e.exposure, dec!(600));
            assert_eq!(e.market_value, last * dec!(3));
        }
    }

    #[test]
    fn short_gains_when_price_falls() {
        let v = PositionValuator::default();
        let e = priced(v.valuate(&position(Side::Short, dec!(2), dec!(100)), Quote::Last(dec!(120))));
        assert_eq!(e.pnl, dec!(-40));
        assert_eq!(e.pnl_ratio, dec!(-0.2));

        let e = priced(v.valuate(&position(Side::Short, dec!(2), dec!(100)), Quote::Last(dec!(90))));
        assert_eq!(e.pnl, dec!(20));
    }

    #[test]
    fn market_value_basis_divides_by_current_notional() {
        let v = PositionValuator::new(MissingQuotePolicy::Fallback, RatioBasis::MarketValue);
        let e = priced(v.valuate(&position(Side::Long, dec!(10), dec!(100)), Quote::Last(dec!(125))));
        assert_eq!(e.pnl, dec!(250));
        assert_eq!(e.pnl_ratio, dec!(0.2));
    }

    #[test]
    fn market_value_basis_guards_zero_price() {
        let v = PositionValuator::new(MissingQuotePolicy::Fallback, RatioBasis::MarketValue);
        let e = priced(v.valuate(&position(Side::Short, dec!(4), dec!(25)), Quote::Last(Decimal::ZERO)));
        assert_eq!(e.market_value, Decimal::ZERO);
        assert_eq!(e.pnl, dec!(100));
        assert_eq!(e.pnl_ratio, Decimal::ZERO);
    }

    #[test]
    fn fallback_marks_price_source() {
        let v = PositionValuator::default();
        let e = priced(v.valuate(&position(Side::Short, dec!(7), dec!(31)), Quote::Unavailable));
        assert_eq!(e.price_source, PriceSource::Fallback);
        assert_eq!(e.last_price, dec!(31));
        assert_eq!(e.pnl, Decimal::ZERO);

        let e = priced(v.valuate(&position(Side::Short, dec!(7), dec!(31)), Quote::Last(dec!(30))));
        assert_eq!(e.price_source, PriceSource::Quote);
    }

    #[test]
    fn skip_policy_only_affects_missing_quotes() {
        let v = PositionValuator::new(MissingQuotePolicy::Skip, RatioBasis::Exposure);
        let pos = position(Side::Long, dec!(1), dec!(10));
        assert_eq!(v.valuate(&pos, Quote::Unavailable), Valuation::Skipped);
        assert!(matches!(v.valuate(&pos, Quote::Last(dec!(11))), Valuation::Priced(_)));
    }

    #[test]
    fn policies_deserialize_from_snake_case() {
        let v: PositionValuator =
            serde_json::from_str(r#"{"missing_quote":"skip","ratio_basis":"market_value"}"#).unwrap();
        assert_eq!(v, PositionValuator::new(MissingQuotePolicy::Skip, RatioBasis::MarketValue));

        let v: PositionValuator = serde_json::from_str("{}").unwrap();
        assert_eq!(v, PositionValuator::default());
    }

    #[test]
    fn overflowing_quote_falls_back_to_average_price() {
        let v = PositionValuator::default();
        let pos = position(Side::Long, dec!(100000000000000), dec!(100000000000000));
        let e = priced(v.valuate(&pos, Quote::Last(dec!(1000000000000000000000))));
        assert_eq!(e.price_source, PriceSource::Fallback);
        assert_eq!(e.last_price, dec!(100000000000000));
        assert_eq!(e.pnl, Decimal::ZERO);
    }

    #[test]
    fn overflowing_quote_is_skipped_under_skip_policy() {
        let v = PositionValuator::new(MissingQuotePolicy::Skip, RatioBasis::Exposure);
        let pos = position(Side::Short, dec!(100000000000000), dec!(1));
        assert_eq!(
            v.valuate(&pos, Quote::Last(dec!(1000000000000000000000))),
            Valuation::Skipped
        );
    }

    #[test]
    fn overflowing_cost_basis_is_skipped_not_panicking() {
        let v = PositionValuator::default();
        let pos = position(Side::Long, dec!(1000000000000000), dec!(1000000000000000));
        assert_eq!(v.valuate(&pos, Quote::Last(dec!(2))), Valuation::Skipped);
        assert_eq!(v.valuate(&pos, Quote::Unavailable), Valuation::Skipped);
    }
}
