// src/core/portfolio.rs
use crate::core::valuation::{PositionValuator, Valuation};
use crate::types::{EnrichedPosition, GroupTotals, Position, Quote, Totals};
use crate::utils::numeric::safe_ratio;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Values every position against the fetched quotes, keeping input order.
/// Returns the priced positions and the symbols the valuator skipped.
/// A symbol absent from `quotes` counts as unavailable.
pub fn valuate_all(
    valuator: &PositionValuator,
    positions: &[Position],
    quotes: &HashMap<String, Quote>,
) -> (Vec<EnrichedPosition>, Vec<String>) {
    let mut priced = Vec::with_capacity(positions.len());
    let mut skipped = Vec::new();

    for position in positions {
        let quote = quotes
            .get(&position.symbol)
            .copied()
            .unwrap_or(Quote::Unavailable);
        match valuator.valuate(position, quote) {
            Valuation::Priced(enriched) => priced.push(enriched),
            Valuation::Skipped => skipped.push(position.symbol.clone()),
        }
    }

    (priced, skipped)
}

/// Sums saturate at `Decimal::MAX`/`MIN` instead of panicking.
pub fn aggregate(positions: &[EnrichedPosition]) -> Totals {
    let exposure = positions
        .iter()
        .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.exposure));
    let pnl = positions
        .iter()
        .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.pnl));

    Totals {
        exposure,
        pnl,
        pnl_ratio: safe_ratio(pnl, exposure),
    }
}

/// Subtotals per display group, in order of first appearance.
pub fn group_totals(positions: &[EnrichedPosition]) -> Vec<GroupTotals> {
    let mut groups: Vec<GroupTotals> = Vec::new();

    for p in positions {
        let idx = match groups.iter().position(|g| g.group == p.position.group) {
            Some(idx) => idx,
            None => {
                groups.push(GroupTotals {
                    group: p.position.group.clone(),
                    exposure: Decimal::ZERO,
                    market_value: Decimal::ZERO,
                    pnl: Decimal::ZERO,
                    pnl_ratio: Decimal::ZERO,
                });
                groups.len() - 1
            }
        };
        let g = &mut groups[idx];
        g.exposure = g.exposure.saturating_add(p.exposure);
        g.market_value = g.market_value.saturating_add(p.market_value);
        g.pnl = g.pnl.saturating_add(p.pnl);
    }

    for g in &mut groups {
        g.pnl_ratio = safe_ratio(g.pnl, g.exposure);
    }
    groups
}
