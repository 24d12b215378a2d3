// src/core/snapshot.rs
use crate::types::{EnrichedPosition, GroupTotals, PortfolioSnapshot, Totals};
use chrono::{DateTime, Utc};

pub const AS_OF_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Assembles a snapshot. No arithmetic happens here; positions keep the
/// order they were given in.
pub struct SnapshotBuilder {
    as_of: String,
    currency: String,
    positions: Vec<EnrichedPosition>,
    totals: Totals,
    groups: Vec<GroupTotals>,
    skipped: Vec<String>,
}

impl SnapshotBuilder {
    pub fn new(timestamp: DateTime<Utc>, currency: &str) -> Self {
        Self {
            as_of: timestamp.format(AS_OF_FORMAT).to_string(),
            currency: currency.to_string(),
            positions: Vec::new(),
            totals: Totals::default(),
            groups: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn positions(mut self, positions: Vec<EnrichedPosition>, totals: Totals) -> Self {
        self.positions = positions;
        self.totals = totals;
        self
    }

    pub fn groups(mut self, groups: Vec<GroupTotals>) -> Self {
        self.groups = groups;
        self
    }

    pub fn skipped(mut self, skipped: Vec<String>) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn build(self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            as_of: self.as_of,
            currency: self.currency,
            positions: self.positions,
            total_exposure: self.totals.exposure,
            total_pnl: self.totals.pnl,
            total_pnl_ratio: self.totals.pnl_ratio,
            groups: self.groups,
            skipped: self.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn as_of_is_utc_seconds() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 4, 0, 30, 5).unwrap();
        let snap = SnapshotBuilder::new(ts, "KRW").build();
        assert_eq!(snap.as_of, "2025-03-04T00:30:05Z");
        assert_eq!(snap.currency, "KRW");
        assert!(snap.positions.is_empty());
        assert!(snap.groups.is_empty());
    }

    #[test]
    fn totals_are_copied_verbatim() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let totals = Totals {
            exposure: dec!(1500),
            pnl: dec!(60),
            pnl_ratio: dec!(0.04),
        };
        let snap = SnapshotBuilder::new(ts, "USD")
            .positions(Vec::new(), totals)
            .skipped(vec!["005930".to_string()])
            .build();
        assert_eq!(snap.total_exposure, dec!(1500));
        assert_eq!(snap.total_pnl, dec!(60));
        assert_eq!(snap.total_pnl_ratio, dec!(0.04));
        assert_eq!(snap.skipped, vec!["005930".to_string()]);
    }
}
