// src/core/engine.rs
use crate::config::AppConfig;
use crate::connectors::traits::{PublishSink, QuoteSource};
use crate::core::portfolio::{aggregate, group_totals, valuate_all};
use crate::core::session::SessionCalendar;
use crate::core::snapshot::SnapshotBuilder;
use crate::core::valuation::PositionValuator;
use crate::types::{PortfolioSnapshot, Position, Quote};
use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    OutsideSession,
    Published(PortfolioSnapshot),
    /// The snapshot was computed but could not be written or pushed.
    PublishFailed(PortfolioSnapshot),
}

pub struct MonitorEngine {
    currency: String,
    positions: Vec<Position>,
    valuator: PositionValuator,
    interval: Duration,
    quote_source: Box<dyn QuoteSource>,
    session: Box<dyn SessionCalendar>,
    publisher: Box<dyn PublishSink>,
}

impl MonitorEngine {
    pub fn new(
        config: &AppConfig,
        quote_source: Box<dyn QuoteSource>,
        session: Box<dyn SessionCalendar>,
        publisher: Box<dyn PublishSink>,
    ) -> Self {
        Self {
            currency: config.currency.clone(),
            positions: config.positions.clone(),
            valuator: config.valuation,
            interval: Duration::from_secs(config.schedule.interval_secs),
            quote_source,
            session,
            publisher,
        }
    }

    /// One request per distinct symbol, all in flight at once. Every symbol
    /// ends up in the map; failures become `Quote::Unavailable`.
    async fn fetch_quotes(&self) -> HashMap<String, Quote> {
        let mut symbols: Vec<&str> = Vec::new();
        for p in &self.positions {
            if !symbols.contains(&p.symbol.as_str()) {
                symbols.push(&p.symbol);
            }
        }

        let source = self.quote_source.as_ref();
        let fetches = symbols.into_iter().map(|symbol| async move {
            let quote = match source.fetch(symbol).await {
                Ok(price) if price > Decimal::ZERO => Quote::Last(price),
                Ok(price) => {
                    warn!("Ignoring non-positive quote for {}: {}", symbol, price);
                    Quote::Unavailable
                }
                Err(e) => {
                    warn!("Quote unavailable for {} ({}): {}", symbol, source.name(), e);
                    Quote::Unavailable
                }
            };
            (symbol.to_string(), quote)
        });

        join_all(fetches).await.into_iter().collect()
    }

    /// Pure part of the cycle.
    pub fn valuate(
        &self,
        now: DateTime<Utc>,
        quotes: &HashMap<String, Quote>,
    ) -> PortfolioSnapshot {
        let (priced, skipped) = valuate_all(&self.valuator, &self.positions, quotes);
        let totals = aggregate(&priced);
        let groups = group_totals(&priced);

        SnapshotBuilder::new(now, &self.currency)
            .positions(priced, totals)
            .groups(groups)
            .skipped(skipped)
            .build()
    }

    pub async fn run_cycle(&self, now: DateTime<Utc>) -> CycleOutcome {
        if !self.session.is_open(now) {
            debug!("Outside trading session at {}, skipping cycle", now);
            return CycleOutcome::OutsideSession;
        }

        let quotes = self.fetch_quotes().await;
        let missing = quotes.values().filter(|q| **q == Quote::Unavailable).count();
        if missing > 0 {
            warn!(
                "{} of {} quotes unavailable ({:?} policy)",
                missing,
                quotes.len(),
                self.valuator.missing_quote
            );
        }

        let snapshot = self.valuate(now, &quotes);
        info!(
            "Snapshot {}: {} positions, exposure {} {}, P&L {} ({:.2}%)",
            snapshot.as_of,
            snapshot.positions.len(),
            snapshot.total_exposure,
            snapshot.currency,
            snapshot.total_pnl,
            snapshot.total_pnl_ratio * Decimal::ONE_HUNDRED
        );

        match self.publisher.publish(&snapshot).await {
            Ok(()) => {
                info!("✅ Snapshot published");
                CycleOutcome::Published(snapshot)
            }
            Err(e) => {
                error!("⚠️ Publish failed: {}", e);
                CycleOutcome::PublishFailed(snapshot)
            }
        }
    }

    /// Runs a cycle every `interval` until Ctrl+C.
    pub async fn run(&self) -> Result<()> {
        info!(
            "Engine starting: {} positions, every {:?}",
            self.positions.len(),
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                res = &mut shutdown => {
                    res?;
                    info!("Shutdown requested, stopping engine");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_cycle(Utc::now()).await;
                }
            }
        }
        Ok(())
    }
}
