// src/connectors/traits.rs
use crate::errors::{PublishError, QuoteError};
use crate::types::PortfolioSnapshot;
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn name(&self) -> &str;

    /// Last traded price for `symbol`.
    async fn fetch(&self, symbol: &str) -> Result<Decimal, QuoteError>;
}

#[async_trait]
pub trait PublishSink: Send + Sync {
    async fn publish(&self, snapshot: &PortfolioSnapshot) -> Result<(), PublishError>;
}
