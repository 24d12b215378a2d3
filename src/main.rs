// src/main.rs
use crate::config::AppConfig;
use crate::connectors::naver::NaverQuoteClient;
use crate::core::engine::{CycleOutcome, MonitorEngine};
use crate::core::session::{AlwaysOpen, SessionCalendar};
use crate::storage::SnapshotPublisher;
use crate::utils::logging::init_tracing;
use chrono::Utc;
use dotenvy::dotenv;
use std::env;
use tracing::{info, warn};

mod config;
mod connectors;
mod core;
mod errors;
mod storage;
mod types;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // 1. Load Configuration (any error here is fatal, nothing has been fetched yet)
    let config_path = env::var("MONITOR_CONFIG").unwrap_or_else(|_| "Settings".to_string());
    let config = AppConfig::load(&config_path)?;

    let run_once = env::var("RUN_ONCE")
        .unwrap_or("false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let _log_guard = init_tracing(&config.logging)?;
    if config.positions.is_empty() {
        warn!("No positions configured, snapshots will be empty");
    }

    println!("========================================");
    println!("       L/S POSITION MONITOR - v{}", env!("CARGO_PKG_VERSION"));
    println!("========================================");
    println!("Positions: {}", config.positions.len());
    println!("Currency:  {}", config.currency);
    println!(
        "Policy:    missing quote {:?}, ratio basis {:?}",
        config.valuation.missing_quote, config.valuation.ratio_basis
    );
    println!("Mode:      {}", if run_once { "single cycle" } else { "loop" });
    println!("========================================");

    // 2. Initialize Components
    let quote_source = NaverQuoteClient::new(&config.quotes)?;
    let session: Box<dyn SessionCalendar> = match config.session.clone() {
        Some(session) => Box::new(session),
        None => Box::new(AlwaysOpen),
    };
    let publisher = SnapshotPublisher::from_config(&config.publish);

    let engine = MonitorEngine::new(&config, Box::new(quote_source), session, Box::new(publisher));

    // 3. Run Engine
    if run_once {
        if let CycleOutcome::OutsideSession = engine.run_cycle(Utc::now()).await {
            info!("Outside trading session, nothing published");
        }
        return Ok(());
    }

    engine.run().await
}
