// src/core/mod.rs
pub mod engine;
pub mod portfolio;
pub mod session;
pub mod snapshot;
pub mod valuation;
