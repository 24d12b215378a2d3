// src/connectors/mod.rs
pub mod messages;
pub mod naver;
pub mod traits;
