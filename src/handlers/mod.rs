// src/handlers/mod.rs
pub mod error;
pub mod export;
pub mod query;
pub mod valuation;
