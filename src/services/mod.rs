// src/services/mod.rs
pub mod charts;
pub mod peers;
pub mod report;
pub mod valuation;
