//! Omen - cryptocurrency price regression on market capitalization
//!
//! Fits a linear model of price against market cap on a coin's history,
//! evaluates it on a held-out tail, then predicts live prices on an interval.

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;
