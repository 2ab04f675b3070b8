//! ScanLab Core — price series normalization, strategy seam, signal
//! interpretation and a reference backtest engine.
//!
//! - Domain types (bars, price series, signal sets)
//! - CSV/URL ingestion into a clean, single-offset `PriceSeries`
//! - `StrategyEvaluator` trait plus a validating adapter
//! - Recency classification and transition-to-bar alignment of signals
//! - `BacktestEngine` trait with a long-only reference portfolio

pub mod backtest;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod signals;
pub mod strategy;
