//! Backtest seam: aligned entry/exit flags in, portfolio statistics out.
//!
//! `BacktestEngine` is the contract; `SignalPortfolio` is a long-only,
//! all-in reference engine with a flat fee fraction on both sides.

pub mod cost_model;
pub mod portfolio;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cost_model::CostModel;
pub use portfolio::SignalPortfolio;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    #[error("length mismatch: {closes} closes, {entries} entry flags, {exits} exit flags")]
    LengthMismatch {
        closes: usize,
        entries: usize,
        exits: usize,
    },

    #[error("invalid backtest input: {0}")]
    InvalidInput(String),
}

/// Summary of one simulated run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    pub start_value: f64,
    pub end_value: f64,
    /// Fractional return: (end - start) / start.
    pub total_return: f64,
    pub total_fees: f64,
    /// Round trips opened (an open position at the end still counts).
    pub trade_count: usize,
    /// Fraction of closed round trips with positive P&L.
    pub win_rate: f64,
    /// Most negative peak-to-trough decline of the equity curve, as a fraction.
    pub max_drawdown: f64,
    pub bar_count: usize,
    pub freq_label: String,
}

/// Simulates a portfolio driven by per-bar entry/exit flags.
///
/// `entries` and `exits` must be aligned to `closes` (same length, one flag per bar).
pub trait BacktestEngine: Send + Sync {
    fn run(
        &self,
        closes: &[f64],
        entries: &[bool],
        exits: &[bool],
        costs: &CostModel,
    ) -> Result<BacktestStats, BacktestError>;
}

/// Peak-to-trough drawdown of an equity curve (0 or negative).
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let Some(&first) = equity_curve.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &eq in equity_curve {
        peak = peak.max(eq);
        if peak > 0.0 {
            max_dd = max_dd.min((eq - peak) / peak);
        }
    }
    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawdown_known_value() {
        let dd = max_drawdown(&[100.0, 110.0, 90.0, 95.0]);
        assert!((dd - (90.0 - 110.0) / 110.0).abs() < 1e-12);
    }

    #[test]
    fn drawdown_of_rising_or_empty_curve_is_zero() {
        assert_eq!(max_drawdown(&[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }
}
