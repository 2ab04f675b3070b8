//! SignalSet — a strategy's output for one price series.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Buy/sell positions plus per-transition entry/exit flags and a backtest summary.
///
/// `entry_flags[i]` / `exit_flags[i]` describe the transition from bar `i` to
/// bar `i + 1`, so both are one element shorter than the series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    pub buy_indices: Vec<usize>,
    pub sell_indices: Vec<usize>,
    pub entry_flags: Vec<bool>,
    pub exit_flags: Vec<bool>,
    pub total_gain: f64,
    pub invested_capital: f64,
}

/// Structural violations of the SignalSet contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalShapeError {
    #[error("{side} index {index} out of range for series of {len} bars")]
    IndexOutOfRange {
        side: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{which} has {actual} flags, expected {expected} for series of {len} bars")]
    FlagLength {
        which: &'static str,
        expected: usize,
        actual: usize,
        len: usize,
    },
}

impl SignalSet {
    /// Check the set against a series of `len` bars.
    pub fn validate(&self, len: usize) -> Result<(), SignalShapeError> {
        for (side, indices) in [("buy", &self.buy_indices), ("sell", &self.sell_indices)] {
            if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                return Err(SignalShapeError::IndexOutOfRange { side, index, len });
            }
        }

        let expected = len.saturating_sub(1);
        for (which, flags) in [("entry_flags", &self.entry_flags), ("exit_flags", &self.exit_flags)] {
            if flags.len() != expected {
                return Err(SignalShapeError::FlagLength {
                    which,
                    expected,
                    actual: flags.len(),
                    len,
                });
            }
        }

        Ok(())
    }

    /// Last buy position, if any.
    pub fn last_buy(&self) -> Option<usize> {
        self.buy_indices.last().copied()
    }

    /// Last sell position, if any.
    pub fn last_sell(&self) -> Option<usize> {
        self.sell_indices.last().copied()
    }
}
