//! Strategy seam.
//!
//! A strategy turns one `PriceSeries` into a `SignalSet`. The scanner only
//! sees the `StrategyEvaluator` trait; `StrategyAdapter` wraps an evaluator
//! with parameter checks and shape validation so downstream components can
//! rely on the `SignalSet` contract.

pub mod rsi_ema;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceSeries, SignalSet, SignalShapeError};

pub use rsi_ema::RsiEmaStrategy;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error("invalid strategy parameters: {0}")]
    InvalidParams(String),

    #[error("strategy failed: {0}")]
    Failed(String),

    #[error("invalid signal shape: {0}")]
    InvalidShape(String),

    #[error("{side} index {index} out of range for series of {len} bars")]
    IndexOutOfRange {
        side: &'static str,
        index: usize,
        len: usize,
    },
}

impl From<SignalShapeError> for StrategyError {
    fn from(e: SignalShapeError) -> Self {
        match e {
            SignalShapeError::IndexOutOfRange { side, index, len } => {
                StrategyError::IndexOutOfRange { side, index, len }
            }
            other @ SignalShapeError::FlagLength { .. } => {
                StrategyError::InvalidShape(other.to_string())
            }
        }
    }
}

/// Strategy and backtest parameters.
///
/// The five core fields are always present. `delay`, `max_buy`, `max_sell`
/// and `print_log` are optional knobs a strategy may ignore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    pub initial_money: f64,
    pub rsi_period: usize,
    pub low_rsi: f64,
    pub high_rsi: f64,
    pub ema_period: usize,
    /// Minimum bars between two trades.
    pub delay: Option<usize>,
    /// Maximum units bought per buy signal.
    pub max_buy: Option<f64>,
    /// Maximum units sold per sell signal.
    pub max_sell: Option<f64>,
    pub print_log: bool,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            initial_money: 10_000.0,
            rsi_period: 14,
            low_rsi: 30.0,
            high_rsi: 70.0,
            ema_period: 26,
            delay: None,
            max_buy: None,
            max_sell: None,
            print_log: false,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<(), StrategyError> {
        let invalid = |msg: String| Err(StrategyError::InvalidParams(msg));

        if !(self.initial_money.is_finite() && self.initial_money > 0.0) {
            return invalid(format!("initial_money must be > 0, got {}", self.initial_money));
        }
        if self.rsi_period == 0 || self.ema_period == 0 {
            return invalid("rsi_period and ema_period must be >= 1".into());
        }
        if !(self.low_rsi < self.high_rsi) {
            return invalid(format!(
                "low_rsi ({}) must be below high_rsi ({})",
                self.low_rsi, self.high_rsi
            ));
        }
        for (name, limit) in [("max_buy", self.max_buy), ("max_sell", self.max_sell)] {
            if let Some(v) = limit {
                if !(v.is_finite() && v > 0.0) {
                    return invalid(format!("{name} must be > 0, got {v}"));
                }
            }
        }
        Ok(())
    }
}

/// A trading strategy: price series in, signal set out.
///
/// Implementations must not mutate shared state; the scanner may call
/// `evaluate` from several threads at once.
pub trait StrategyEvaluator: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        series: &PriceSeries,
        params: &StrategyParams,
    ) -> Result<SignalSet, StrategyError>;
}

/// Invokes a strategy and checks its output against the series.
#[derive(Clone)]
pub struct StrategyAdapter {
    evaluator: Arc<dyn StrategyEvaluator>,
    params: StrategyParams,
}

impl fmt::Debug for StrategyAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyAdapter")
            .field("strategy", &self.evaluator.name())
            .field("params", &self.params)
            .finish()
    }
}

impl StrategyAdapter {
    pub fn new(evaluator: Arc<dyn StrategyEvaluator>, params: StrategyParams) -> Self {
        Self { evaluator, params }
    }

    pub fn strategy_name(&self) -> &str {
        self.evaluator.name()
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    /// Run the strategy once. Errors from the strategy are returned unchanged.
    pub fn evaluate(&self, series: &PriceSeries) -> Result<SignalSet, StrategyError> {
        self.params.validate()?;
        let signals = self.evaluator.evaluate(series, &self.params)?;
        signals.validate(series.len())?;
        Ok(signals)
    }
}
