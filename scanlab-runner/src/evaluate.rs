//! Per-symbol evaluation: source → series → signals → recommendation.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use scanlab_core::data::{DataError, Normalizer, SourceId};
use scanlab_core::signals::RecencyWindow;
use scanlab_core::strategy::{StrategyAdapter, StrategyError, StrategyEvaluator, StrategyParams};

/// Why one symbol could not be evaluated. Never aborts a scan.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error("evaluation timed out after {0:?}")]
    TimedOut(Duration),

    #[error("evaluation worker exited without a result")]
    WorkerLost,
}

/// Verdict for one evaluated symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub symbol_id: String,
    pub should_buy: bool,
    pub should_sell: bool,
    /// Close of the final bar, the recommended price.
    pub last_close: f64,
    pub total_gain: f64,
    pub series_start_date: NaiveDate,
    pub series_end_date: NaiveDate,
}

impl RecommendationResult {
    pub fn is_actionable(&self) -> bool {
        self.should_buy || self.should_sell
    }
}

/// Everything needed to evaluate one source. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SymbolEvaluator {
    normalizer: Normalizer,
    adapter: StrategyAdapter,
    window: RecencyWindow,
}

impl SymbolEvaluator {
    pub fn new(
        normalizer: Normalizer,
        strategy: Arc<dyn StrategyEvaluator>,
        params: StrategyParams,
        window: RecencyWindow,
    ) -> Self {
        Self {
            normalizer,
            adapter: StrategyAdapter::new(strategy, params),
            window,
        }
    }

    pub fn window(&self) -> RecencyWindow {
        self.window
    }

    pub fn params(&self) -> &StrategyParams {
        self.adapter.params()
    }

    pub fn evaluate(&self, source: &SourceId) -> Result<RecommendationResult, EvaluationError> {
        let series = self.normalizer.load(source)?;
        let (Some(start), Some(end)) = (series.start_date(), series.end_date()) else {
            return Err(DataError::parse(source.to_string(), "no bars after normalization").into());
        };

        let signals = self.adapter.evaluate(&series)?;
        let verdict = self.window.classify(&signals, series.len());

        debug!(
            "{}: {} bars, buy={} sell={} gain={:.2}",
            series.symbol,
            series.len(),
            verdict.should_buy,
            verdict.should_sell,
            signals.total_gain
        );

        Ok(RecommendationResult {
            symbol_id: series.symbol.clone(),
            should_buy: verdict.should_buy,
            should_sell: verdict.should_sell,
            last_close: series.last_close(),
            total_gain: signals.total_gain,
            series_start_date: start,
            series_end_date: end,
        })
    }
}
