//! Batch scanner: evaluate many sources, isolate per-symbol failures,
//! aggregate actionable results.
//!
//! One bad source (missing file, garbled CSV, strategy error, timeout) is
//! logged and recorded; the scan carries on. Outcomes are always folded in
//! input order, whether evaluation ran sequentially or on rayon.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use log::{error, info};
use rayon::prelude::*;

use scanlab_core::data::SourceId;
use scanlab_core::strategy::StrategyEvaluator;

use crate::config::{ConfigError, ScanConfig};
use crate::evaluate::{EvaluationError, RecommendationResult, SymbolEvaluator};

/// A source that could not be evaluated, with its cause.
#[derive(Debug)]
pub struct EvaluationFailure {
    pub symbol: String,
    pub source: String,
    pub cause: EvaluationError,
}

/// Aggregate of one scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Actionable results only, in input order.
    pub recommendations: Vec<RecommendationResult>,
    pub failures: Vec<EvaluationFailure>,
    /// Successfully evaluated sources, actionable or not.
    pub evaluated: usize,
    /// Dates of the first successfully evaluated source in input order.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl ScanOutcome {
    pub fn processed_any(&self) -> bool {
        self.evaluated > 0
    }

    pub fn failed_symbols(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.symbol.clone()).collect()
    }

    /// Fold per-source results, in order, into an outcome.
    pub fn collect(
        results: impl IntoIterator<Item = (SourceId, Result<RecommendationResult, EvaluationError>)>,
    ) -> Self {
        let mut outcome = ScanOutcome::default();
        for (source, result) in results {
            match result {
                Ok(rec) => {
                    outcome.evaluated += 1;
                    if outcome.date_range.is_none() {
                        outcome.date_range = Some((rec.series_start_date, rec.series_end_date));
                    }
                    if rec.is_actionable() {
                        outcome.recommendations.push(rec);
                    }
                }
                Err(cause) => {
                    let symbol = source.symbol();
                    let source = source.to_string();
                    error!("Error for {symbol} ({source}): {cause}");
                    outcome.failures.push(EvaluationFailure {
                        symbol,
                        source,
                        cause,
                    });
                }
            }
        }
        outcome
    }
}

/// Runs a `SymbolEvaluator` over a list of sources.
#[derive(Debug, Clone)]
pub struct BatchScanner {
    evaluator: SymbolEvaluator,
    parallel: bool,
    timeout: Option<Duration>,
}

impl BatchScanner {
    pub fn new(config: &ScanConfig, strategy: Arc<dyn StrategyEvaluator>) -> Result<Self, ConfigError> {
        config.validate()?;
        let evaluator = SymbolEvaluator::new(
            config.normalizer()?,
            strategy,
            config.strategy.clone(),
            config.recency_window(),
        );
        Ok(Self {
            evaluator,
            parallel: config.scan.parallel,
            timeout: config.symbol_timeout(),
        })
    }

    pub fn from_evaluator(evaluator: SymbolEvaluator) -> Self {
        Self {
            evaluator,
            parallel: false,
            timeout: None,
        }
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn evaluator(&self) -> &SymbolEvaluator {
        &self.evaluator
    }

    pub fn scan(&self, sources: &[SourceId]) -> ScanOutcome {
        info!(
            "scanning {} source(s), recency window {} bars{}",
            sources.len(),
            self.evaluator.window().bars,
            if self.parallel { ", parallel" } else { "" }
        );

        let results: Vec<_> = if self.parallel {
            sources
                .par_iter()
                .map(|source| (source.clone(), self.evaluate_one(source)))
                .collect()
        } else {
            sources
                .iter()
                .map(|source| (source.clone(), self.evaluate_one(source)))
                .collect()
        };

        let outcome = ScanOutcome::collect(results);
        info!(
            "scan finished: {} evaluated, {} actionable, {} failed",
            outcome.evaluated,
            outcome.recommendations.len(),
            outcome.failures.len()
        );
        outcome
    }

    fn evaluate_one(&self, source: &SourceId) -> Result<RecommendationResult, EvaluationError> {
        match self.timeout {
            None => self.evaluator.evaluate(source),
            Some(limit) => self.evaluate_with_deadline(source, limit),
        }
    }

    /// Evaluate on a worker thread and stop waiting after `limit`.
    ///
    /// A timed-out worker is detached; its eventual result is dropped.
    fn evaluate_with_deadline(
        &self,
        source: &SourceId,
        limit: Duration,
    ) -> Result<RecommendationResult, EvaluationError> {
        let (tx, rx) = mpsc::channel();
        let evaluator = self.evaluator.clone();
        let owned = source.clone();
        thread::spawn(move || {
            let _ = tx.send(evaluator.evaluate(&owned));
        });

        match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(EvaluationError::TimedOut(limit)),
            Err(RecvTimeoutError::Disconnected) => Err(EvaluationError::WorkerLost),
        }
    }
}
