//! Indicators used by the reference strategy.
//!
//! Indicators are pure functions: a close series in, a numeric series of the
//! same length out. Warmup positions are `f64::NAN`. A NaN input yields NaN at
//! its own position and is skipped by the smoothing state, so one void bar
//! neither produces a signal nor silences the rest of the series.

pub mod ema;
pub mod rsi;

pub use ema::Ema;
pub use rsi::Rsi;

/// A single-series indicator over close prices.
///
/// No output value at position t may depend on input at t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g. "rsi_14", "ema_26").
    fn name(&self) -> &str;

    /// Number of leading positions that are warmup (NaN).
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole series.
    fn compute(&self, values: &[f64]) -> Vec<f64>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    /// Truncating the input must not change earlier outputs.
    fn assert_no_lookahead(indicator: &dyn Indicator, values: &[f64]) {
        let full = indicator.compute(values);
        for cut in 1..values.len() {
            let partial = indicator.compute(&values[..cut]);
            for (i, (&a, &b)) in partial.iter().zip(&full).enumerate() {
                assert!(
                    (a.is_nan() && b.is_nan()) || (a - b).abs() < DEFAULT_EPSILON,
                    "{} differs at {i} when truncated to {cut}",
                    indicator.name()
                );
            }
        }
    }

    #[test]
    fn indicators_do_not_look_ahead() {
        let closes = [
            100.0, 101.5, 99.0, 98.5, 102.0, 104.0, 103.0, 101.0, 105.0, 107.5, 106.0, 108.0,
        ];
        assert_no_lookahead(&Rsi::new(3), &closes);
        assert_no_lookahead(&Ema::new(4), &closes);
    }
}
