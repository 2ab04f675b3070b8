//! Exponential Moving Average (EMA).
//!
//! EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seeded with the SMA of the first `period` finite values, so on a clean
//! series the first defined output sits at `period - 1`. NaN inputs yield NaN
//! at their own position and are skipped by the recurrence.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    /// `period` must be at least 1; `StrategyParams::validate` guarantees it.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut result = vec![f64::NAN; n];
        let alpha = 2.0 / (self.period as f64 + 1.0);

        let mut seen = 0;
        let mut sum = 0.0;
        let mut prev = f64::NAN;
        for (i, &x) in values.iter().enumerate() {
            // void bar: no output, smoothing state carries over
            if x.is_nan() {
                continue;
            }
            if seen < self.period {
                seen += 1;
                sum += x;
                if seen == self.period {
                    prev = sum / self.period as f64;
                    result[i] = prev;
                }
                continue;
            }
            prev = alpha * x + (1.0 - alpha) * prev;
            result[i] = prev;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn period_1_is_identity() {
        let result = Ema::new(1).compute(&[100.0, 200.0, 300.0]);
        assert_eq!(result, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn known_values() {
        // alpha = 0.5, seed SMA(10,11,12) = 11
        let result = Ema::new(3).compute(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn short_series_is_all_warmup() {
        assert!(Ema::new(26).compute(&[1.0; 10]).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn nan_in_seed_delays_the_seed() {
        // seed SMA(10,12,13) lands on the third finite value
        let result = Ema::new(3).compute(&[10.0, f64::NAN, 12.0, 13.0, 14.0]);
        assert!(result[..3].iter().all(|v| v.is_nan()));
        assert_approx(result[3], 35.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 0.5 * 14.0 + 0.5 * 35.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn nan_after_seed_only_voids_its_own_bar() {
        let result = Ema::new(3).compute(&[10.0, 11.0, 12.0, f64::NAN, 14.0]);
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert!(result[3].is_nan());
        // resumes from the seed: 0.5 * 14 + 0.5 * 11
        assert_approx(result[4], 12.5, DEFAULT_EPSILON);
    }

    #[test]
    fn all_nan_input_is_all_nan() {
        assert!(Ema::new(2).compute(&[f64::NAN; 5]).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn zero_period_is_clamped() {
        let ema = Ema::new(0);
        assert_eq!(ema.period(), 1);
        assert_eq!(ema.lookback(), 0);
        assert_eq!(ema.name(), "ema_1");
    }
}
