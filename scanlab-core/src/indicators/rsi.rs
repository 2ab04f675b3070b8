//! Relative Strength Index (RSI), Wilder smoothing.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss). The first value needs
//! `period` changes, so on a clean series it sits at index `period`. Changes
//! are taken between consecutive finite closes; a NaN close yields NaN at its
//! own position only.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let mut result = vec![f64::NAN; n];
        let period = self.period as f64;
        let alpha = 1.0 / period;

        let mut last_close: Option<f64> = None;
        let mut seen = 0;
        let (mut avg_gain, mut avg_loss) = (0.0, 0.0);
        for (i, &x) in values.iter().enumerate() {
            if x.is_nan() {
                continue;
            }
            let Some(prev) = last_close.replace(x) else {
                continue;
            };
            let ch = x - prev;

            if seen < self.period {
                seen += 1;
                avg_gain += ch.max(0.0);
                avg_loss += (-ch).max(0.0);
                if seen == self.period {
                    avg_gain /= period;
                    avg_loss /= period;
                    result[i] = rsi_value(avg_gain, avg_loss);
                }
                continue;
            }

            avg_gain = alpha * ch.max(0.0) + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * (-ch).max(0.0) + (1.0 - alpha) * avg_loss;
            result[i] = rsi_value(avg_gain, avg_loss);
        }

        result
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
