//! Signal recency: is the latest buy/sell close enough to the end of the series
//! to still act on?
//!
//! The window is measured in bars, so its real-world meaning depends on the
//! sampling interval. It is derived from `SamplingConfig` rather than fixed:
//! 5-minute bars over a 270-minute session give 54 bars per session and a
//! half-session window of 27 bars.

use serde::{Deserialize, Serialize};

use crate::domain::SignalSet;

/// Sampling schedule of the input series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Minutes between consecutive bars.
    pub interval_minutes: u32,
    /// Length of one trading session in minutes.
    pub session_minutes: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
            session_minutes: 270,
        }
    }
}

impl SamplingConfig {
    /// Whole bars in one session (at least 1).
    pub fn bars_per_session(&self) -> usize {
        if self.interval_minutes == 0 {
            return 1;
        }
        ((self.session_minutes / self.interval_minutes) as usize).max(1)
    }

    /// Pandas-style frequency label (`5m`, `1h`, `1d`), used by backtest cost models.
    pub fn freq_label(&self) -> String {
        match self.interval_minutes {
            m if m >= 1440 && m % 1440 == 0 => format!("{}d", m / 1440),
            m if m >= 60 && m % 60 == 0 => format!("{}h", m / 60),
            m => format!("{m}m"),
        }
    }
}

/// Maximum bar distance from the end of the series for a signal to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyWindow {
    pub bars: usize,
}

impl RecencyWindow {
    pub fn new(bars: usize) -> Self {
        Self { bars }
    }

    /// Half a trading session at the given sampling interval.
    pub fn from_sampling(sampling: &SamplingConfig) -> Self {
        Self {
            bars: (sampling.bars_per_session() / 2).max(1),
        }
    }

    /// True if a signal at `index` is recent for a series of `len` bars.
    pub fn is_recent(&self, index: usize, len: usize) -> bool {
        len.abs_diff(index) < self.bars
    }

    /// Decide buy/sell actionability for a series of `len` bars.
    ///
    /// A side is actionable iff its index list is non-empty and the distance
    /// from `len` to its last element is strictly below the window.
    pub fn classify(&self, signals: &SignalSet, len: usize) -> Recency {
        Recency {
            should_buy: signals.last_buy().is_some_and(|i| self.is_recent(i, len)),
            should_sell: signals.last_sell().is_some_and(|i| self.is_recent(i, len)),
        }
    }
}

impl Default for RecencyWindow {
    fn default() -> Self {
        Self::from_sampling(&SamplingConfig::default())
    }
}

/// Verdict of the recency classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recency {
    pub should_buy: bool,
    pub should_sell: bool,
}

impl Recency {
    pub fn is_actionable(&self) -> bool {
        self.should_buy || self.should_sell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(buy: &[usize], sell: &[usize]) -> SignalSet {
        SignalSet {
            buy_indices: buy.to_vec(),
            sell_indices: sell.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn default_window_is_half_a_taiwan_session() {
        let sampling = SamplingConfig::default();
        assert_eq!(sampling.bars_per_session(), 54);
        assert_eq!(RecencyWindow::default().bars, 27);
    }

    #[test]
    fn window_scales_with_interval() {
        let hourly = SamplingConfig {
            interval_minutes: 60,
            session_minutes: 270,
        };
        assert_eq!(RecencyWindow::from_sampling(&hourly).bars, 2);

        let one_minute = SamplingConfig {
            interval_minutes: 1,
            session_minutes: 270,
        };
        assert_eq!(RecencyWindow::from_sampling(&one_minute).bars, 135);
    }

    #[test]
    fn recent_buy_is_actionable() {
        let verdict = RecencyWindow::new(27).classify(&signals(&[10, 95], &[]), 100);
        assert!(verdict.should_buy);
        assert!(!verdict.should_sell);
        assert!(verdict.is_actionable());
    }

    #[test]
    fn boundary_is_exclusive() {
        let window = RecencyWindow::new(27);
        assert!(window.is_recent(74, 100)); // distance 26
        assert!(!window.is_recent(73, 100)); // distance 27
    }

    #[test]
    fn only_last_signal_counts() {
        let verdict = RecencyWindow::new(27).classify(&signals(&[99, 50], &[]), 100);
        assert!(!verdict.should_buy);
    }

    #[test]
    fn empty_lists_are_not_actionable() {
        let verdict = RecencyWindow::new(27).classify(&SignalSet::default(), 100);
        assert_eq!(verdict, Recency::default());
        assert!(!verdict.is_actionable());
    }

    #[test]
    fn freq_labels() {
        assert_eq!(SamplingConfig::default().freq_label(), "5m");
        let hourly = SamplingConfig {
            interval_minutes: 60,
            session_minutes: 270,
        };
        assert_eq!(hourly.freq_label(), "1h");
        let daily = SamplingConfig {
            interval_minutes: 1440,
            session_minutes: 1440,
        };
        assert_eq!(daily.freq_label(), "1d");
    }
}
