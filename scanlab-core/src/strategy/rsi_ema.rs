//! Mean-reversion reference strategy: buy oversold dips below trend, sell
//! overbought rallies.
//!
//! Indicators are read at bar `i`, the trade fills at the close of bar
//! `i + 1`, and the transition flag `i` records it. Position sizing is in
//! whole units. A `delay` enforces a cooldown (in bars) between trades.

use log::info;

use super::{StrategyError, StrategyEvaluator, StrategyParams};
use crate::domain::{PriceSeries, SignalSet};
use crate::indicators::{Ema, Indicator, Rsi};

#[derive(Debug, Clone, Default)]
pub struct RsiEmaStrategy;

impl RsiEmaStrategy {
    pub fn new() -> Self {
        Self
    }
}

struct Book {
    cash: f64,
    units: f64,
}

impl StrategyEvaluator for RsiEmaStrategy {
    fn name(&self) -> &str {
        "rsi_ema"
    }

    fn evaluate(
        &self,
        series: &PriceSeries,
        params: &StrategyParams,
    ) -> Result<SignalSet, StrategyError> {
        params.validate()?;

        let closes = series.closes();
        let n = closes.len();
        let rsi = Rsi::new(params.rsi_period).compute(&closes);
        let ema = Ema::new(params.ema_period).compute(&closes);

        let mut signals = SignalSet {
            entry_flags: vec![false; n.saturating_sub(1)],
            exit_flags: vec![false; n.saturating_sub(1)],
            ..Default::default()
        };
        let mut book = Book {
            cash: params.initial_money,
            units: 0.0,
        };
        let mut last_trade: Option<usize> = None;
        let cooldown = params.delay.unwrap_or(0);

        for i in 0..n.saturating_sub(1) {
            let fill_at = i + 1;
            let price = closes[fill_at];
            if !(price.is_finite() && price > 0.0) {
                continue;
            }
            if last_trade.is_some_and(|t| fill_at - t < cooldown) {
                continue;
            }

            // NaN warmup compares false on both sides
            let oversold = rsi[i] < params.low_rsi && closes[i] < ema[i];
            let overbought = rsi[i] > params.high_rsi;

            if oversold {
                let affordable = (book.cash / price).floor();
                let qty = params.max_buy.map_or(affordable, |m| m.floor().min(affordable));
                if qty >= 1.0 {
                    book.cash -= qty * price;
                    book.units += qty;
                    signals.buy_indices.push(fill_at);
                    signals.entry_flags[i] = true;
                    last_trade = Some(fill_at);
                    if params.print_log {
                        info!(
                            "{}: bar {fill_at}: buy {qty} unit(s) at {price:.2}, cash {:.2}",
                            series.symbol, book.cash
                        );
                    }
                }
            } else if overbought && book.units > 0.0 {
                let qty = params.max_sell.map_or(book.units, |m| m.floor().max(1.0).min(book.units));
                book.cash += qty * price;
                book.units -= qty;
                signals.sell_indices.push(fill_at);
                signals.exit_flags[i] = true;
                last_trade = Some(fill_at);
                if params.print_log {
                    info!(
                        "{}: bar {fill_at}: sell {qty} unit(s) at {price:.2}, cash {:.2}",
                        series.symbol, book.cash
                    );
                }
            }
        }

        let mark = closes
            .iter()
            .rev()
            .copied()
            .find(|c| c.is_finite())
            .unwrap_or(0.0);
        let equity = book.cash + book.units * mark;
        signals.total_gain = equity - params.initial_money;
        signals.invested_capital = signals.total_gain / params.initial_money * 100.0;

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use chrono::DateTime;

    fn series(closes: &[f64]) -> PriceSeries {
        let t0 = DateTime::parse_from_rfc3339("2024-05-02T09:00:00+08:00").unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                timestamp: t0 + chrono::Duration::minutes(5 * i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1000.0,
            })
            .collect();
        PriceSeries::new("2330", bars)
    }

    fn params() -> StrategyParams {
        StrategyParams {
            initial_money: 1_000.0,
            rsi_period: 3,
            ema_period: 3,
            ..Default::default()
        }
    }

    /// Falls for 8 bars, then rallies for 8.
    fn dip_then_rally() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..8).map(|i| 100.0 - 5.0 * i as f64).collect();
        closes.extend((1..=8).map(|i| 65.0 + 8.0 * i as f64));
        closes
    }

    #[test]
    fn output_honours_transition_shape() {
        let s = series(&dip_then_rally());
        let signals = RsiEmaStrategy::new().evaluate(&s, &params()).unwrap();
        assert_eq!(signals.entry_flags.len(), s.len() - 1);
        assert_eq!(signals.exit_flags.len(), s.len() - 1);
        assert!(signals.validate(s.len()).is_ok());
        for &b in &signals.buy_indices {
            assert!(signals.entry_flags[b - 1]);
        }
        for &x in &signals.sell_indices {
            assert!(signals.exit_flags[x - 1]);
        }
    }

    #[test]
    fn buys_the_dip_and_sells_the_rally() {
        let s = series(&dip_then_rally());
        let signals = RsiEmaStrategy::new().evaluate(&s, &params()).unwrap();
        assert!(!signals.buy_indices.is_empty());
        assert!(!signals.sell_indices.is_empty());
        assert!(signals.buy_indices[0] < signals.sell_indices[0]);
        assert!(signals.total_gain > 0.0);
        assert!((signals.invested_capital - signals.total_gain / 10.0).abs() < 1e-9);
    }

    #[test]
    fn void_close_does_not_silence_the_series() {
        let mut closes = dip_then_rally();
        closes[1] = f64::NAN;
        let s = series(&closes);
        let signals = RsiEmaStrategy::new().evaluate(&s, &params()).unwrap();
        // indicators seed one bar later, then trade as on the clean series
        assert_eq!(signals.buy_indices, vec![5]);
        assert_eq!(signals.sell_indices.first(), Some(&11));
        assert!((signals.total_gain - (25.0 + 13.0 * 97.0 - 1_000.0)).abs() < 1e-9);
    }

    #[test]
    fn max_buy_limits_each_purchase() {
        let s = series(&dip_then_rally());
        let limited = StrategyParams {
            max_buy: Some(1.0),
            ..params()
        };
        let all_in = RsiEmaStrategy::new().evaluate(&s, &params()).unwrap();
        let one_unit = RsiEmaStrategy::new().evaluate(&s, &limited).unwrap();
        assert!(one_unit.total_gain.abs() < all_in.total_gain.abs());
    }

    #[test]
    fn delay_spaces_out_trades() {
        let s = series(&dip_then_rally());
        let p = StrategyParams {
            max_buy: Some(1.0),
            delay: Some(4),
            ..params()
        };
        let signals = RsiEmaStrategy::new().evaluate(&s, &p).unwrap();
        let mut trades: Vec<usize> = signals
            .buy_indices
            .iter()
            .chain(&signals.sell_indices)
            .copied()
            .collect();
        trades.sort_unstable();
        for pair in trades.windows(2) {
            assert!(pair[1] - pair[0] >= 4, "trades too close: {pair:?}");
        }
    }

    #[test]
    fn flat_series_never_trades() {
        let s = series(&[50.0; 30]);
        let signals = RsiEmaStrategy::new().evaluate(&s, &params()).unwrap();
        assert!(signals.buy_indices.is_empty());
        assert!(signals.sell_indices.is_empty());
        assert_eq!(signals.total_gain, 0.0);
    }

    #[test]
    fn short_and_empty_series_are_fine() {
        for closes in [&[][..], &[10.0][..], &[10.0, 11.0][..]] {
            let s = series(closes);
            let signals = RsiEmaStrategy::new().evaluate(&s, &params()).unwrap();
            assert!(signals.validate(s.len()).is_ok());
        }
    }

    #[test]
    fn invalid_params_fail() {
        let p = StrategyParams {
            initial_money: 0.0,
            ..params()
        };
        assert!(RsiEmaStrategy::new().evaluate(&series(&[1.0, 2.0]), &p).is_err());
    }
}
