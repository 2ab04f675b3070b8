//! Reference engine: long-only, all-in, fills at the bar's close.
//!
//! An entry flag while flat buys with all cash; an exit flag while long sells
//! everything. Flags against the current state are ignored. Bars with a
//! non-finite close are skipped for trading and carry the last mark forward.

use super::{max_drawdown, BacktestEngine, BacktestError, BacktestStats, CostModel};

#[derive(Debug, Clone)]
pub struct SignalPortfolio {
    initial_capital: f64,
}

impl SignalPortfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self { initial_capital }
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }
}

impl BacktestEngine for SignalPortfolio {
    fn run(
        &self,
        closes: &[f64],
        entries: &[bool],
        exits: &[bool],
        costs: &CostModel,
    ) -> Result<BacktestStats, BacktestError> {
        if entries.len() != closes.len() || exits.len() != closes.len() {
            return Err(BacktestError::LengthMismatch {
                closes: closes.len(),
                entries: entries.len(),
                exits: exits.len(),
            });
        }
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(BacktestError::InvalidInput(format!(
                "initial capital must be > 0, got {}",
                self.initial_capital
            )));
        }
        if !(costs.fee_fraction.is_finite() && (0.0..1.0).contains(&costs.fee_fraction)) {
            return Err(BacktestError::InvalidInput(format!(
                "fee fraction must be in [0, 1), got {}",
                costs.fee_fraction
            )));
        }

        let mut cash = self.initial_capital;
        let mut units = 0.0_f64;
        let mut entry_cost = 0.0_f64;
        let mut total_fees = 0.0_f64;
        let mut trade_count = 0usize;
        let (mut closed, mut winners) = (0usize, 0usize);
        let mut mark = f64::NAN;
        let mut equity_curve = Vec::with_capacity(closes.len());

        for (i, &price) in closes.iter().enumerate() {
            if price.is_finite() && price > 0.0 {
                mark = price;
                if units == 0.0 && entries[i] {
                    units = costs.units_for_cash(cash, price);
                    let fee = costs.fee(units * price);
                    total_fees += fee;
                    entry_cost = cash;
                    cash = 0.0;
                    trade_count += 1;
                } else if units > 0.0 && exits[i] {
                    let notional = units * price;
                    let fee = costs.fee(notional);
                    total_fees += fee;
                    cash = notional - fee;
                    units = 0.0;
                    closed += 1;
                    if cash > entry_cost {
                        winners += 1;
                    }
                }
            }
            let held = if mark.is_nan() { 0.0 } else { units * mark };
            equity_curve.push(cash + held);
        }

        let end_value = equity_curve.last().copied().unwrap_or(self.initial_capital);
        Ok(BacktestStats {
            start_value: self.initial_capital,
            end_value,
            total_return: (end_value - self.initial_capital) / self.initial_capital,
            total_fees,
            trade_count,
            win_rate: if closed == 0 {
                0.0
            } else {
                winners as f64 / closed as f64
            },
            max_drawdown: max_drawdown(&equity_curve),
            bar_count: closes.len(),
            freq_label: costs.freq_label.clone(),
        })
    }
}
