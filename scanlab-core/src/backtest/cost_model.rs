//! Cost model: flat fee fraction charged on each side of a trade.

use serde::{Deserialize, Serialize};

/// Taiwan brokerage commission (0.1425%).
pub const DEFAULT_FEE_FRACTION: f64 = 0.001425;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Fee as a fraction of traded notional, per side.
    pub fee_fraction: f64,
    /// Bar frequency label (e.g. "5m"), carried into the stats.
    pub freq_label: String,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            fee_fraction: DEFAULT_FEE_FRACTION,
            freq_label: "5m".to_string(),
        }
    }
}

impl CostModel {
    pub fn new(fee_fraction: f64, freq_label: impl Into<String>) -> Self {
        Self {
            fee_fraction,
            freq_label: freq_label.into(),
        }
    }

    pub fn frictionless() -> Self {
        Self {
            fee_fraction: 0.0,
            ..Self::default()
        }
    }

    /// Fee on `notional`.
    pub fn fee(&self, notional: f64) -> f64 {
        notional.abs() * self.fee_fraction
    }

    /// Units bought by spending all of `cash` at `price`, fees included.
    pub fn units_for_cash(&self, cash: f64, price: f64) -> f64 {
        if price <= 0.0 {
            return 0.0;
        }
        cash / (price * (1.0 + self.fee_fraction))
    }
}
