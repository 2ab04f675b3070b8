//! Ranker: order actionable results by strategy gain and keep the top N.
//!
//! Sorting is stable and works on a copy; the caller's slice is untouched.
//! Infinite gains order like any other number; NaN gains sort last.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::evaluate::RecommendationResult;

/// How to order results with equal gains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Ascending symbol id.
    #[default]
    Symbol,
    /// Keep scan (input) order.
    InsertionOrder,
}

/// Top `limit` results by `total_gain`, descending.
pub fn rank(
    results: &[RecommendationResult],
    limit: usize,
    tie_break: TieBreak,
) -> Vec<RecommendationResult> {
    let mut ranked = results.to_vec();
    ranked.sort_by(|a, b| {
        compare_gain(a.total_gain, b.total_gain).then_with(|| match tie_break {
            TieBreak::Symbol => a.symbol_id.cmp(&b.symbol_id),
            TieBreak::InsertionOrder => Ordering::Equal,
        })
    });
    ranked.truncate(limit);
    ranked
}

/// Descending by gain, NaN last.
fn compare_gain(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}
