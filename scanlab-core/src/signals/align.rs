//! Signal alignment: transition flags onto the bar index.
//!
//! A strategy reports one entry/exit flag per transition (bar `i` → bar `i+1`),
//! so its flag vectors have `N - 1` elements. A backtest engine wants one flag
//! per bar. The flag for transition `i` becomes observable at bar `i + 1`, so
//! it is placed there; bar 0 never carries a signal.
//!
//! A length mismatch here means two components disagree about the contract,
//! not that the input data is dirty. Callers must not swallow it.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceSeries, SignalSet};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    #[error("{which}: expected {expected} transition flags for {bars} bars, got {actual}")]
    LengthMismatch {
        which: &'static str,
        bars: usize,
        expected: usize,
        actual: usize,
    },
}

/// Boolean signal per bar, indexed exactly like the source series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSignalSeries {
    pub index: Vec<DateTime<FixedOffset>>,
    pub flags: Vec<bool>,
}

impl AlignedSignalSeries {
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Positions carrying a signal.
    pub fn positions(&self) -> Vec<usize> {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect()
    }
}

/// Shift `flags` (length `N - 1`) forward by one onto `index` (length `N`).
pub fn align_flags(
    flags: &[bool],
    index: &[DateTime<FixedOffset>],
) -> Result<AlignedSignalSeries, AlignmentError> {
    align_named("flags", flags, index)
}

/// Align both the entry and the exit flags of a signal set onto the series.
pub fn align_signal_set(
    signals: &SignalSet,
    series: &PriceSeries,
) -> Result<(AlignedSignalSeries, AlignedSignalSeries), AlignmentError> {
    let index = series.timestamps();
    let entries = align_named("entry_flags", &signals.entry_flags, &index)?;
    let exits = align_named("exit_flags", &signals.exit_flags, &index)?;
    Ok((entries, exits))
}

fn align_named(
    which: &'static str,
    flags: &[bool],
    index: &[DateTime<FixedOffset>],
) -> Result<AlignedSignalSeries, AlignmentError> {
    let bars = index.len();
    let expected = bars.saturating_sub(1);
    if flags.len() != expected {
        return Err(AlignmentError::LengthMismatch {
            which,
            bars,
            expected,
            actual: flags.len(),
        });
    }

    let mut aligned = Vec::with_capacity(bars);
    if bars > 0 {
        aligned.push(false);
        aligned.extend_from_slice(flags);
    }

    Ok(AlignedSignalSeries {
        index: index.to_vec(),
        flags: aligned,
    })
}
