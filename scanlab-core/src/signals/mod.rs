//! Interpreting strategy output: recency verdicts and bar alignment.

pub mod align;
pub mod recency;

pub use align::{align_flags, align_signal_set, AlignedSignalSeries, AlignmentError};
pub use recency::{Recency, RecencyWindow, SamplingConfig};
