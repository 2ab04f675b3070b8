//! Domain types shared by every stage of the scan pipeline.

pub mod bar;
pub mod series;
pub mod signal;

pub use bar::Bar;
pub use series::PriceSeries;
pub use signal::{SignalSet, SignalShapeError};
