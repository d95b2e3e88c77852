//! # Sample Record Schema
//!
//! One [`Sample`] is produced per acquisition tick. A [`RunSeries`] is the
//! ordered, append-only collection of samples for one run.
//!
//! A sample carries values only when the tick obtained a valid reading:
//!
//! | ok    | temperature_c | humidity_pct |
//! |-------|---------------|--------------|
//! | true  | `Some(_)`     | `Some(_)`    |
//! | false | `None`        | `None`       |
//!
//! The constructors [`Sample::valid`] and [`Sample::failed`] are the only way
//! to build a sample, so the table above always holds.

mod series;
mod types;


pub use series::RunSeries;
pub use types::{Reading, Sample};
