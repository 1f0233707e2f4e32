//! Dose calculation.
//!
//! Pipeline: (weight, selection, catalog) → Dose Engine → `CalculationResults`,
//! re-run by the Recomputation Controller on every input change.

mod calculator;
mod controller;
mod weight;

pub use calculator::*;
pub use controller::*;
pub use weight::*;
