//! Domain models for the dose calculator.

mod calculation;
mod drug;
mod raw;

pub use calculation::*;
pub use drug::*;
pub use raw::*;
