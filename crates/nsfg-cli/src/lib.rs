//! CLI library components for the NSFG consistency checker.

pub mod check;
pub mod logging;
