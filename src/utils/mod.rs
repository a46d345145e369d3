//! Utility functions shared by the index calculators.

pub mod stats;

pub use stats::{count_distinct, finite_values, mean};
