//! Core data structures for precipitation records.

mod records;
mod series;

pub use records::{MonthlyObservation, MonthlyRecord};
pub use series::PrecipitationSeries;
