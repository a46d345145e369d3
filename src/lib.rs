//! # precip-indices
//!
//! Climatological statistics for station precipitation records.
//!
//! Provides the Standardized Precipitation Index (SPI) over a rolling
//! accumulation window and monthly precipitation anomalies against
//! station/month climatology, with optional ENSO-style climate-index
//! attachment. All computations are pure functions of their inputs.

pub mod analysis;
pub mod config;
pub mod core;
pub mod distribution;
pub mod error;
pub mod indices;
pub mod transform;
pub mod utils;

pub use error::{ClimateError, Result};

pub mod prelude {
    pub use crate::analysis::{analyze, AnalysisReport};
    pub use crate::config::{AnalysisConfig, RecordFilter};
    pub use crate::core::{MonthlyObservation, MonthlyRecord, PrecipitationSeries};
    pub use crate::distribution::GammaFit;
    pub use crate::error::{ClimateError, Result};
    pub use crate::indices::{
        calculate_monthly_anomalies, calculate_spi, spi_by_station, AnomalyOptions, AnomalyRecord,
        ClimateIndex, ClimateIndexLookup, Climatology, SpiCategory, SpiResult,
    };
}
