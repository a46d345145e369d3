//! Climatological indices computed from precipitation records.
//!
//! - [`spi`]: Standardized Precipitation Index over a rolling window
//! - [`anomaly`]: monthly anomalies against station climatology
//! - [`climatology`]: station/month baselines
//! - [`climate_index`]: ENSO-style index lookups joined by date

pub mod anomaly;
pub mod climate_index;
pub mod climatology;
pub mod spi;

pub use anomaly::{
    anomalies_with_climatology, calculate_monthly_anomalies, AnomalyOptions, AnomalyRecord,
    ClimateIndexSource,
};
pub use climate_index::{ClimateIndex, ClimateIndexLookup};
pub use climatology::Climatology;
pub use spi::{calculate_spi, spi_by_station, SpiCategory, SpiResult, MIN_WINDOW};
