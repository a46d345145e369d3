//! Request-scoped analysis configuration.
//!
//! Every setting that selects or parameterizes a computation travels in an
//! [`AnalysisConfig`] value handed to the call; nothing is read from global
//! state.
//!
//! ```
//! use precip_indices::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_toml_str(
//!     r#"
//!     spi_window = 6
//!     year_range = [1981, 2010]
//!     months = [12, 1, 2]
//!     climate_index = "oni"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.spi_window, 6);
//! ```

use crate::core::{MonthlyObservation, PrecipitationSeries};
use crate::error::{ClimateError, Result};
use crate::indices::{AnomalyOptions, ClimateIndex, MIN_WINDOW};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Settings for one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// SPI accumulation window, in periods.
    pub spi_window: usize,
    /// Inclusive range of years kept by the record filter.
    pub year_range: (i32, i32),
    /// Months of year kept by the record filter.
    pub months: Vec<u32>,
    /// Stations kept by the record filter; empty keeps every station.
    pub stations: Vec<String>,
    /// Drop rows whose precipitation is missing.
    pub exclude_missing: bool,
    /// Drop rows whose precipitation is exactly zero.
    pub exclude_zeros: bool,
    /// Climate index attached to anomaly rows.
    pub climate_index: Option<ClimateIndex>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            spi_window: 12,
            year_range: (1970, 2021),
            months: (1..=12).collect(),
            stations: Vec::new(),
            exclude_missing: false,
            exclude_zeros: false,
            climate_index: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.spi_window < MIN_WINDOW {
            return Err(ClimateError::InvalidParameter(format!(
                "spi_window must be at least {MIN_WINDOW}, got {}",
                self.spi_window
            )));
        }
        let (start, end) = self.year_range;
        if start > end {
            return Err(ClimateError::InvalidParameter(format!(
                "year_range start {start} is after end {end}"
            )));
        }
        if let Some(month) = self.months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(ClimateError::InvalidParameter(format!(
                "month {month} is outside 1..=12"
            )));
        }
        Ok(())
    }

    pub fn record_filter(&self) -> RecordFilter {
        RecordFilter {
            years: self.year_range.0..=self.year_range.1,
            months: self.months.iter().copied().collect(),
            stations: if self.stations.is_empty() {
                None
            } else {
                Some(self.stations.iter().cloned().collect())
            },
            exclude_missing: self.exclude_missing,
            exclude_zeros: self.exclude_zeros,
        }
    }

    pub fn anomaly_options(&self) -> AnomalyOptions {
        match self.climate_index {
            Some(index) => AnomalyOptions::new().with_climate_index_from_records(index),
            None => AnomalyOptions::new(),
        }
    }
}

/// Row selection derived from an [`AnalysisConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFilter {
    years: RangeInclusive<i32>,
    months: BTreeSet<u32>,
    stations: Option<BTreeSet<String>>,
    exclude_missing: bool,
    exclude_zeros: bool,
}

impl RecordFilter {
    pub fn matches<R: MonthlyObservation>(&self, row: &R) -> bool {
        let precipitation = row.precipitation();
        self.in_period(row)
            && self.months.contains(&row.month())
            && !(self.exclude_missing && precipitation.is_nan())
            && !(self.exclude_zeros && precipitation == 0.0)
    }

    /// Station and year selection only.
    fn in_period<R: MonthlyObservation>(&self, row: &R) -> bool {
        self.years.contains(&row.year())
            && self
                .stations
                .as_ref()
                .map_or(true, |s| s.contains(row.station()))
    }

    /// One station's series over the selected years, with every row the
    /// filter rejects kept in place as a missing value.
    ///
    /// Rolling accumulations over this series never bridge a dropped month:
    /// any window containing one is incomplete.
    pub fn masked_series<R: MonthlyObservation>(
        &self,
        rows: &[R],
        station: &str,
    ) -> PrecipitationSeries {
        let in_station: Vec<&R> = rows
            .iter()
            .filter(|r| r.station() == station && self.in_period(*r))
            .collect();
        let timestamps = in_station.iter().map(|r| r.date()).collect();
        let values = in_station
            .iter()
            .map(|r| {
                if self.matches(*r) {
                    r.precipitation()
                } else {
                    f64::NAN
                }
            })
            .collect();
        PrecipitationSeries::from_parts(timestamps, values)
    }

    /// Copy the matching rows, preserving order.
    pub fn apply<R: MonthlyObservation + Clone>(&self, rows: &[R]) -> Vec<R> {
        rows.iter().filter(|r| self.matches(*r)).cloned().collect()
    }
}
