//! Standardized Precipitation Index.
//!
//! Precipitation accumulated over a rolling window is fitted with a Gamma
//! distribution (location fixed at zero), and each accumulation's cumulative
//! probability is mapped to the standard normal scale. Negative values mark
//! drier-than-usual periods, positive values wetter ones.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use precip_indices::core::PrecipitationSeries;
//! use precip_indices::indices::calculate_spi;
//!
//! let dates: Vec<_> = (1..=6)
//!     .map(|m| NaiveDate::from_ymd_opt(2020, m, 1).unwrap())
//!     .collect();
//! let series =
//!     PrecipitationSeries::new(dates, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]).unwrap();
//!
//! let spi = calculate_spi(&series, 3).unwrap();
//! assert!(spi.values()[1].is_nan());
//! assert!(spi.values()[2..].iter().all(|v| v.is_finite()));
//! ```

use crate::core::{MonthlyObservation, PrecipitationSeries};
use crate::distribution::GammaFit;
use crate::error::{ClimateError, Result};
use crate::transform::rolling_sum;
use chrono::NaiveDate;
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Smallest accepted accumulation window.
pub const MIN_WINDOW: usize = 2;

/// Drought and wetness classes on the SPI scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpiCategory {
    ExtremelyDry,
    SeverelyDry,
    ModeratelyDry,
    NearNormal,
    ModeratelyWet,
    VeryWet,
    ExtremelyWet,
}

impl SpiCategory {
    /// Classify an SPI value; `None` for missing values.
    pub fn from_value(spi: f64) -> Option<Self> {
        if spi.is_nan() {
            return None;
        }
        let category = if spi >= 2.0 {
            SpiCategory::ExtremelyWet
        } else if spi >= 1.5 {
            SpiCategory::VeryWet
        } else if spi >= 1.0 {
            SpiCategory::ModeratelyWet
        } else if spi > -1.0 {
            SpiCategory::NearNormal
        } else if spi > -1.5 {
            SpiCategory::ModeratelyDry
        } else if spi > -2.0 {
            SpiCategory::SeverelyDry
        } else {
            SpiCategory::ExtremelyDry
        };
        Some(category)
    }

    pub fn is_drought(&self) -> bool {
        *self <= SpiCategory::ModeratelyDry
    }
}

impl fmt::Display for SpiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpiCategory::ExtremelyDry => "extremely dry",
            SpiCategory::SeverelyDry => "severely dry",
            SpiCategory::ModeratelyDry => "moderately dry",
            SpiCategory::NearNormal => "near normal",
            SpiCategory::ModeratelyWet => "moderately wet",
            SpiCategory::VeryWet => "very wet",
            SpiCategory::ExtremelyWet => "extremely wet",
        };
        f.write_str(label)
    }
}

/// SPI values aligned to the chronologically sorted input index.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiResult {
    timestamps: Vec<NaiveDate>,
    rolling_sum: Vec<f64>,
    values: Vec<f64>,
    window: usize,
    fit: Option<GammaFit>,
    diagnostic: Option<ClimateError>,
}

impl SpiResult {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sorted time index shared by the rolling sums and SPI values.
    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    /// Rolling precipitation sums; `NaN` where the window is incomplete.
    pub fn rolling_sum(&self) -> &[f64] {
        &self.rolling_sum
    }

    /// SPI values; `NaN` where undefined.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Fitted Gamma parameters, absent when the fit failed.
    pub fn fit(&self) -> Option<&GammaFit> {
        self.fit.as_ref()
    }

    /// Why the fit failed, if it did.
    pub fn diagnostic(&self) -> Option<&ClimateError> {
        self.diagnostic.as_ref()
    }

    /// True when the distribution fit failed and every value is missing.
    pub fn is_degraded(&self) -> bool {
        self.diagnostic.is_some()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.timestamps.binary_search(&date).ok()?;
        Some(self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Drought/wetness class of every value.
    pub fn categories(&self) -> Vec<Option<SpiCategory>> {
        self.values
            .iter()
            .map(|&v| SpiCategory::from_value(v))
            .collect()
    }
}

/// Compute the SPI of `series` over `window` consecutive periods.
///
/// The series is sorted by date first, so input order does not matter.
///
/// # Errors
/// Only a window shorter than [`MIN_WINDOW`] is an error. A failed Gamma fit
/// (too few complete windows, zero or constant accumulations) yields a result
/// whose values are all missing and whose [`SpiResult::diagnostic`] carries
/// the cause.
pub fn calculate_spi(series: &PrecipitationSeries, window: usize) -> Result<SpiResult> {
    check_window(window)?;

    let sorted = series.sorted();
    let sums = rolling_sum(sorted.values(), window);
    let timestamps = sorted.timestamps().to_vec();

    match standardize(&sums) {
        Ok((fit, values)) => Ok(SpiResult {
            timestamps,
            rolling_sum: sums,
            values,
            window,
            fit: Some(fit),
            diagnostic: None,
        }),
        Err(err) => {
            tracing::warn!(
                window,
                periods = series.len(),
                observed = series.observed_count(),
                error = %err,
                "SPI gamma fit failed; returning missing values"
            );
            Ok(SpiResult {
                values: vec![f64::NAN; timestamps.len()],
                timestamps,
                rolling_sum: sums,
                window,
                fit: None,
                diagnostic: Some(err),
            })
        }
    }
}

/// Compute the SPI of every station in a monthly table independently.
pub fn spi_by_station<R: MonthlyObservation>(
    records: &[R],
    window: usize,
) -> Result<BTreeMap<String, SpiResult>> {
    check_window(window)?;

    let stations: BTreeSet<&str> = records.iter().map(|r| r.station()).collect();
    stations
        .into_iter()
        .map(|station| {
            let series = PrecipitationSeries::from_records(records, station);
            calculate_spi(&series, window).map(|spi| (station.to_string(), spi))
        })
        .collect()
}

fn check_window(window: usize) -> Result<()> {
    if window < MIN_WINDOW {
        return Err(ClimateError::InvalidParameter(format!(
            "SPI window must be at least {MIN_WINDOW}, got {window}"
        )));
    }
    Ok(())
}

/// Fit the rolling sums and map them to standard normal quantiles.
fn standardize(sums: &[f64]) -> Result<(GammaFit, Vec<f64>)> {
    let fit = GammaFit::fit(sums)?;
    let probabilities = fit.cdf_all(sums)?;
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ClimateError::ComputationError(format!("standard normal: {e}")))?;

    let values = probabilities
        .iter()
        .map(|&p| {
            if p.is_nan() {
                return f64::NAN;
            }
            let z = normal.inverse_cdf(p.clamp(0.0, 1.0));
            if z.is_infinite() {
                f64::NAN
            } else {
                z
            }
        })
        .collect();

    Ok((fit, values))
}
