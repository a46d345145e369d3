//! Time-indexed precipitation series.

use crate::core::records::MonthlyObservation;
use crate::error::{ClimateError, Result};
use chrono::NaiveDate;

/// A single station's precipitation amounts keyed on a date index.
///
/// Missing amounts are stored as `NaN`. Timestamps may be in any order;
/// consumers that need chronological order call [`PrecipitationSeries::sorted`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrecipitationSeries {
    timestamps: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl PrecipitationSeries {
    /// Create a series from parallel timestamp and value vectors.
    pub fn new(timestamps: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ClimateError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        Ok(Self { timestamps, values })
    }

    /// Build from vectors already known to have equal length.
    pub(crate) fn from_parts(timestamps: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), values.len());
        Self { timestamps, values }
    }

    /// Collect one station's rows from a monthly table.
    pub fn from_records<R: MonthlyObservation>(records: &[R], station: &str) -> Self {
        let (timestamps, values) = records
            .iter()
            .filter(|r| r.station() == station)
            .map(|r| (r.date(), r.precipitation()))
            .unzip();
        Self { timestamps, values }
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(date, amount)` pairs in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Count of non-missing amounts.
    pub fn observed_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Return a copy ordered by timestamp.
    ///
    /// The sort is stable, so rows sharing a timestamp keep their relative order.
    pub fn sorted(&self) -> PrecipitationSeries {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&i| self.timestamps[i]);

        PrecipitationSeries {
            timestamps: order.iter().map(|&i| self.timestamps[i]).collect(),
            values: order.iter().map(|&i| self.values[i]).collect(),
        }
    }

    /// Check for duplicate timestamps and negative amounts.
    ///
    /// Nothing in the crate calls this implicitly; it is offered to callers
    /// that want to reject malformed input before computing indices.
    pub fn validate(&self) -> Result<()> {
        if let Some((date, value)) = self.iter().find(|(_, v)| *v < 0.0) {
            return Err(ClimateError::InvalidInput(format!(
                "negative precipitation {value} at {date}"
            )));
        }

        let mut dates = self.timestamps.clone();
        dates.sort_unstable();
        if let Some(w) = dates.windows(2).find(|w| w[0] == w[1]) {
            return Err(ClimateError::InvalidInput(format!(
                "duplicate timestamp {}",
                w[0]
            )));
        }

        Ok(())
    }
}
