//! Monthly station records.

use crate::error::{ClimateError, Result};
use crate::indices::ClimateIndex;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A row of a monthly precipitation table.
///
/// The anomaly calculator and climatology are generic over this trait so that
/// a caller's own row type, with whatever extra columns it carries, passes
/// through untouched.
pub trait MonthlyObservation {
    /// Station identifier.
    fn station(&self) -> &str;

    /// Calendar year of the observation.
    fn year(&self) -> i32;

    /// Month of year, 1 through 12.
    fn month(&self) -> u32;

    /// Date keying the observation within its station's series.
    fn date(&self) -> NaiveDate;

    /// Precipitation amount; `NaN` when missing.
    fn precipitation(&self) -> f64;

    /// Value of `index` carried on the row, if any.
    fn climate_index(&self, _index: ClimateIndex) -> Option<f64> {
        None
    }
}

impl<T: MonthlyObservation + ?Sized> MonthlyObservation for &T {
    fn station(&self) -> &str {
        (**self).station()
    }

    fn year(&self) -> i32 {
        (**self).year()
    }

    fn month(&self) -> u32 {
        (**self).month()
    }

    fn date(&self) -> NaiveDate {
        (**self).date()
    }

    fn precipitation(&self) -> f64 {
        (**self).precipitation()
    }

    fn climate_index(&self, index: ClimateIndex) -> Option<f64> {
        (**self).climate_index(index)
    }
}

/// Plain monthly record: station, year, month, date, precipitation and the
/// optional ONI, SOI and IOD values for the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub station: String,
    pub year: i32,
    pub month: u32,
    pub date: NaiveDate,
    pub precipitation: f64,
    #[serde(rename = "anomalia_oni", default, skip_serializing_if = "Option::is_none")]
    pub oni: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iod: Option<f64>,
}

impl MonthlyRecord {
    /// Create a record dated `date`; year and month are taken from the date.
    pub fn new(station: impl Into<String>, date: NaiveDate, precipitation: f64) -> Self {
        Self {
            station: station.into(),
            year: date.year(),
            month: date.month(),
            date,
            precipitation,
            oni: None,
            soi: None,
            iod: None,
        }
    }

    /// Create a record for the first day of `year`/`month`.
    pub fn from_parts(
        station: impl Into<String>,
        year: i32,
        month: u32,
        precipitation: f64,
    ) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ClimateError::InvalidParameter(format!("no such month: {year}-{month}"))
        })?;
        Ok(Self::new(station, date, precipitation))
    }

    pub fn with_climate_index(mut self, index: ClimateIndex, value: f64) -> Self {
        let slot = match index {
            ClimateIndex::Oni => &mut self.oni,
            ClimateIndex::Soi => &mut self.soi,
            ClimateIndex::Iod => &mut self.iod,
        };
        *slot = Some(value);
        self
    }
}

impl MonthlyObservation for MonthlyRecord {
    fn station(&self) -> &str {
        &self.station
    }

    fn year(&self) -> i32 {
        self.year
    }

    fn month(&self) -> u32 {
        self.month
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn precipitation(&self) -> f64 {
        self.precipitation
    }

    fn climate_index(&self, index: ClimateIndex) -> Option<f64> {
        let value = match index {
            ClimateIndex::Oni => self.oni,
            ClimateIndex::Soi => self.soi,
            ClimateIndex::Iod => self.iod,
        };
        value.filter(|v| !v.is_nan())
    }
}
