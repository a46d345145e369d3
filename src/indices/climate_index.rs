//! External climate indices (ENSO and related teleconnections).
//!
//! An index such as the Oceanic Niño Index is a single monthly scalar shared
//! by every station. It is kept as a `date -> value` lookup and joined onto
//! station rows once, rather than carried as a per-station column.

use crate::core::MonthlyObservation;
use crate::error::ClimateError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Known climate indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimateIndex {
    /// Oceanic Niño Index (ENSO).
    Oni,
    /// Southern Oscillation Index.
    Soi,
    /// Indian Ocean Dipole.
    Iod,
}

impl ClimateIndex {
    pub const ALL: [ClimateIndex; 3] = [ClimateIndex::Oni, ClimateIndex::Soi, ClimateIndex::Iod];

    /// Column identifier used for this index in monthly tables.
    pub fn column_name(&self) -> &'static str {
        match self {
            ClimateIndex::Oni => "anomalia_oni",
            ClimateIndex::Soi => "soi",
            ClimateIndex::Iod => "iod",
        }
    }
}

impl fmt::Display for ClimateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClimateIndex::Oni => write!(f, "ONI"),
            ClimateIndex::Soi => write!(f, "SOI"),
            ClimateIndex::Iod => write!(f, "IOD"),
        }
    }
}

impl FromStr for ClimateIndex {
    type Err = ClimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "enso" {
            return Ok(ClimateIndex::Oni);
        }
        ClimateIndex::ALL
            .into_iter()
            .find(|index| {
                name == index.column_name() || name == index.to_string().to_ascii_lowercase()
            })
            .ok_or_else(|| ClimateError::InvalidParameter(format!("unknown climate index: {name}")))
    }
}

/// One climate-index value per date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimateIndexLookup {
    values: BTreeMap<NaiveDate, f64>,
}

impl ClimateIndexLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deduplicate `index` as carried on monthly rows: the first non-missing
    /// value seen for each date wins.
    pub fn from_records<R: MonthlyObservation>(records: &[R], index: ClimateIndex) -> Self {
        let mut lookup = Self::new();
        for record in records {
            if let Some(value) = record.climate_index(index) {
                lookup.insert(record.date(), value);
            }
        }
        lookup
    }

    /// Build from `(date, value)` pairs with the same first-wins rule.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut lookup = Self::new();
        for (date, value) in pairs {
            lookup.insert(date, value);
        }
        lookup
    }

    /// Insert a value unless the date already has one or the value is missing.
    ///
    /// Returns `true` when the value was stored.
    pub fn insert(&mut self, date: NaiveDate, value: f64) -> bool {
        if value.is_nan() || self.values.contains_key(&date) {
            return false;
        }
        self.values.insert(date, value);
        true
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied()
    }

    /// Prefer a row's own value, falling back to the lookup.
    pub fn resolve(&self, own: Option<f64>, date: NaiveDate) -> Option<f64> {
        own.filter(|v| !v.is_nan()).or_else(|| self.get(date))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.values.iter().map(|(&d, &v)| (d, v))
    }
}
