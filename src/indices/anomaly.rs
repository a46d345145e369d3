//! Monthly precipitation anomalies against station climatology.

use crate::core::MonthlyObservation;
use crate::indices::climate_index::{ClimateIndex, ClimateIndexLookup};
use crate::indices::climatology::Climatology;

/// Where the climate-index value attached to each anomaly comes from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClimateIndexSource {
    /// Do not attach a climate index.
    #[default]
    None,
    /// Deduplicate the index's values carried on the filtered rows by date.
    FromRecords(ClimateIndex),
    /// Use a lookup of the index supplied by the caller.
    External(ClimateIndex, ClimateIndexLookup),
}

impl ClimateIndexSource {
    /// The index being attached, if any.
    pub fn index(&self) -> Option<ClimateIndex> {
        match self {
            ClimateIndexSource::None => None,
            ClimateIndexSource::FromRecords(index) | ClimateIndexSource::External(index, _) => {
                Some(*index)
            }
        }
    }
}

/// Options for [`calculate_monthly_anomalies`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnomalyOptions {
    pub climate_index: ClimateIndexSource,
}

impl AnomalyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_climate_index_from_records(mut self, index: ClimateIndex) -> Self {
        self.climate_index = ClimateIndexSource::FromRecords(index);
        self
    }

    pub fn with_climate_index_lookup(
        mut self,
        index: ClimateIndex,
        lookup: ClimateIndexLookup,
    ) -> Self {
        self.climate_index = ClimateIndexSource::External(index, lookup);
        self
    }
}

/// An input row augmented with its baseline and anomaly.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyRecord<R> {
    record: R,
    climatology: Option<f64>,
    anomaly: f64,
    climate_index: Option<f64>,
}

impl<R> AnomalyRecord<R> {
    /// The original row, unchanged.
    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn into_record(self) -> R {
        self.record
    }

    /// Station/month climatological mean, if the history had one.
    pub fn climatology(&self) -> Option<f64> {
        self.climatology
    }

    /// Observed minus climatological precipitation; `NaN` when either is missing.
    pub fn anomaly(&self) -> f64 {
        self.anomaly
    }

    pub fn has_anomaly(&self) -> bool {
        !self.anomaly.is_nan()
    }

    /// Resolved climate-index value for the row's date.
    pub fn climate_index(&self) -> Option<f64> {
        self.climate_index
    }
}

/// Compute per-row anomalies of `filtered` against the climatology of `history`.
///
/// The baseline is built from the full `history`, restricted to the stations
/// present in `filtered`, so anomalies stay comparable across differently
/// filtered views. Rows whose station/month has no baseline get a missing
/// anomaly; this is not an error. Output order matches `filtered`.
pub fn calculate_monthly_anomalies<R, H>(
    filtered: &[R],
    history: &[H],
    options: &AnomalyOptions,
) -> Vec<AnomalyRecord<R>>
where
    R: MonthlyObservation + Clone,
    H: MonthlyObservation,
{
    let climatology = Climatology::for_records(filtered, history);
    tracing::debug!(
        rows = filtered.len(),
        baseline_entries = climatology.len(),
        "computed monthly climatology"
    );
    anomalies_with_climatology(filtered, &climatology, options)
}

/// Compute anomalies against a baseline the caller already holds.
pub fn anomalies_with_climatology<R>(
    filtered: &[R],
    climatology: &Climatology,
    options: &AnomalyOptions,
) -> Vec<AnomalyRecord<R>>
where
    R: MonthlyObservation + Clone,
{
    let derived;
    let lookup = match &options.climate_index {
        ClimateIndexSource::None => None,
        ClimateIndexSource::FromRecords(index) => {
            derived = ClimateIndexLookup::from_records(filtered, *index);
            Some((*index, &derived))
        }
        ClimateIndexSource::External(index, lookup) => Some((*index, lookup)),
    };

    let result: Vec<AnomalyRecord<R>> = filtered
        .iter()
        .map(|row| {
            let baseline = climatology.mean(row.station(), row.month());
            let anomaly = baseline.map_or(f64::NAN, |mean| row.precipitation() - mean);
            let climate_index = lookup
                .and_then(|(index, l)| l.resolve(row.climate_index(index), row.date()));
            AnomalyRecord {
                record: row.clone(),
                climatology: baseline,
                anomaly,
                climate_index,
            }
        })
        .collect();

    let unmatched = result.iter().filter(|r| r.climatology.is_none()).count();
    if unmatched > 0 {
        tracing::debug!(unmatched, "rows without a climatological baseline");
    }

    result
}
