//! Station/month climatological baselines.

use crate::core::MonthlyObservation;
use std::collections::{BTreeMap, BTreeSet};

/// Mean historical precipitation for each (station, month) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Climatology {
    means: BTreeMap<String, BTreeMap<u32, f64>>,
}

impl Climatology {
    /// Average `history` by station and month of year, restricted to `stations`.
    ///
    /// Missing amounts are skipped. A station/month with no observed amounts
    /// gets no entry.
    pub fn from_history<H: MonthlyObservation>(history: &[H], stations: &BTreeSet<String>) -> Self {
        let mut totals: BTreeMap<&str, BTreeMap<u32, (f64, usize)>> = BTreeMap::new();

        for row in history {
            let precipitation = row.precipitation();
            if precipitation.is_nan() || !stations.contains(row.station()) {
                continue;
            }
            let (sum, count) = totals
                .entry(row.station())
                .or_default()
                .entry(row.month())
                .or_insert((0.0, 0));
            *sum += precipitation;
            *count += 1;
        }

        let means = totals
            .into_iter()
            .map(|(station, months)| {
                let months = months
                    .into_iter()
                    .map(|(month, (sum, count))| (month, sum / count as f64))
                    .collect();
                (station.to_string(), months)
            })
            .collect();

        Self { means }
    }

    /// Baseline over the full `history` for the stations present in `filtered`.
    pub fn for_records<R, H>(filtered: &[R], history: &[H]) -> Self
    where
        R: MonthlyObservation,
        H: MonthlyObservation,
    {
        let stations: BTreeSet<String> = filtered.iter().map(|r| r.station().to_string()).collect();
        Self::from_history(history, &stations)
    }

    pub fn mean(&self, station: &str, month: u32) -> Option<f64> {
        self.means.get(station)?.get(&month).copied()
    }

    /// Number of (station, month) entries.
    pub fn len(&self) -> usize {
        self.means.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stations(&self) -> impl Iterator<Item = &str> {
        self.means.keys().map(String::as_str)
    }

    /// Iterate `(station, month, mean)` in station then month order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32, f64)> {
        self.means.iter().flat_map(|(station, months)| {
            months
                .iter()
                .map(move |(&month, &mean)| (station.as_str(), month, mean))
        })
    }
}
