//! One-call analysis of a monthly precipitation table.
//!
//! Applies the record filter from an [`AnalysisConfig`], then computes
//! anomalies of the filtered rows against the full history and the SPI of
//! each filtered station. SPI series span the selected years with every
//! rejected month kept as a missing value, so accumulation windows stay
//! consecutive.

use crate::config::AnalysisConfig;
use crate::core::MonthlyObservation;
use crate::error::Result;
use crate::indices::{
    calculate_monthly_anomalies, calculate_spi, AnomalyRecord, ClimateIndex, SpiResult,
};
use std::collections::{BTreeMap, BTreeSet};

/// Output of [`analyze`].
#[derive(Debug, Clone)]
pub struct AnalysisReport<R> {
    /// Filtered rows with their anomalies, in history order.
    pub anomalies: Vec<AnomalyRecord<R>>,
    /// SPI per station of the filtered rows.
    pub spi: BTreeMap<String, SpiResult>,
    /// Climate index attached to the anomaly rows, if one was requested.
    pub climate_index: Option<ClimateIndex>,
}

impl<R> AnalysisReport<R> {
    /// Stations whose SPI fit failed.
    pub fn degraded_stations(&self) -> Vec<&str> {
        self.spi
            .iter()
            .filter(|(_, spi)| spi.is_degraded())
            .map(|(station, _)| station.as_str())
            .collect()
    }
}

/// Filter `history`, then compute anomalies and per-station SPI.
pub fn analyze<R>(history: &[R], config: &AnalysisConfig) -> Result<AnalysisReport<R>>
where
    R: MonthlyObservation + Clone,
{
    config.validate()?;

    let filter = config.record_filter();
    let filtered = filter.apply(history);
    tracing::debug!(
        history = history.len(),
        filtered = filtered.len(),
        "applied record filter"
    );

    let options = config.anomaly_options();
    let anomalies = calculate_monthly_anomalies(&filtered, history, &options);

    let stations: BTreeSet<&str> = filtered.iter().map(|r| r.station()).collect();
    let spi = stations
        .into_iter()
        .map(|station| {
            let series = filter.masked_series(history, station);
            calculate_spi(&series, config.spi_window).map(|spi| (station.to_string(), spi))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(AnalysisReport {
        anomalies,
        spi,
        climate_index: options.climate_index.index(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MonthlyRecord;
    use chrono::NaiveDate;

    fn table() -> Vec<MonthlyRecord> {
        let wet = [120.0, 95.0, 140.0, 60.0, 30.0, 15.0, 10.0, 25.0, 70.0, 150.0, 180.0, 130.0];
        let mut rows = Vec::new();
        for year in 2000..2004 {
            for (i, base) in wet.iter().enumerate() {
                let month = i as u32 + 1;
                let shift = (year - 2000) as f64 * 7.0 + month as f64;
                rows.push(MonthlyRecord::from_parts("A", year, month, base + shift).unwrap());
                rows.push(MonthlyRecord::from_parts("B", year, month, 50.0).unwrap());
            }
        }
        rows
    }

    #[test]
    fn analyze_filters_then_computes() {
        let config = AnalysisConfig {
            spi_window: 3,
            year_range: (2002, 2003),
            ..AnalysisConfig::default()
        };
        let report = analyze(&table(), &config).unwrap();

        assert_eq!(report.anomalies.len(), 48);
        assert!(report.anomalies.iter().all(|a| a.has_anomaly()));
        assert_eq!(report.spi.len(), 2);
        assert_eq!(report.spi["A"].len(), 24);
        assert_eq!(report.degraded_stations(), vec!["B"]);
        assert_eq!(report.climate_index, None);
    }

    #[test]
    fn excluded_months_break_spi_windows() {
        let mut rows = table();
        let may = rows
            .iter_mut()
            .find(|r| r.station == "A" && r.year == 2000 && r.month == 5)
            .unwrap();
        may.precipitation = f64::NAN;
        let june = NaiveDate::from_ymd_opt(2000, 6, 1).unwrap();
        let july = NaiveDate::from_ymd_opt(2000, 7, 1).unwrap();

        let kept = AnalysisConfig {
            spi_window: 2,
            year_range: (2000, 2003),
            ..AnalysisConfig::default()
        };
        let excluded = AnalysisConfig {
            exclude_missing: true,
            ..kept.clone()
        };

        let with_gap = analyze(&rows, &kept).unwrap();
        let without_gap = analyze(&rows, &excluded).unwrap();

        for report in [&with_gap, &without_gap] {
            let spi = &report.spi["A"];
            assert_eq!(spi.len(), 48);
            assert!(spi.get(june).unwrap().is_nan());
            assert!(spi.get(july).unwrap().is_finite());
        }
        assert_eq!(with_gap.anomalies.len(), 96);
        assert_eq!(without_gap.anomalies.len(), 95);
    }

    #[test]
    fn month_subset_leaves_other_months_missing() {
        let config = AnalysisConfig {
            spi_window: 2,
            year_range: (2000, 2003),
            months: vec![1, 2, 3, 4, 5, 6],
            ..AnalysisConfig::default()
        };
        let report = analyze(&table(), &config).unwrap();
        let spi = &report.spi["A"];

        let january = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        let february = NaiveDate::from_ymd_opt(2001, 2, 1).unwrap();
        // December is outside the selection, so January's window is incomplete.
        assert!(spi.get(january).unwrap().is_nan());
        assert!(spi.get(february).unwrap().is_finite());
        assert!(spi.get(NaiveDate::from_ymd_opt(2001, 8, 1).unwrap()).unwrap().is_nan());
    }

    #[test]
    fn climate_index_choice_selects_the_column() {
        let rows: Vec<MonthlyRecord> = table()
            .into_iter()
            .map(|r| {
                r.with_climate_index(ClimateIndex::Oni, 1.0)
                    .with_climate_index(ClimateIndex::Soi, -0.5)
            })
            .collect();
        let oni = AnalysisConfig {
            climate_index: Some(ClimateIndex::Oni),
            ..AnalysisConfig::default()
        };
        let soi = AnalysisConfig {
            climate_index: Some(ClimateIndex::Soi),
            ..AnalysisConfig::default()
        };

        let oni = analyze(&rows, &oni).unwrap();
        let soi = analyze(&rows, &soi).unwrap();
        assert!(oni.anomalies.iter().all(|a| a.climate_index() == Some(1.0)));
        assert!(soi.anomalies.iter().all(|a| a.climate_index() == Some(-0.5)));
        assert_eq!(soi.climate_index, Some(ClimateIndex::Soi));
    }

    #[test]
    fn analyze_rejects_invalid_config() {
        let config = AnalysisConfig {
            spi_window: 0,
            ..AnalysisConfig::default()
        };
        assert!(analyze(&table(), &config).is_err());
    }
}
