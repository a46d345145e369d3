//! Benchmarks for the SPI estimator and anomaly calculator.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use precip_indices::core::{MonthlyRecord, PrecipitationSeries};
use precip_indices::indices::{calculate_monthly_anomalies, calculate_spi, AnomalyOptions};

fn month_date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(1900 + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap()
}

fn generate_rainfall(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let seasonal = (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin();
            120.0 + 80.0 * seasonal + (i * 37 % 23) as f64
        })
        .collect()
}

fn bench_spi(c: &mut Criterion) {
    let mut group = c.benchmark_group("spi");

    for size in [120, 480, 1200].iter() {
        let values = generate_rainfall(*size);
        let series =
            PrecipitationSeries::new((0..*size).map(month_date).collect(), values).unwrap();

        for window in [3, 12] {
            group.bench_with_input(
                BenchmarkId::new(format!("window_{window}"), size),
                size,
                |b, _| b.iter(|| calculate_spi(black_box(&series), window)),
            );
        }
    }

    group.finish();
}

fn bench_anomalies(c: &mut Criterion) {
    let mut group = c.benchmark_group("anomalies");

    for stations in [10, 100].iter() {
        let history: Vec<MonthlyRecord> = (0..*stations)
            .flat_map(|s| {
                generate_rainfall(600)
                    .into_iter()
                    .enumerate()
                    .map(move |(i, p)| MonthlyRecord::new(format!("S{s}"), month_date(i), p))
            })
            .collect();
        let filtered: Vec<MonthlyRecord> = history
            .iter()
            .filter(|r| r.year >= 1940)
            .cloned()
            .collect();

        group.bench_with_input(BenchmarkId::new("monthly", stations), stations, |b, _| {
            b.iter(|| {
                calculate_monthly_anomalies(
                    black_box(&filtered),
                    black_box(&history),
                    &AnomalyOptions::new(),
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_spi, bench_anomalies);
criterion_main!(benches);
