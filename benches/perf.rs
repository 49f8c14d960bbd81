use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use wxfoot_terminal::aggregate::{Selection, analyze};
use wxfoot_terminal::clip::UpperLimit;
use wxfoot_terminal::dataset::load_matches_from_reader;
use wxfoot_terminal::demo_data::{demo_dataset, demo_rows};
use wxfoot_terminal::metrics::{PerformanceMetric, WeatherMetric};
use wxfoot_terminal::projection::{BarSort, correlation_chart, match_chart, raw_match_table};

const LEAGUE: &[&str] = &[
    "Arsenal",
    "Aston Villa",
    "Bournemouth",
    "Brentford",
    "Brighton",
    "Burnley",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Fulham",
    "Liverpool",
    "Luton Town",
    "Manchester City",
    "Manchester United",
    "Newcastle United",
    "Nottingham Forest",
    "Sheffield United",
    "Tottenham Hotspur",
    "West Ham United",
    "Wolves",
];

fn bench_analyze(c: &mut Criterion) {
    let rows = demo_rows(7, LEAGUE);
    let selection = Selection::new(WeatherMetric::Rainfall, PerformanceMetric::PassingRatio)
        .with_upper_limit(UpperLimit::enabled(10.0));
    c.bench_function("analyze_full_season", |b| {
        b.iter(|| {
            let analysis = analyze(black_box(&rows), selection).unwrap();
            black_box(analysis.summaries.len());
        })
    });
}

fn bench_every_metric_pair(c: &mut Criterion) {
    let rows = demo_rows(7, LEAGUE);
    c.bench_function("analyze_all_metric_pairs", |b| {
        b.iter(|| {
            for weather in WeatherMetric::ALL {
                for performance in PerformanceMetric::ALL {
                    let analysis = analyze(&rows, Selection::new(weather, performance)).unwrap();
                    black_box(analysis.season_pearson);
                }
            }
        })
    });
}

fn bench_projections(c: &mut Criterion) {
    let rows = demo_rows(7, LEAGUE);
    let selection = Selection::new(WeatherMetric::WindGust, PerformanceMetric::Directness);
    let analysis = analyze(&rows, selection).unwrap();
    c.bench_function("correlation_chart_sorted", |b| {
        b.iter(|| {
            let chart = correlation_chart(black_box(&analysis), "23/24 Season", BarSort::Correlation);
            black_box(chart.bars.len());
        })
    });
    c.bench_function("match_chart_split", |b| {
        b.iter(|| {
            let chart = match_chart(&rows, black_box("Burnley"), &selection, "23/24 Season", true);
            black_box(chart.point_count());
        })
    });
}

fn bench_csv_load(c: &mut Criterion) {
    let dataset = demo_dataset(3);
    let table = raw_match_table(&dataset.rows);
    let mut csv = String::new();
    csv.push_str(&table.headers.join(","));
    csv.push_str(",home_team\n");
    for (row, source) in table.rows.iter().zip(dataset.rows.iter()) {
        csv.push_str(&row.join(","));
        let home = if source.is_home {
            source.team_name.as_str()
        } else {
            source.opposition_name.as_str()
        };
        csv.push(',');
        csv.push_str(home);
        csv.push('\n');
    }

    c.bench_function("load_match_csv", |b| {
        b.iter(|| {
            let loaded = load_matches_from_reader(black_box(csv.as_bytes())).unwrap();
            black_box(loaded.rows.len());
        })
    });
}

criterion_group!(
    benches,
    bench_analyze,
    bench_every_metric_pair,
    bench_projections,
    bench_csv_load
);
criterion_main!(benches);
