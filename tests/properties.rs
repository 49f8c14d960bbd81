use std::collections::BTreeSet;

use proptest::prelude::*;

use wxfoot_terminal::aggregate::{Selection, analyze};
use wxfoot_terminal::clip::{UpperLimit, clip_values};
use wxfoot_terminal::dataset::{MatchRow, PerformanceStats, WeatherObservation};
use wxfoot_terminal::metrics::{PerformanceMetric, WeatherMetric};
use wxfoot_terminal::stats::pearson;

const TEAMS: [&str; 5] = ["Arsenal", "Burnley", "Chelsea", "Fulham", "Wolves"];

fn row(team: &str, rainfall: Option<f64>, passing_ratio: Option<f64>) -> MatchRow {
    MatchRow {
        match_id: String::new(),
        team_name: team.to_string(),
        opposition_name: String::new(),
        competition_name: String::new(),
        match_date: String::new(),
        kick_off: String::new(),
        is_home: false,
        weather: WeatherObservation {
            rainfall,
            ..WeatherObservation::default()
        },
        performance: PerformanceStats {
            passing_ratio,
            ..PerformanceStats::default()
        },
    }
}

fn selection() -> Selection {
    Selection::new(WeatherMetric::Rainfall, PerformanceMetric::PassingRatio)
}

fn rows_strategy() -> impl Strategy<Value = Vec<MatchRow>> {
    prop::collection::vec(
        (
            0..TEAMS.len(),
            prop::option::weighted(0.9, 0.0f64..40.0),
            prop::option::weighted(0.9, 0.3f64..1.0),
        ),
        0..60,
    )
    .prop_map(|items| {
        items
            .into_iter()
            .map(|(team, w, p)| row(TEAMS[team], w, p))
            .collect()
    })
}

proptest! {
    #[test]
    fn output_teams_equal_input_teams(rows in rows_strategy()) {
        let analysis = analyze(&rows, selection()).unwrap();
        let expected: BTreeSet<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
        let got: BTreeSet<&str> = analysis.summaries.iter().map(|s| s.team_name.as_str()).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn clipping_is_idempotent(values in prop::collection::vec(-50.0f64..50.0, 0..40), bound in 0.0f64..30.0) {
        let once = clip_values(&values, Some(bound));
        let twice = clip_values(&once, Some(bound));
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.iter().all(|v| *v <= bound));
    }

    #[test]
    fn correlation_is_symmetric(pairs in prop::collection::vec((prop::option::of(-10.0f64..10.0), prop::option::of(-10.0f64..10.0)), 0..30)) {
        let forward = pearson(pairs.iter().copied());
        let swapped = pearson(pairs.iter().map(|(x, y)| (*y, *x)));
        match (forward, swapped) {
            (Some(a), Some(b)) => prop_assert!((a - b).abs() < 1e-9),
            (a, b) => prop_assert_eq!(a, b),
        }
    }

    #[test]
    fn correlations_stay_in_range(rows in rows_strategy()) {
        let analysis = analyze(&rows, selection()).unwrap();
        for r in analysis.summaries.iter().filter_map(|s| s.correlation).chain(analysis.season_pearson) {
            prop_assert!((-1.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn season_pearson_ignores_team_labels(rows in rows_strategy(), shift in 1..TEAMS.len()) {
        let relabelled: Vec<MatchRow> = rows
            .iter()
            .map(|r| {
                let idx = TEAMS.iter().position(|t| *t == r.team_name).unwrap_or(0);
                row(TEAMS[(idx + shift) % TEAMS.len()], r.weather.rainfall, r.performance.passing_ratio)
            })
            .collect();
        let a = analyze(&rows, selection()).unwrap().season_pearson;
        let b = analyze(&relabelled, selection()).unwrap().season_pearson;
        prop_assert_eq!(a, b);
    }

    #[test]
    fn clipped_analysis_never_exceeds_limit(rows in rows_strategy(), bound in 0.0f64..20.0) {
        let sel = selection().with_upper_limit(UpperLimit::enabled(bound));
        let analysis = analyze(&rows, sel).unwrap();
        for s in &analysis.summaries {
            if let Some(avg) = s.team_average_weather_metric {
                prop_assert!(avg <= bound + 1e-9);
            }
        }
    }
}

#[test]
fn single_match_team_has_undefined_correlation() {
    let rows = vec![
        row("Arsenal", Some(1.0), Some(0.8)),
        row("Burnley", Some(2.0), Some(0.7)),
        row("Burnley", Some(4.0), Some(0.6)),
    ];
    let analysis = analyze(&rows, selection()).unwrap();
    assert_eq!(analysis.summary_for("Arsenal").unwrap().correlation, None);
    assert!(analysis.summary_for("Burnley").unwrap().correlation.is_some());
}

#[test]
fn constant_performance_has_undefined_correlation() {
    let rows = vec![
        row("Arsenal", Some(1.0), Some(0.1)),
        row("Arsenal", Some(3.0), Some(0.1)),
        row("Arsenal", Some(7.0), Some(0.1)),
    ];
    let analysis = analyze(&rows, selection()).unwrap();
    assert_eq!(analysis.summaries[0].correlation, None);
}
