use std::path::PathBuf;

use wxfoot_terminal::aggregate::{Selection, analyze};
use wxfoot_terminal::clip::{UpperLimit, clip_rows};
use wxfoot_terminal::dataset::Dataset;
use wxfoot_terminal::metrics::{PerformanceMetric, WeatherMetric};
use wxfoot_terminal::projection::{
    BarSort, correlation_chart, format_correlation, match_chart, raw_match_table, season_chart,
};

fn fixture() -> Dataset {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/combined_sample.csv");
    Dataset::load_csv(&path).expect("fixture loads")
}

fn rain_vs_directness() -> Selection {
    Selection::new(WeatherMetric::Rainfall, PerformanceMetric::Directness)
}

#[test]
fn season_scatter_has_one_point_per_team() {
    let dataset = fixture();
    let analysis = analyze(&dataset.rows, rain_vs_directness()).unwrap();

    let chart = season_chart(&analysis, "23/24 Season", false);
    assert_eq!(chart.title.heading, "23/24 Season");
    assert_eq!(chart.title.subtitle, "Team Match Directness vs Total Rainfall Amount Previous Hour");
    let teams: Vec<&str> = chart.points.iter().map(|p| p.team_name.as_str()).collect();
    assert_eq!(teams, vec!["Arsenal", "Burnley", "Luton Town"]);
    assert!(chart.trendline.is_some());

    let coloured = season_chart(&analysis, "23/24 Season", true);
    assert!(coloured.trendline.is_none());
    assert_eq!(coloured.points, chart.points);
}

#[test]
fn match_scatter_orders_by_date_and_splits_venues() {
    let dataset = fixture();
    let selection = rain_vs_directness();
    let chart = match_chart(&dataset.rows, "Arsenal", &selection, "23/24 Season", true);

    assert_eq!(chart.title.heading, "Arsenal 23/24 Season");
    assert_eq!(chart.point_count(), 3);
    let home = &chart.series[0];
    assert_eq!(home.label, "Home");
    assert_eq!(home.points.len(), 1);
    assert!(home.trendline.is_none());

    let away = &chart.series[1];
    let ids: Vec<&str> = away.points.iter().map(|p| p.match_id.as_str()).collect();
    assert_eq!(ids, vec!["3904", "3903"]);
    assert_eq!(away.points[1].opposition_name, "Luton Town");

    let merged = match_chart(&dataset.rows, "Arsenal", &selection, "23/24 Season", false);
    let ids: Vec<&str> = merged.series[0].points.iter().map(|p| p.match_id.as_str()).collect();
    assert_eq!(ids, vec!["3901", "3904", "3903"]);
}

#[test]
fn match_scatter_uses_clipped_rows() {
    let dataset = fixture();
    let limit = UpperLimit::enabled(10.0);
    let selection = rain_vs_directness().with_upper_limit(limit);
    let clipped = clip_rows(&dataset.rows, WeatherMetric::Rainfall, limit).unwrap();

    let chart = match_chart(&clipped, "Luton Town", &selection, "23/24 Season", false);
    let xs: Vec<f64> = chart.series[0].points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![2.0, 10.0]);
    assert!(chart.title.subtitle.ends_with("(upper limit = 10)"));
}

#[test]
fn unknown_team_gives_empty_match_chart() {
    let dataset = fixture();
    let chart = match_chart(&dataset.rows, "Wolves", &rain_vs_directness(), "23/24 Season", true);
    assert_eq!(chart.point_count(), 0);
    assert!(chart.series.is_empty());
}

#[test]
fn correlation_bars_keep_undefined_teams_as_gaps() {
    let dataset = fixture();
    // Luton's second match has no high-press value, leaving a single complete pair.
    let analysis = analyze(
        &dataset.rows,
        Selection::new(WeatherMetric::WindSpeed, PerformanceMetric::HighPressShotsConceded),
    )
    .unwrap();
    let chart = correlation_chart(&analysis, "23/24 Season", BarSort::Correlation);

    assert_eq!(chart.bars.len(), 3);
    let last = chart.bars.last().unwrap();
    assert_eq!(last.team_name, "Luton Town");
    assert_eq!(last.correlation, None);
    assert_eq!(format_correlation(last.correlation), "n/a");
    assert_eq!(chart.defined_bars().count(), 2);
    assert!(chart.reference_label().starts_with("Pearson Value: "));
}

#[test]
fn raw_table_has_all_columns() {
    let dataset = fixture();
    let table = raw_match_table(&dataset.rows);
    assert_eq!(table.headers.len(), 7 + 4 + 8);
    assert_eq!(table.rows.len(), 8);
    let venue_col = table.headers.iter().position(|h| h == "home_away").unwrap();
    assert_eq!(table.rows[0][venue_col], "Home");
    assert_eq!(table.rows[1][venue_col], "Away");
}
