use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::clip::{self, UpperLimit};
use crate::dataset::MatchRow;
use crate::error::Result;
use crate::metrics::{Metric, PerformanceMetric, WeatherMetric};
use crate::stats;

/// The two metric choices plus the optional weather clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub weather: WeatherMetric,
    pub performance: PerformanceMetric,
    pub upper_limit: UpperLimit,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            weather: WeatherMetric::Rainfall,
            performance: PerformanceMetric::Directness,
            upper_limit: UpperLimit::default(),
        }
    }
}

impl Selection {
    pub fn new(weather: WeatherMetric, performance: PerformanceMetric) -> Self {
        Self {
            weather,
            performance,
            upper_limit: UpperLimit::default(),
        }
    }

    /// Builds a selection from raw column names, as a host would receive them.
    pub fn from_columns(weather: &str, performance: &str) -> Result<Self> {
        Ok(Self::new(weather.parse()?, performance.parse()?))
    }

    pub fn with_upper_limit(mut self, limit: UpperLimit) -> Self {
        self.upper_limit = limit;
        self
    }
}

/// One row per team for the selected metric pair. Field names match the long-format
/// summary CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team_name: String,
    pub weather_metric: WeatherMetric,
    pub match_metric: PerformanceMetric,
    pub average_weather_metric: Option<f64>,
    pub average_match_metric: Option<f64>,
    pub team_average_weather_metric: Option<f64>,
    pub team_average_match_metric: Option<f64>,
    pub correlation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub selection: Selection,
    pub rows: usize,
    pub average_weather_metric: Option<f64>,
    pub average_match_metric: Option<f64>,
    pub season_pearson: Option<f64>,
    pub summaries: Vec<TeamSummary>,
}

impl Analysis {
    pub fn summary_for(&self, team: &str) -> Option<&TeamSummary> {
        self.summaries.iter().find(|s| s.team_name == team)
    }

    pub fn team_names(&self) -> Vec<&str> {
        self.summaries.iter().map(|s| s.team_name.as_str()).collect()
    }
}

/// Clips (when enabled), then summarises per team. Summaries are ordered by team name.
pub fn analyze(rows: &[MatchRow], selection: Selection) -> Result<Analysis> {
    let clipped = clip::clip_rows(rows, selection.weather, selection.upper_limit)?;
    Ok(analyze_clipped(&clipped, selection))
}

/// Summarises rows that were already clipped for `selection` (see `clip::clip_rows`).
pub fn analyze_clipped(rows: &[MatchRow], selection: Selection) -> Analysis {
    let average_weather_metric = stats::mean(rows.iter().map(|r| r.weather_value(selection.weather)));
    let average_match_metric =
        stats::mean(rows.iter().map(|r| r.performance_value(selection.performance)));
    let season_pearson = season_pearson(rows, selection.weather, selection.performance);

    let summaries = team_summaries(
        rows,
        selection.weather,
        selection.performance,
        average_weather_metric,
        average_match_metric,
    );

    tracing::debug!(
        weather = selection.weather.column(),
        performance = selection.performance.column(),
        rows = rows.len(),
        teams = summaries.len(),
        "recomputed team summaries"
    );

    Analysis {
        selection,
        rows: rows.len(),
        average_weather_metric,
        average_match_metric,
        season_pearson,
        summaries,
    }
}

/// Per-team summaries without clipping. The global averages are taken over every row, each
/// from its own column.
pub fn summarize_by_team(
    rows: &[MatchRow],
    weather: WeatherMetric,
    performance: PerformanceMetric,
) -> Vec<TeamSummary> {
    let avg_w = stats::mean(rows.iter().map(|r| r.weather_value(weather)));
    let avg_p = stats::mean(rows.iter().map(|r| r.performance_value(performance)));
    team_summaries(rows, weather, performance, avg_w, avg_p)
}

fn team_summaries(
    rows: &[MatchRow],
    weather: WeatherMetric,
    performance: PerformanceMetric,
    average_weather_metric: Option<f64>,
    average_match_metric: Option<f64>,
) -> Vec<TeamSummary> {
    let mut by_team: BTreeMap<&str, Vec<&MatchRow>> = BTreeMap::new();
    for row in rows {
        by_team.entry(row.team_name.as_str()).or_default().push(row);
    }

    by_team
        .into_iter()
        .map(|(team, team_rows)| TeamSummary {
            team_name: team.to_string(),
            weather_metric: weather,
            match_metric: performance,
            average_weather_metric,
            average_match_metric,
            team_average_weather_metric: stats::mean(
                team_rows.iter().map(|r| r.weather_value(weather)),
            ),
            team_average_match_metric: stats::mean(
                team_rows.iter().map(|r| r.performance_value(performance)),
            ),
            correlation: stats::pearson(
                team_rows
                    .iter()
                    .map(|r| (r.weather_value(weather), r.performance_value(performance))),
            ),
        })
        .collect()
}

/// Pearson r over every row, ignoring team grouping.
pub fn season_pearson(
    rows: &[MatchRow],
    weather: WeatherMetric,
    performance: PerformanceMetric,
) -> Option<f64> {
    correlate(rows, Metric::Weather(weather), Metric::Performance(performance))
}

/// Pearson r between any two catalogue columns over `rows`.
pub fn correlate(rows: &[MatchRow], a: Metric, b: Metric) -> Option<f64> {
    stats::pearson(rows.iter().map(|r| (r.value(a), r.value(b))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{PerformanceStats, WeatherObservation};
    use approx::assert_relative_eq;

    fn row(team: &str, w: f64, p: f64) -> MatchRow {
        MatchRow {
            match_id: format!("{team}-{w}"),
            team_name: team.to_string(),
            opposition_name: "Opp".to_string(),
            competition_name: "League Two".to_string(),
            match_date: "2023-08-05".to_string(),
            kick_off: "15:00".to_string(),
            is_home: true,
            weather: WeatherObservation {
                wind_speed: Some(w),
                ..Default::default()
            },
            performance: PerformanceStats {
                directness: Some(p),
                ..Default::default()
            },
        }
    }

    fn selection() -> Selection {
        Selection::new(WeatherMetric::WindSpeed, PerformanceMetric::Directness)
    }

    #[test]
    fn worked_example() {
        let rows = vec![row("A", 5.0, 1.0), row("A", 10.0, 2.0), row("B", 5.0, 3.0)];
        let analysis = analyze(&rows, selection()).unwrap();
        assert_eq!(analysis.team_names(), vec!["A", "B"]);

        let a = analysis.summary_for("A").unwrap();
        assert_relative_eq!(a.team_average_weather_metric.unwrap(), 7.5);
        assert_relative_eq!(a.team_average_match_metric.unwrap(), 1.5);
        assert_relative_eq!(a.correlation.unwrap(), 1.0, epsilon = 1e-12);

        let b = analysis.summary_for("B").unwrap();
        assert_eq!(b.correlation, None);
        assert_relative_eq!(b.team_average_match_metric.unwrap(), 3.0);
    }

    #[test]
    fn global_averages_use_their_own_columns() {
        let rows = vec![row("A", 5.0, 1.0), row("A", 10.0, 2.0), row("B", 6.0, 3.0)];
        let analysis = analyze(&rows, selection()).unwrap();
        assert_relative_eq!(analysis.average_weather_metric.unwrap(), 7.0);
        assert_relative_eq!(analysis.average_match_metric.unwrap(), 2.0);
        for s in &analysis.summaries {
            assert_eq!(s.average_weather_metric, analysis.average_weather_metric);
            assert_eq!(s.average_match_metric, analysis.average_match_metric);
        }
    }

    #[test]
    fn clip_applies_before_averaging() {
        let rows = vec![row("A", 5.0, 1.0), row("A", 30.0, 2.0)];
        let sel = selection().with_upper_limit(UpperLimit::enabled(10.0));
        let analysis = analyze(&rows, sel).unwrap();
        assert_relative_eq!(analysis.summaries[0].team_average_weather_metric.unwrap(), 7.5);
        assert_relative_eq!(analysis.average_weather_metric.unwrap(), 7.5);
    }

    #[test]
    fn pre_clipped_rows_give_the_same_analysis() {
        let rows = vec![row("A", 5.0, 1.0), row("A", 30.0, 2.0), row("B", 12.0, 0.5)];
        let sel = selection().with_upper_limit(UpperLimit::enabled(10.0));
        let clipped = clip::clip_rows(&rows, sel.weather, sel.upper_limit).unwrap();
        assert_eq!(analyze_clipped(&clipped, sel), analyze(&rows, sel).unwrap());
    }

    #[test]
    fn empty_input_is_empty_result() {
        let analysis = analyze(&[], selection()).unwrap();
        assert!(analysis.summaries.is_empty());
        assert_eq!(analysis.rows, 0);
        assert_eq!(analysis.season_pearson, None);
        assert_eq!(analysis.average_weather_metric, None);
    }

    #[test]
    fn constant_performance_gives_undefined_correlation() {
        let rows = vec![row("A", 1.0, 0.3), row("A", 4.0, 0.3), row("A", 9.0, 0.3)];
        let summaries = summarize_by_team(&rows, WeatherMetric::WindSpeed, PerformanceMetric::Directness);
        assert_eq!(summaries[0].correlation, None);
    }

    #[test]
    fn season_pearson_ignores_grouping() {
        let rows = vec![
            row("A", 1.0, 2.0),
            row("B", 2.0, 1.0),
            row("A", 3.0, 4.0),
            row("C", 4.0, 3.0),
        ];
        let season = season_pearson(&rows, WeatherMetric::WindSpeed, PerformanceMetric::Directness).unwrap();
        let direct = stats::pearson_complete(&[(1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 3.0)]).unwrap();
        assert_relative_eq!(season, direct, epsilon = 1e-12);
    }

    #[test]
    fn selection_from_unknown_column_fails() {
        let err = Selection::from_columns("humidity", "team_match_directness").unwrap_err();
        assert_eq!(err.to_string(), "unrecognized metric: humidity");
        assert!(Selection::from_columns("wind_speed_10m", "team_match_directness").is_ok());
    }
}
