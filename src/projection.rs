//! Display-ready shapes for the season scatter, per-match scatter, correlation bars and the
//! raw tables. Everything here is a pure function of summaries / rows.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::aggregate::{Analysis, Selection, TeamSummary};
use crate::dataset::MatchRow;
use crate::stats::{self, Trendline};

pub const DEFAULT_SEASON_LABEL: &str = "23/24 Season";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartTitle {
    pub heading: String,
    pub subtitle: String,
}

impl ChartTitle {
    pub fn for_selection(heading: impl Into<String>, selection: &Selection) -> Self {
        let mut subtitle = format!(
            "{} vs {}",
            selection.performance.caption(),
            selection.weather.caption()
        );
        if selection.upper_limit.enabled {
            subtitle.push_str(&format!(" (upper limit = {})", selection.upper_limit.value));
        }
        Self {
            heading: heading.into(),
            subtitle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarSort {
    TeamName,
    Correlation,
}

impl BarSort {
    pub fn toggle(self) -> Self {
        match self {
            BarSort::TeamName => BarSort::Correlation,
            BarSort::Correlation => BarSort::TeamName,
        }
    }
}

/// Alphabetical, or ascending by correlation with undefined values last.
pub fn sort_summaries(summaries: &mut [TeamSummary], sort: BarSort) {
    match sort {
        BarSort::TeamName => summaries.sort_by(|a, b| a.team_name.cmp(&b.team_name)),
        BarSort::Correlation => summaries.sort_by(|a, b| {
            cmp_undefined_last(a.correlation, b.correlation)
                .then_with(|| a.team_name.cmp(&b.team_name))
        }),
    }
}

fn cmp_undefined_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Season scatter

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonPoint {
    pub team_name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonChart {
    pub title: ChartTitle,
    pub points: Vec<SeasonPoint>,
    pub color_by_team: bool,
    pub trendline: Option<Trendline>,
    pub average_weather_metric: Option<f64>,
    pub average_match_metric: Option<f64>,
}

/// One point per team. In colour-by-team mode no trendline is fitted.
pub fn season_chart(analysis: &Analysis, season_label: &str, color_by_team: bool) -> SeasonChart {
    let mut points: Vec<SeasonPoint> = analysis
        .summaries
        .iter()
        .filter_map(|s| {
            Some(SeasonPoint {
                team_name: s.team_name.clone(),
                x: s.team_average_weather_metric?,
                y: s.team_average_match_metric?,
            })
        })
        .collect();
    points.sort_by(|a, b| a.team_name.cmp(&b.team_name));

    let trendline = if color_by_team {
        None
    } else {
        Trendline::fit(&points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>())
    };

    SeasonChart {
        title: ChartTitle::for_selection(season_label, &analysis.selection),
        points,
        color_by_team,
        trendline,
        average_weather_metric: analysis.average_weather_metric,
        average_match_metric: analysis.average_match_metric,
    }
}

// Per-match scatter

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPoint {
    pub match_id: String,
    pub match_date: String,
    pub kick_off: String,
    pub opposition_name: String,
    pub competition_name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSeries {
    pub label: String,
    pub points: Vec<MatchPoint>,
    pub trendline: Option<Trendline>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchChart {
    pub title: ChartTitle,
    pub team_name: String,
    pub series: Vec<MatchSeries>,
}

impl MatchChart {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Rows are expected to be already clipped when the selection has a limit. Matches missing
/// either value are left out; points are ordered by match date.
pub fn match_chart(
    rows: &[MatchRow],
    team: &str,
    selection: &Selection,
    season_label: &str,
    split_home_away: bool,
) -> MatchChart {
    let mut team_rows: Vec<&MatchRow> = rows.iter().filter(|r| r.team_name == team).collect();
    team_rows.sort_by(|a, b| {
        a.date()
            .cmp(&b.date())
            .then_with(|| a.match_date.cmp(&b.match_date))
            .then_with(|| a.kick_off.cmp(&b.kick_off))
    });

    let to_point = |r: &MatchRow| -> Option<MatchPoint> {
        Some(MatchPoint {
            match_id: r.match_id.clone(),
            match_date: r.match_date.clone(),
            kick_off: r.kick_off.clone(),
            opposition_name: r.opposition_name.clone(),
            competition_name: r.competition_name.clone(),
            x: r.weather_value(selection.weather)?,
            y: r.performance_value(selection.performance)?,
        })
    };

    let groups: Vec<(String, Vec<&MatchRow>)> = if split_home_away {
        ["Home", "Away"]
            .into_iter()
            .map(|label| {
                let members = team_rows
                    .iter()
                    .copied()
                    .filter(|r| r.venue_label() == label)
                    .collect();
                (label.to_string(), members)
            })
            .collect()
    } else {
        vec![(team.to_string(), team_rows)]
    };

    let series = groups
        .into_iter()
        .map(|(label, members)| {
            let points: Vec<MatchPoint> = members.into_iter().filter_map(&to_point).collect();
            let pairs: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
            MatchSeries {
                label,
                trendline: Trendline::fit(&pairs),
                points,
            }
        })
        .filter(|s| !s.points.is_empty())
        .collect();

    MatchChart {
        title: ChartTitle::for_selection(format!("{team} {season_label}"), selection),
        team_name: team.to_string(),
        series,
    }
}

// Correlation bars

/// `correlation: None` is a gap: the bar keeps its slot but has no height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationBar {
    pub team_name: String,
    pub correlation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationChart {
    pub title: ChartTitle,
    pub bars: Vec<CorrelationBar>,
    pub sort: BarSort,
    pub season_pearson: Option<f64>,
}

impl CorrelationChart {
    pub fn resort(&mut self, sort: BarSort) {
        self.sort = sort;
        match sort {
            BarSort::TeamName => self.bars.sort_by(|a, b| a.team_name.cmp(&b.team_name)),
            BarSort::Correlation => self.bars.sort_by(|a, b| {
                cmp_undefined_last(a.correlation, b.correlation)
                    .then_with(|| a.team_name.cmp(&b.team_name))
            }),
        }
    }

    pub fn defined_bars(&self) -> impl Iterator<Item = &CorrelationBar> {
        self.bars.iter().filter(|b| b.correlation.is_some())
    }

    pub fn reference_label(&self) -> String {
        match self.season_pearson {
            Some(r) => format!("Pearson Value: {}", stats::round_to(r, 4)),
            None => "Pearson Value: n/a".to_string(),
        }
    }
}

pub fn correlation_chart(analysis: &Analysis, season_label: &str, sort: BarSort) -> CorrelationChart {
    let mut chart = CorrelationChart {
        title: ChartTitle::for_selection(season_label, &analysis.selection),
        bars: analysis
            .summaries
            .iter()
            .map(|s| CorrelationBar {
                team_name: s.team_name.clone(),
                correlation: s.correlation,
            })
            .collect(),
        sort,
        season_pearson: analysis.season_pearson,
    };
    chart.resort(sort);
    chart
}

pub fn format_correlation(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.3}"),
        None => "n/a".to_string(),
    }
}

// Raw tables

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn raw_match_table(rows: &[MatchRow]) -> TextTable {
    use crate::metrics::{PerformanceMetric, WeatherMetric};

    let mut headers: Vec<String> = [
        "match_id",
        "match_date",
        "kick_off",
        "competition_name",
        "team_name",
        "opposition_name",
        "home_away",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();
    headers.extend(WeatherMetric::ALL.iter().map(|m| m.column().to_string()));
    headers.extend(PerformanceMetric::ALL.iter().map(|m| m.column().to_string()));

    let rows = rows
        .iter()
        .map(|r| {
            let mut out = vec![
                r.match_id.clone(),
                r.match_date.clone(),
                r.kick_off.clone(),
                r.competition_name.clone(),
                r.team_name.clone(),
                r.opposition_name.clone(),
                r.venue_label().to_string(),
            ];
            out.extend(WeatherMetric::ALL.iter().map(|m| cell(r.weather_value(*m))));
            out.extend(PerformanceMetric::ALL.iter().map(|m| cell(r.performance_value(*m))));
            out
        })
        .collect();

    TextTable { headers, rows }
}

pub fn summary_table(summaries: &[TeamSummary]) -> TextTable {
    let headers = [
        "team_name",
        "weather_metric",
        "match_metric",
        "average_weather_metric",
        "average_match_metric",
        "team_average_weather_metric",
        "team_average_match_metric",
        "correlation",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                s.team_name.clone(),
                s.weather_metric.column().to_string(),
                s.match_metric.column().to_string(),
                cell(s.average_weather_metric),
                cell(s.average_match_metric),
                cell(s.team_average_weather_metric),
                cell(s.team_average_match_metric),
                cell(s.correlation),
            ]
        })
        .collect();

    TextTable { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::UpperLimit;
    use crate::metrics::{PerformanceMetric, WeatherMetric};

    fn summary(team: &str, r: Option<f64>) -> TeamSummary {
        TeamSummary {
            team_name: team.to_string(),
            weather_metric: WeatherMetric::WindGust,
            match_metric: PerformanceMetric::PassingRatio,
            average_weather_metric: Some(1.0),
            average_match_metric: Some(1.0),
            team_average_weather_metric: Some(1.0),
            team_average_match_metric: Some(1.0),
            correlation: r,
        }
    }

    #[test]
    fn title_mentions_limit_only_when_enabled() {
        let sel = Selection::new(WeatherMetric::WindSpeed, PerformanceMetric::Directness);
        let title = ChartTitle::for_selection(DEFAULT_SEASON_LABEL, &sel);
        assert_eq!(title.heading, "23/24 Season");
        assert_eq!(title.subtitle, "Team Match Directness vs Wind Speed 10M");

        let sel = sel.with_upper_limit(UpperLimit::enabled(10.0));
        let title = ChartTitle::for_selection("Bolton 23/24 Season", &sel);
        assert_eq!(
            title.subtitle,
            "Team Match Directness vs Wind Speed 10M (upper limit = 10)"
        );
    }

    #[test]
    fn season_chart_omits_teams_without_averages() {
        let mut no_weather = summary("Bolton", None);
        no_weather.team_average_weather_metric = None;
        let analysis = Analysis {
            selection: Selection::new(WeatherMetric::WindGust, PerformanceMetric::PassingRatio),
            rows: 5,
            average_weather_metric: Some(1.0),
            average_match_metric: Some(1.0),
            season_pearson: None,
            summaries: vec![summary("Arsenal", Some(0.2)), no_weather, summary("Crewe", None)],
        };

        let chart = season_chart(&analysis, DEFAULT_SEASON_LABEL, false);
        let teams: Vec<&str> = chart.points.iter().map(|p| p.team_name.as_str()).collect();
        assert_eq!(teams, vec!["Arsenal", "Crewe"]);

        let bars = correlation_chart(&analysis, DEFAULT_SEASON_LABEL, BarSort::TeamName);
        assert_eq!(bars.bars.len(), 3);
    }

    #[test]
    fn correlation_sort_puts_undefined_last() {
        let mut rows = vec![
            summary("Derby", Some(0.4)),
            summary("Bolton", None),
            summary("Arsenal", Some(-0.2)),
            summary("Charlton", Some(0.1)),
        ];
        sort_summaries(&mut rows, BarSort::Correlation);
        let order: Vec<&str> = rows.iter().map(|s| s.team_name.as_str()).collect();
        assert_eq!(order, vec!["Arsenal", "Charlton", "Derby", "Bolton"]);

        sort_summaries(&mut rows, BarSort::TeamName);
        let order: Vec<&str> = rows.iter().map(|s| s.team_name.as_str()).collect();
        assert_eq!(order, vec!["Arsenal", "Bolton", "Charlton", "Derby"]);
    }

    #[test]
    fn reference_label_rounds_to_four_places() {
        let chart = CorrelationChart {
            title: ChartTitle {
                heading: String::new(),
                subtitle: String::new(),
            },
            bars: Vec::new(),
            sort: BarSort::TeamName,
            season_pearson: Some(0.123_456),
        };
        assert_eq!(chart.reference_label(), "Pearson Value: 0.1235");
    }

    #[test]
    fn formats_gap_as_na() {
        assert_eq!(format_correlation(None), "n/a");
        assert_eq!(format_correlation(Some(0.5)), "+0.500");
        assert_eq!(format_correlation(Some(-0.25)), "-0.250");
    }

    #[test]
    fn summary_table_leaves_undefined_cells_blank() {
        let table = summary_table(&[summary("Arsenal", None)]);
        assert_eq!(table.headers.len(), 8);
        assert_eq!(table.rows[0][1], "wind_gust_10m");
        assert_eq!(table.rows[0][7], "");
    }
}
