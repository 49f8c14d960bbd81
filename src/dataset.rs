use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::TeamSummary;
use crate::error::{AnalysisError, Result};
use crate::metrics::{Metric, PerformanceMetric, WeatherMetric};

pub const DEFAULT_DATA_PATH: &str = "data/combined_match_stats_with_weather.csv";
pub const DEFAULT_SUMMARY_PATH: &str = "data/weather_impact_summary_long.csv";

const REQUIRED_MATCH_COLUMN: &str = "team_name";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub rainfall: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub feels_like_temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub directness: Option<f64>,
    pub pace_towards_goal: Option<f64>,
    pub gk_pass_distance: Option<f64>,
    pub gk_long_pass_ratio: Option<f64>,
    pub ball_in_play_time: Option<f64>,
    pub dribble_ratio: Option<f64>,
    pub high_press_shots_conceded: Option<f64>,
    pub passing_ratio: Option<f64>,
}

/// One team's side of one match, joined with the weather at kickoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub match_id: String,
    pub team_name: String,
    pub opposition_name: String,
    pub competition_name: String,
    pub match_date: String,
    pub kick_off: String,
    pub is_home: bool,
    pub weather: WeatherObservation,
    pub performance: PerformanceStats,
}

/// The wide per-match table, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<MatchRow>,
    pub skipped: usize,
}

impl WeatherObservation {
    pub fn get(&self, metric: WeatherMetric) -> Option<f64> {
        match metric {
            WeatherMetric::Rainfall => self.rainfall,
            WeatherMetric::WindSpeed => self.wind_speed,
            WeatherMetric::WindGust => self.wind_gust,
            WeatherMetric::FeelsLikeTemperature => self.feels_like_temperature,
        }
    }

    pub fn set(&mut self, metric: WeatherMetric, value: Option<f64>) {
        let slot = match metric {
            WeatherMetric::Rainfall => &mut self.rainfall,
            WeatherMetric::WindSpeed => &mut self.wind_speed,
            WeatherMetric::WindGust => &mut self.wind_gust,
            WeatherMetric::FeelsLikeTemperature => &mut self.feels_like_temperature,
        };
        *slot = value;
    }
}

impl PerformanceStats {
    pub fn get(&self, metric: PerformanceMetric) -> Option<f64> {
        match metric {
            PerformanceMetric::Directness => self.directness,
            PerformanceMetric::PaceTowardsGoal => self.pace_towards_goal,
            PerformanceMetric::GkPassDistance => self.gk_pass_distance,
            PerformanceMetric::GkLongPassRatio => self.gk_long_pass_ratio,
            PerformanceMetric::BallInPlayTime => self.ball_in_play_time,
            PerformanceMetric::DribbleRatio => self.dribble_ratio,
            PerformanceMetric::HighPressShotsConceded => self.high_press_shots_conceded,
            PerformanceMetric::PassingRatio => self.passing_ratio,
        }
    }

    pub fn set(&mut self, metric: PerformanceMetric, value: Option<f64>) {
        let slot = match metric {
            PerformanceMetric::Directness => &mut self.directness,
            PerformanceMetric::PaceTowardsGoal => &mut self.pace_towards_goal,
            PerformanceMetric::GkPassDistance => &mut self.gk_pass_distance,
            PerformanceMetric::GkLongPassRatio => &mut self.gk_long_pass_ratio,
            PerformanceMetric::BallInPlayTime => &mut self.ball_in_play_time,
            PerformanceMetric::DribbleRatio => &mut self.dribble_ratio,
            PerformanceMetric::HighPressShotsConceded => &mut self.high_press_shots_conceded,
            PerformanceMetric::PassingRatio => &mut self.passing_ratio,
        };
        *slot = value;
    }
}

impl MatchRow {
    pub fn weather_value(&self, metric: WeatherMetric) -> Option<f64> {
        self.weather.get(metric)
    }

    pub fn performance_value(&self, metric: PerformanceMetric) -> Option<f64> {
        self.performance.get(metric)
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Weather(m) => self.weather_value(m),
            Metric::Performance(m) => self.performance_value(m),
        }
    }

    pub fn venue_label(&self) -> &'static str {
        if self.is_home { "Home" } else { "Away" }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_match_date(&self.match_date)
    }
}

impl Dataset {
    pub fn from_rows(rows: Vec<MatchRow>) -> Self {
        Self { rows, skipped: 0 }
    }

    pub fn load_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = load_matches_from_reader(file).map_err(|err| match err {
            AnalysisError::Csv { source, .. } => AnalysisError::Csv {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.rows.len(),
            skipped = dataset.skipped,
            "loaded match table"
        );
        Ok(dataset)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Distinct team names, sorted.
    pub fn team_names(&self) -> Vec<String> {
        team_names(&self.rows)
    }
}

pub fn team_names(rows: &[MatchRow]) -> Vec<String> {
    rows.iter()
        .map(|r| r.team_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawMatchRow {
    #[serde(default)]
    match_id: String,
    team_name: String,
    #[serde(default)]
    opposition_name: String,
    #[serde(default)]
    competition_name: String,
    #[serde(default)]
    match_date: String,
    #[serde(default)]
    kick_off: String,
    #[serde(default)]
    home_team: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    total_rainfall_amount_previous_hour: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    wind_speed_10m: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    wind_gust_10m: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    feels_like_temperature: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_match_directness: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_match_pace_towards_goal: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_match_gk_pass_distance: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_match_gk_long_pass_ratio: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_match_ball_in_play_time: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_match_dribble_ratio: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_match_high_press_shots_conceded: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_match_passing_ratio: Option<f64>,
}

impl RawMatchRow {
    fn into_match_row(self) -> Option<MatchRow> {
        let team_name = self.team_name.trim().to_string();
        if team_name.is_empty() {
            return None;
        }
        let is_home = self.home_team.trim() == team_name;
        Some(MatchRow {
            match_id: self.match_id.trim().to_string(),
            opposition_name: self.opposition_name.trim().to_string(),
            competition_name: self.competition_name.trim().to_string(),
            match_date: self.match_date.trim().to_string(),
            kick_off: self.kick_off.trim().to_string(),
            is_home,
            team_name,
            weather: WeatherObservation {
                rainfall: finite(self.total_rainfall_amount_previous_hour),
                wind_speed: finite(self.wind_speed_10m),
                wind_gust: finite(self.wind_gust_10m),
                feels_like_temperature: finite(self.feels_like_temperature),
            },
            performance: PerformanceStats {
                directness: finite(self.team_match_directness),
                pace_towards_goal: finite(self.team_match_pace_towards_goal),
                gk_pass_distance: finite(self.team_match_gk_pass_distance),
                gk_long_pass_ratio: finite(self.team_match_gk_long_pass_ratio),
                ball_in_play_time: finite(self.team_match_ball_in_play_time),
                dribble_ratio: finite(self.team_match_dribble_ratio),
                high_press_shots_conceded: finite(self.team_match_high_press_shots_conceded),
                passing_ratio: finite(self.team_match_passing_ratio),
            },
        })
    }
}

// `nan`/`inf` parse as f64 but are treated as missing, same as an empty cell.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Reads the wide match table. Records that fail to deserialize (or have no team) are
/// counted in `skipped` rather than failing the whole load. An unreadable header, or one
/// without `team_name` (which is also what a wrong delimiter looks like), fails the load.
pub fn load_matches_from_reader<R: Read>(rdr: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(rdr);
    let headers = reader.headers().map_err(|source| AnalysisError::Csv {
        path: "<reader>".into(),
        source,
    })?;
    if !headers.iter().any(|h| h == REQUIRED_MATCH_COLUMN) {
        return Err(AnalysisError::MissingColumn(REQUIRED_MATCH_COLUMN.to_string()));
    }

    let mut dataset = Dataset::default();
    for (idx, record) in reader.deserialize::<RawMatchRow>().enumerate() {
        match record {
            Ok(raw) => match raw.into_match_row() {
                Some(row) => dataset.rows.push(row),
                None => {
                    dataset.skipped += 1;
                    tracing::warn!(line = idx + 2, "skipping row without team_name");
                }
            },
            Err(err) => {
                dataset.skipped += 1;
                tracing::warn!(line = idx + 2, error = %err, "skipping malformed row");
            }
        }
    }
    Ok(dataset)
}

#[derive(Debug, Deserialize)]
struct RawSummaryRow {
    team_name: String,
    weather_metric: String,
    match_metric: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    average_weather_metric: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    average_match_metric: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_average_weather_metric: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    team_average_match_metric: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    correlation: Option<f64>,
}

/// Precomputed long-format summary table: one row per (team, weather metric, match metric).
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    pub rows: Vec<TeamSummary>,
}

impl SummaryTable {
    pub fn load_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file).map_err(|err| match err {
            AnalysisError::Csv { source, .. } => AnalysisError::Csv {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::info!(path = %path.display(), rows = table.rows.len(), "loaded summary table");
        Ok(table)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
        let mut rows = Vec::new();
        for record in reader.deserialize::<RawSummaryRow>() {
            let raw = record.map_err(|source| AnalysisError::Csv {
                path: "<reader>".into(),
                source,
            })?;
            rows.push(TeamSummary {
                weather_metric: raw.weather_metric.parse()?,
                match_metric: raw.match_metric.parse()?,
                team_name: raw.team_name,
                average_weather_metric: finite(raw.average_weather_metric),
                average_match_metric: finite(raw.average_match_metric),
                team_average_weather_metric: finite(raw.team_average_weather_metric),
                team_average_match_metric: finite(raw.team_average_match_metric),
                correlation: finite(raw.correlation),
            });
        }
        Ok(Self { rows })
    }

    /// Rows for one metric pair, sorted by team name.
    pub fn select(&self, weather: WeatherMetric, performance: PerformanceMetric) -> Vec<TeamSummary> {
        let mut out: Vec<TeamSummary> = self
            .rows
            .iter()
            .filter(|r| r.weather_metric == weather && r.match_metric == performance)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.team_name.cmp(&b.team_name));
        out
    }
}

pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d.%m.%Y"];

    let cleaned = raw.trim();
    // Timestamps like `2023-08-11T20:00:00` or `2023-08-11 20:00` keep only the date part.
    let date_part = cleaned
        .split(['T', ' '])
        .next()
        .unwrap_or(cleaned);
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(date);
        }
    }
    None
}
