//! Fixed catalogue of selectable weather and performance columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherMetric {
    #[serde(rename = "total_rainfall_amount_previous_hour")]
    Rainfall,
    #[serde(rename = "wind_speed_10m")]
    WindSpeed,
    #[serde(rename = "wind_gust_10m")]
    WindGust,
    #[serde(rename = "feels_like_temperature")]
    FeelsLikeTemperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceMetric {
    #[serde(rename = "team_match_directness")]
    Directness,
    #[serde(rename = "team_match_pace_towards_goal")]
    PaceTowardsGoal,
    #[serde(rename = "team_match_gk_pass_distance")]
    GkPassDistance,
    #[serde(rename = "team_match_gk_long_pass_ratio")]
    GkLongPassRatio,
    #[serde(rename = "team_match_ball_in_play_time")]
    BallInPlayTime,
    #[serde(rename = "team_match_dribble_ratio")]
    DribbleRatio,
    #[serde(rename = "team_match_high_press_shots_conceded")]
    HighPressShotsConceded,
    #[serde(rename = "team_match_passing_ratio")]
    PassingRatio,
}

/// Either kind of selectable column, for code that correlates arbitrary pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Weather(WeatherMetric),
    Performance(PerformanceMetric),
}

impl WeatherMetric {
    pub const ALL: [WeatherMetric; 4] = [
        WeatherMetric::Rainfall,
        WeatherMetric::WindSpeed,
        WeatherMetric::WindGust,
        WeatherMetric::FeelsLikeTemperature,
    ];

    pub fn column(self) -> &'static str {
        match self {
            WeatherMetric::Rainfall => "total_rainfall_amount_previous_hour",
            WeatherMetric::WindSpeed => "wind_speed_10m",
            WeatherMetric::WindGust => "wind_gust_10m",
            WeatherMetric::FeelsLikeTemperature => "feels_like_temperature",
        }
    }

    pub fn caption(self) -> String {
        caption(self.column())
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl PerformanceMetric {
    pub const ALL: [PerformanceMetric; 8] = [
        PerformanceMetric::Directness,
        PerformanceMetric::PaceTowardsGoal,
        PerformanceMetric::GkPassDistance,
        PerformanceMetric::GkLongPassRatio,
        PerformanceMetric::BallInPlayTime,
        PerformanceMetric::DribbleRatio,
        PerformanceMetric::HighPressShotsConceded,
        PerformanceMetric::PassingRatio,
    ];

    pub fn column(self) -> &'static str {
        match self {
            PerformanceMetric::Directness => "team_match_directness",
            PerformanceMetric::PaceTowardsGoal => "team_match_pace_towards_goal",
            PerformanceMetric::GkPassDistance => "team_match_gk_pass_distance",
            PerformanceMetric::GkLongPassRatio => "team_match_gk_long_pass_ratio",
            PerformanceMetric::BallInPlayTime => "team_match_ball_in_play_time",
            PerformanceMetric::DribbleRatio => "team_match_dribble_ratio",
            PerformanceMetric::HighPressShotsConceded => "team_match_high_press_shots_conceded",
            PerformanceMetric::PassingRatio => "team_match_passing_ratio",
        }
    }

    pub fn caption(self) -> String {
        caption(self.column())
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::ALL, self, Self::ALL.len() - 1)
    }
}

impl Metric {
    pub fn column(self) -> &'static str {
        match self {
            Metric::Weather(m) => m.column(),
            Metric::Performance(m) => m.column(),
        }
    }
}

impl FromStr for WeatherMetric {
    type Err = AnalysisError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.column() == key)
            .ok_or_else(|| AnalysisError::unrecognized(key))
    }
}

impl FromStr for PerformanceMetric {
    type Err = AnalysisError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.column() == key)
            .ok_or_else(|| AnalysisError::unrecognized(key))
    }
}

impl FromStr for Metric {
    type Err = AnalysisError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Ok(m) = raw.parse::<WeatherMetric>() {
            return Ok(Metric::Weather(m));
        }
        raw.parse::<PerformanceMetric>().map(Metric::Performance)
    }
}

impl fmt::Display for WeatherMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl fmt::Display for PerformanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// `wind_speed_10m` -> `Wind Speed 10M`: a letter is upper-cased when it does not follow
/// another letter, everything else is lower-cased.
pub fn caption(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut prev_alpha = false;
    for ch in column.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let idx = all.iter().position(|m| *m == current).unwrap_or(0);
    all[(idx + step) % all.len()]
}
