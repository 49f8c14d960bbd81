//! Upper-bound clipping of a weather column, used to stop a handful of extreme readings
//! from dominating the averages.

use serde::{Deserialize, Serialize};

use crate::dataset::MatchRow;
use crate::error::{AnalysisError, Result};
use crate::metrics::WeatherMetric;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpperLimit {
    pub enabled: bool,
    pub value: f64,
}

impl Default for UpperLimit {
    fn default() -> Self {
        Self {
            enabled: false,
            value: 10.0,
        }
    }
}

impl UpperLimit {
    pub fn enabled(value: f64) -> Self {
        Self {
            enabled: true,
            value,
        }
    }

    /// The bound to apply, or `None` when clipping is switched off.
    pub fn bound(&self) -> Result<Option<f64>> {
        if !self.enabled {
            return Ok(None);
        }
        if !self.value.is_finite() {
            return Err(AnalysisError::InvalidUpperLimit(self.value));
        }
        Ok(Some(self.value))
    }
}

pub fn clip_value(value: f64, upper: f64) -> f64 {
    if value > upper { upper } else { value }
}

pub fn clip_values(values: &[f64], upper: Option<f64>) -> Vec<f64> {
    match upper {
        Some(upper) => values.iter().map(|v| clip_value(*v, upper)).collect(),
        None => values.to_vec(),
    }
}

/// Copies `rows`, capping `metric` at the limit. Missing cells stay missing and every other
/// column is untouched.
pub fn clip_rows(rows: &[MatchRow], metric: WeatherMetric, limit: UpperLimit) -> Result<Vec<MatchRow>> {
    let Some(upper) = limit.bound()? else {
        return Ok(rows.to_vec());
    };
    let mut clipped = 0usize;
    let out = rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            if let Some(v) = row.weather_value(metric) {
                if v > upper {
                    clipped += 1;
                }
                row.weather.set(metric, Some(clip_value(v, upper)));
            }
            row
        })
        .collect();
    tracing::debug!(metric = metric.column(), upper, clipped, "clipped weather column");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{PerformanceStats, WeatherObservation};

    fn row(team: &str, wind: Option<f64>) -> MatchRow {
        MatchRow {
            match_id: "1".to_string(),
            team_name: team.to_string(),
            opposition_name: String::new(),
            competition_name: String::new(),
            match_date: String::new(),
            kick_off: String::new(),
            is_home: true,
            weather: WeatherObservation {
                wind_speed: wind,
                rainfall: Some(50.0),
                ..Default::default()
            },
            performance: PerformanceStats::default(),
        }
    }

    #[test]
    fn clips_values_above_bound() {
        assert_eq!(clip_values(&[1.0, 5.0, 12.0, 3.0], Some(10.0)), vec![1.0, 5.0, 10.0, 3.0]);
    }

    #[test]
    fn bound_itself_is_unchanged() {
        assert_eq!(clip_values(&[10.0, 9.99], Some(10.0)), vec![10.0, 9.99]);
    }

    #[test]
    fn disabled_is_identity() {
        let values = [1.0, 500.0, -3.0];
        assert_eq!(clip_values(&values, None), values.to_vec());
        let limit = UpperLimit { enabled: false, value: 1.0 };
        assert_eq!(limit.bound().unwrap(), None);
    }

    #[test]
    fn non_finite_bound_is_rejected() {
        let err = UpperLimit::enabled(f64::NAN).bound().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidUpperLimit(_)));
    }

    #[test]
    fn clip_rows_touches_only_selected_column() {
        let rows = vec![row("A", Some(25.0)), row("B", None), row("C", Some(2.0))];
        let out = clip_rows(&rows, WeatherMetric::WindSpeed, UpperLimit::enabled(10.0)).unwrap();
        assert_eq!(out[0].weather.wind_speed, Some(10.0));
        assert_eq!(out[1].weather.wind_speed, None);
        assert_eq!(out[2].weather.wind_speed, Some(2.0));
        assert!(out.iter().all(|r| r.weather.rainfall == Some(50.0)));
        // Source rows are left alone.
        assert_eq!(rows[0].weather.wind_speed, Some(25.0));
    }
}
