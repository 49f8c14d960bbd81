use std::path::PathBuf;

use crate::dataset::DEFAULT_DATA_PATH;
use crate::projection::DEFAULT_SEASON_LABEL;

/// Runtime settings, read from the environment (after `.env.local` / `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub summary_path: Option<PathBuf>,
    pub season_label: String,
    pub default_upper_limit: f64,
    pub demo: bool,
    pub log_path: Option<PathBuf>,
    pub password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            summary_path: None,
            season_label: DEFAULT_SEASON_LABEL.to_string(),
            default_upper_limit: 10.0,
            demo: false,
            log_path: None,
            password: None,
        }
    }
}

impl AppConfig {
    pub fn load_dotenv() {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            data_path: non_empty("WXFOOT_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            summary_path: non_empty("WXFOOT_SUMMARY").map(PathBuf::from),
            season_label: non_empty("WXFOOT_SEASON_LABEL").unwrap_or(defaults.season_label),
            default_upper_limit: non_empty("WXFOOT_UPPER_LIMIT")
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .map(|v| v.max(0.0))
                .unwrap_or(defaults.default_upper_limit),
            demo: non_empty("WXFOOT_DEMO")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_path: non_empty("WXFOOT_LOG").map(PathBuf::from),
            password: lookup("DASHBOARD_PASSWORD").filter(|v| !v.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.data_path, PathBuf::from("data/combined_match_stats_with_weather.csv"));
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("WXFOOT_DATA", " /tmp/rows.csv "),
            ("WXFOOT_UPPER_LIMIT", "not-a-number"),
            ("WXFOOT_DEMO", "Yes"),
            ("WXFOOT_SEASON_LABEL", "24/25 Season"),
            ("DASHBOARD_PASSWORD", ""),
        ]));
        assert_eq!(cfg.data_path, PathBuf::from("/tmp/rows.csv"));
        assert_eq!(cfg.default_upper_limit, 10.0);
        assert!(cfg.demo);
        assert_eq!(cfg.season_label, "24/25 Season");
        assert_eq!(cfg.password, None);
    }

    #[test]
    fn negative_limit_is_floored_at_zero() {
        let cfg = AppConfig::from_lookup(lookup(&[("WXFOOT_UPPER_LIMIT", "-4")]));
        assert_eq!(cfg.default_upper_limit, 0.0);
    }
}
