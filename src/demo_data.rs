//! Synthetic match table for running the dashboard without the licensed upstream CSV.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{Dataset, MatchRow, PerformanceStats, WeatherObservation};

const DEMO_TEAMS: &[&str] = &[
    "Blackpool",
    "Bolton Wanderers",
    "Burnley",
    "Cardiff City",
    "Hull City",
    "Plymouth Argyle",
    "Stoke City",
    "Sunderland",
];

const KICKOFFS: &[&str] = &["12:30:00.000", "15:00:00.000", "17:30:00.000", "19:45:00.000"];

pub fn demo_dataset(seed: u64) -> Dataset {
    Dataset::from_rows(demo_rows(seed, DEMO_TEAMS))
}

/// Double round robin between `teams`; each fixture yields a home row and an away row that
/// share the same weather observation.
pub fn demo_rows(seed: u64, teams: &[&str]) -> Vec<MatchRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2023, 8, 5).unwrap_or_default();
    let mut rows = Vec::new();
    let mut match_id = 3_869_000u64;
    let mut round = 0i64;

    for (hi, home) in teams.iter().enumerate() {
        for (ai, away) in teams.iter().enumerate() {
            if hi == ai {
                continue;
            }
            match_id += 1;
            round += 1;
            let date = start + Duration::days(round * 3);
            let kick_off = KICKOFFS[rng.gen_range(0..KICKOFFS.len())];
            let weather = random_weather(&mut rng, date);

            for (team, opposition, is_home) in [(home, away, true), (away, home, false)] {
                rows.push(MatchRow {
                    match_id: match_id.to_string(),
                    team_name: team.to_string(),
                    opposition_name: opposition.to_string(),
                    competition_name: "Championship".to_string(),
                    match_date: date.format("%Y-%m-%d").to_string(),
                    kick_off: kick_off.to_string(),
                    is_home,
                    weather,
                    performance: random_performance(&mut rng, &weather, is_home),
                });
            }
        }
    }
    rows
}

fn random_weather(rng: &mut StdRng, date: NaiveDate) -> WeatherObservation {
    // Rough seasonal curve: colder mid-winter.
    let days_in = (date - NaiveDate::from_ymd_opt(2023, 8, 1).unwrap_or(date)).num_days() as f64;
    let season_temp = 16.0 - 12.0 * (days_in / 300.0 * std::f64::consts::PI).sin();

    let raining = rng.gen_bool(0.35);
    let rainfall = if !raining {
        0.0
    } else if rng.gen_bool(0.05) {
        // Occasional downpour, the kind of reading the upper limit exists for.
        rng.gen_range(15.0..40.0)
    } else {
        rng.gen_range(0.1..4.0)
    };
    let wind_speed: f64 = rng.gen_range(1.0..14.0);
    let wind_gust = wind_speed + rng.gen_range(2.0..12.0);
    let feels_like = season_temp + rng.gen_range(-4.0..4.0) - wind_speed * 0.3;

    WeatherObservation {
        rainfall: Some(round1(rainfall)),
        wind_speed: Some(round1(wind_speed)),
        wind_gust: if rng.gen_bool(0.02) { None } else { Some(round1(wind_gust)) },
        feels_like_temperature: Some(round1(feels_like)),
    }
}

fn random_performance(rng: &mut StdRng, weather: &WeatherObservation, is_home: bool) -> PerformanceStats {
    let wind = weather.wind_speed.unwrap_or(0.0);
    let rain = weather.rainfall.unwrap_or(0.0).min(10.0);
    let home_edge = if is_home { 0.03 } else { 0.0 };

    let passing_ratio = (0.78 - wind * 0.006 - rain * 0.004 + home_edge + rng.gen_range(-0.06..0.06))
        .clamp(0.5, 0.95);
    let directness = (0.38 + wind * 0.008 + rng.gen_range(-0.08..0.08)).clamp(0.1, 0.9);

    PerformanceStats {
        directness: Some(directness),
        pace_towards_goal: Some(rng.gen_range(1.2..2.6) + wind * 0.02),
        gk_pass_distance: Some(rng.gen_range(25.0..50.0) + wind * 0.4),
        gk_long_pass_ratio: Some((rng.gen_range(0.15..0.7) + wind * 0.01).min(1.0)),
        ball_in_play_time: Some(rng.gen_range(50.0..62.0) - rain * 0.3),
        dribble_ratio: Some(rng.gen_range(0.4..0.8) - rain * 0.01),
        high_press_shots_conceded: Some(rng.gen_range(0..5) as f64),
        passing_ratio: Some(passing_ratio),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rows() {
        assert_eq!(demo_rows(7, DEMO_TEAMS), demo_rows(7, DEMO_TEAMS));
    }

    #[test]
    fn every_fixture_has_both_sides() {
        let rows = demo_rows(1, &["A", "B", "C"]);
        // 3 teams -> 6 fixtures -> 12 rows
        assert_eq!(rows.len(), 12);
        assert_eq!(rows.iter().filter(|r| r.is_home).count(), 6);
        for pair in rows.chunks(2) {
            assert_eq!(pair[0].match_id, pair[1].match_id);
            assert_eq!(pair[0].weather, pair[1].weather);
            assert_eq!(pair[0].team_name, pair[1].opposition_name);
        }
    }

    #[test]
    fn demo_dataset_covers_all_teams() {
        let dataset = demo_dataset(42);
        assert_eq!(dataset.team_names().len(), DEMO_TEAMS.len());
        assert!(dataset.rows.iter().all(|r| r.date().is_some()));
    }
}
