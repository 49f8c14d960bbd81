use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use wxfoot_terminal::aggregate::{self, Selection, TeamSummary};
use wxfoot_terminal::clip::{self, UpperLimit};
use wxfoot_terminal::config::AppConfig;
use wxfoot_terminal::dataset::{Dataset, SummaryTable};
use wxfoot_terminal::demo_data;
use wxfoot_terminal::export;
use wxfoot_terminal::metrics::{PerformanceMetric, WeatherMetric};
use wxfoot_terminal::projection::{self, BarSort, CorrelationChart};

const DEMO_SEED: u64 = 2324;

#[derive(Serialize)]
struct Report<'a> {
    season_label: &'a str,
    source: String,
    rows: usize,
    average_weather_metric: Option<f64>,
    average_match_metric: Option<f64>,
    season_pearson: Option<f64>,
    summaries: &'a [TeamSummary],
    chart: &'a CorrelationChart,
}

fn main() -> Result<()> {
    AppConfig::load_dotenv();
    let config = AppConfig::from_env();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let weather = arg_value(&args, "weather")
        .unwrap_or_else(|| WeatherMetric::Rainfall.column().to_string())
        .parse::<WeatherMetric>()
        .context("invalid --weather")?;
    let performance = arg_value(&args, "metric")
        .unwrap_or_else(|| PerformanceMetric::Directness.column().to_string())
        .parse::<PerformanceMetric>()
        .context("invalid --metric")?;
    let upper_limit = match arg_value(&args, "limit") {
        Some(raw) => {
            let value = raw
                .parse::<f64>()
                .with_context(|| format!("invalid --limit value: {raw}"))?;
            UpperLimit::enabled(value)
        }
        None => UpperLimit {
            value: config.default_upper_limit,
            ..UpperLimit::default()
        },
    };
    let sort = match arg_value(&args, "sort").as_deref() {
        None | Some("team") => BarSort::TeamName,
        Some("correlation") => BarSort::Correlation,
        Some(other) => return Err(anyhow!("unknown --sort {other} (expected team|correlation)")),
    };
    let selection = Selection::new(weather, performance).with_upper_limit(upper_limit);
    let demo = config.demo || has_flag(&args, "--demo");
    let json = has_flag(&args, "--json");

    if let Some(summary_path) = arg_value(&args, "summary")
        .map(PathBuf::from)
        .or_else(|| config.summary_path.clone())
    {
        return print_precomputed(&summary_path, selection, sort, json);
    }

    let (dataset, source) = if demo {
        (demo_data::demo_dataset(DEMO_SEED), "demo feed".to_string())
    } else {
        let data_path = arg_value(&args, "data")
            .map(PathBuf::from)
            .unwrap_or_else(|| config.data_path.clone());
        let dataset = Dataset::load_csv(&data_path)
            .with_context(|| format!("loading match table {}", data_path.display()))?;
        (dataset, data_path.display().to_string())
    };

    let analysis = aggregate::analyze(&dataset.rows, selection).context("analysis failed")?;
    let chart = projection::correlation_chart(&analysis, &config.season_label, sort);

    if let Some(xlsx) = arg_value(&args, "xlsx") {
        let clipped = clip::clip_rows(&dataset.rows, weather, upper_limit)?;
        let path = PathBuf::from(xlsx);
        let report = export::export_workbook(&path, &clipped, &analysis)?;
        eprintln!(
            "wrote {} ({} match rows, {} teams)",
            path.display(),
            report.match_rows,
            report.team_rows
        );
    }

    if json {
        let report = Report {
            season_label: &config.season_label,
            source,
            rows: analysis.rows,
            average_weather_metric: analysis.average_weather_metric,
            average_match_metric: analysis.average_match_metric,
            season_pearson: analysis.season_pearson,
            summaries: &analysis.summaries,
            chart: &chart,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} | {}", chart.title.heading, chart.title.subtitle);
    println!("Source: {source}");
    println!("Rows: {} (skipped {})", analysis.rows, dataset.skipped);
    println!(
        "Season averages: weather={} match={}",
        fmt_opt(analysis.average_weather_metric),
        fmt_opt(analysis.average_match_metric)
    );
    println!("{}", chart.reference_label());
    println!();
    print_bars(&chart);
    Ok(())
}

fn print_precomputed(path: &Path, selection: Selection, sort: BarSort, json: bool) -> Result<()> {
    let table = SummaryTable::load_csv(path)
        .with_context(|| format!("loading summary table {}", path.display()))?;
    let mut rows = table.select(selection.weather, selection.performance);
    projection::sort_summaries(&mut rows, sort);
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!(
        "{} vs {} (precomputed, {} teams)",
        selection.performance.caption(),
        selection.weather.caption(),
        rows.len()
    );
    for row in &rows {
        println!(
            "{:<28} team avg weather={:>10} team avg match={:>10} r={:>7}",
            row.team_name,
            fmt_opt(row.team_average_weather_metric),
            fmt_opt(row.team_average_match_metric),
            projection::format_correlation(row.correlation)
        );
    }
    Ok(())
}

fn print_bars(chart: &CorrelationChart) {
    for bar in &chart.bars {
        println!(
            "{:<28} {:>7}",
            bar.team_name,
            projection::format_correlation(bar.correlation)
        );
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// `--name=value` or `--name value`; blank values count as absent.
fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("--{name}=");
    let bare = format!("--{name}");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == bare {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
