use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::Analysis;
use crate::dataset::MatchRow;
use crate::projection::{self, TextTable};

pub struct ExportReport {
    pub match_rows: usize,
    pub team_rows: usize,
}

/// Writes the raw match table and the team metrics/correlations for the current selection.
pub fn export_workbook(path: &Path, rows: &[MatchRow], analysis: &Analysis) -> Result<ExportReport> {
    let raw = projection::raw_match_table(rows);
    let teams = projection::summary_table(&analysis.summaries);
    let selection = selection_table(analysis);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("MatchData")?;
        write_table(sheet, &raw)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("TeamMetrics")?;
        write_table(sheet, &teams)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Selection")?;
        write_table(sheet, &selection)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    tracing::info!(path = %path.display(), rows = raw.rows.len(), teams = teams.rows.len(), "exported workbook");

    Ok(ExportReport {
        match_rows: raw.rows.len(),
        team_rows: teams.rows.len(),
    })
}

fn selection_table(analysis: &Analysis) -> TextTable {
    let sel = &analysis.selection;
    let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    let limit = if sel.upper_limit.enabled {
        sel.upper_limit.value.to_string()
    } else {
        String::new()
    };
    TextTable {
        headers: vec!["Setting".to_string(), "Value".to_string()],
        rows: vec![
            vec!["weather_metric".to_string(), sel.weather.column().to_string()],
            vec!["match_metric".to_string(), sel.performance.column().to_string()],
            vec!["upper_limit".to_string(), limit],
            vec!["rows".to_string(), analysis.rows.to_string()],
            vec!["average_weather_metric".to_string(), opt(analysis.average_weather_metric)],
            vec!["average_match_metric".to_string(), opt(analysis.average_match_metric)],
            vec!["season_pearson".to_string(), opt(analysis.season_pearson)],
        ],
    }
}

// Numeric-looking cells are written as numbers so the sheet can be charted directly.
fn write_table(worksheet: &mut Worksheet, table: &TextTable) -> Result<()> {
    for (col_idx, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, header)
            .with_context(|| format!("write header ({col_idx})"))?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        let sheet_row = row_idx as u32 + 1;
        for (col_idx, value) in row.iter().enumerate() {
            let written = match value.parse::<f64>() {
                Ok(num) if num.is_finite() => worksheet.write_number(sheet_row, col_idx as u16, num),
                _ => worksheet.write_string(sheet_row, col_idx as u16, value),
            };
            written.with_context(|| format!("write cell ({sheet_row},{col_idx})"))?;
        }
    }
    Ok(())
}
