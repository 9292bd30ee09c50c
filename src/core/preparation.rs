// src/core/preparation.rs

//! Turns raw CSV exports into typed tables.
//!
//! Cells that cannot be coerced become `None`; a bad cell never fails the load.
//! Columns that the export does not contain at all are logged and recorded on the
//! resulting table so that later stages can report them by name.

use crate::app_config::SheetConfig;
use crate::core::error::Result;
use crate::core::models::{
    WeeklyColumn, WeeklyRecord, WeeklyTable, YearComparisonRecord, YearComparisonTable,
};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Rows directly under the header that hold sub-headings rather than data.
const WEEKLY_HEADER_REMNANT_ROWS: usize = 1;
const COMPARISON_HEADER_REMNANT_ROWS: usize = 2;

const LABEL_DATE_LEN: usize = 8;
const LABEL_DATE_FORMAT: &str = "%d.%m.%y";

/// Reads at most `row_cap` data rows and returns them with the header width.
fn read_rows(csv_text: &str, row_cap: usize) -> Result<(usize, Vec<StringRecord>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let width = rdr.headers()?.len();
    let rows = rdr
        .records()
        .take(row_cap)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!("Read {} rows ({} columns) from CSV export", rows.len(), width);
    Ok((width, rows))
}

fn cell(row: &StringRecord, position: Option<usize>) -> Option<&str> {
    position.and_then(|p| row.get(p))
}

/// Parses a whole-number cell. Integral floats ("12.0") are accepted, anything else is `None`.
pub fn parse_int_cell(raw: Option<&str>) -> Option<i16> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(value) = text.parse::<i64>() {
        return i16::try_from(value).ok();
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => to_i16(value),
        _ => None,
    }
}

/// Parses a cell that may use a decimal comma, rounding half away from zero.
///
/// `"12,5"` gives 13 and `"12,4"` gives 12.
pub fn parse_decimal_comma_cell(raw: Option<&str>) -> Option<i16> {
    let normalized = raw?.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => to_i16(value.round()),
        _ => None,
    }
}

fn to_i16(value: f64) -> Option<i16> {
    if value >= f64::from(i16::MIN) && value <= f64::from(i16::MAX) {
        Some(value as i16)
    } else {
        None
    }
}

/// Derives the calendar date from a label such as `"вт. 14.10.25"`.
///
/// Only the trailing eight characters are looked at, read as `dd.mm.yy`.
pub fn parse_label_date(label: &str) -> Option<NaiveDate> {
    let label = label.trim_end();
    let char_count = label.chars().count();
    let tail: String = label
        .chars()
        .skip(char_count.saturating_sub(LABEL_DATE_LEN))
        .collect();
    NaiveDate::parse_from_str(&tail, LABEL_DATE_FORMAT).ok()
}

/// Builds the current-year table from the default sheet export.
pub fn prepare_weekly_table(csv_text: &str, sheets: &SheetConfig) -> Result<WeeklyTable> {
    let (width, rows) = read_rows(csv_text, sheets.row_cap)?;

    let mut positions = BTreeMap::new();
    let mut missing_columns = Vec::new();
    for (column, &position) in WeeklyColumn::ALL.iter().zip(&sheets.current_year_columns) {
        if position < width {
            positions.insert(*column, position);
        } else {
            warn!("Column '{}' (position {}) not found in the current-year sheet", column, position);
            missing_columns.push(*column);
        }
    }
    let at = |column: WeeklyColumn| positions.get(&column).copied();

    let records = rows
        .iter()
        .skip(WEEKLY_HEADER_REMNANT_ROWS)
        .map(|row| {
            let delta_date = cell(row, at(WeeklyColumn::DeltaDate)).unwrap_or_default().to_string();
            WeeklyRecord {
                date: parse_label_date(&delta_date),
                iso_week: parse_int_cell(cell(row, at(WeeklyColumn::Week))),
                safonov: parse_int_cell(cell(row, at(WeeklyColumn::Safonov))),
                grushin: parse_int_cell(cell(row, at(WeeklyColumn::Grushin))),
                katishev: parse_int_cell(cell(row, at(WeeklyColumn::Katishev))),
                total_for_week: parse_int_cell(cell(row, at(WeeklyColumn::TotalForWeek))),
                delta_date,
            }
        })
        .collect::<Vec<_>>();

    let undated = records.iter().filter(|r| r.date.is_none()).count();
    if undated > 0 {
        debug!("{} current-year rows have no parseable date", undated);
    }

    Ok(WeeklyTable::new(records, missing_columns))
}

/// Builds the multi-year table from the comparison sheet export.
///
/// Year columns are remapped from sheet order to oldest-first.
pub fn prepare_comparison_table(csv_text: &str, sheets: &SheetConfig) -> Result<YearComparisonTable> {
    let (width, rows) = read_rows(csv_text, sheets.row_cap)?;

    let week_position = sheets.comparison_columns.first().copied().filter(|p| *p < width);
    if week_position.is_none() {
        warn!("Column 'week' not found in the comparison sheet");
    }

    let mut year_positions = BTreeMap::new();
    let mut missing_years = Vec::new();
    for (&year, &position) in sheets.comparison_years.iter().zip(sheets.comparison_columns.iter().skip(1)) {
        if position < width {
            year_positions.insert(year, position);
        } else {
            warn!("Column '{}' (position {}) not found in the comparison sheet", year, position);
            missing_years.push(year);
        }
    }
    missing_years.sort_unstable();

    let records = rows
        .iter()
        .skip(COMPARISON_HEADER_REMNANT_ROWS)
        .map(|row| YearComparisonRecord {
            iso_week: parse_int_cell(cell(row, week_position)),
            values: year_positions
                .iter()
                .map(|(&year, &position)| (year, parse_decimal_comma_cell(row.get(position))))
                .collect(),
        })
        .collect();

    let years = year_positions.keys().copied().collect();
    Ok(YearComparisonTable::new(years, missing_years, week_position.is_none(), records))
}
