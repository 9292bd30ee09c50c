// src/core/reporting.rs

use crate::app_config::SheetConfig;
use crate::core::charts::{render_comparison_chart, render_weekly_chart, YearSeries};
use crate::core::error::{ReportError, Result};
use crate::core::metrics::compute_weekly_metrics;
use crate::core::models::{ComparisonReport, WeeklyReport, WeeklyTable, YearComparisonTable};
use crate::core::preparation::{prepare_comparison_table, prepare_weekly_table};
use crate::core::smoothing::double_smooth;
use crate::services::sheets::{Sheet, SheetSource};
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use std::sync::Arc;

/// Builds both reports from a fresh download on every call.
pub struct ReportAssembler {
    source: Arc<dyn SheetSource>,
    sheets: SheetConfig,
}

impl ReportAssembler {
    pub fn new(source: Arc<dyn SheetSource>, sheets: SheetConfig) -> Self {
        Self { source, sheets }
    }

    pub async fn load_weekly_table(&self) -> Result<WeeklyTable> {
        let csv_text = self.source.fetch_csv(Sheet::CurrentYear).await?;
        prepare_weekly_table(&csv_text, &self.sheets)
    }

    pub async fn load_comparison_table(&self) -> Result<YearComparisonTable> {
        let csv_text = self.source.fetch_csv(Sheet::YearComparison).await?;
        prepare_comparison_table(&csv_text, &self.sheets)
    }

    /// Last week's metrics and the year-to-date trend chart.
    pub async fn weekly_report(&self) -> Result<WeeklyReport> {
        self.weekly_report_on(Local::now().date_naive()).await
    }

    pub async fn weekly_report_on(&self, today: NaiveDate) -> Result<WeeklyReport> {
        let result = self.build_weekly_report(today).await;
        match &result {
            Ok(report) => info!(
                "Weekly report created for week {} ({} bytes chart)",
                report.metrics.target_week,
                report.chart_png.len()
            ),
            Err(e) => error!("Weekly report failed: {}", e),
        }
        result
    }

    async fn build_weekly_report(&self, today: NaiveDate) -> Result<WeeklyReport> {
        let table = self.load_weekly_table().await?;
        let metrics = compute_weekly_metrics(&table, today).map_err(|e| e.in_stage("metrics"))?;
        let chart_png = render_weekly_chart(&table, metrics.prev_week).map_err(|e| e.in_stage("chart"))?;
        Ok(WeeklyReport { chart_png, metrics })
    }

    /// Smoothed multi-year comparison chart.
    pub async fn comparison_report(&self) -> Result<ComparisonReport> {
        let result = self.build_comparison_report().await;
        match &result {
            Ok(report) => info!("Comparison report created for years {:?}", report.years),
            Err(e) => error!("Comparison report failed: {}", e),
        }
        result
    }

    async fn build_comparison_report(&self) -> Result<ComparisonReport> {
        let table = self.load_comparison_table().await?;
        let series = smooth_comparison(&table)?;
        let chart_png = render_comparison_chart(&series)?;
        Ok(ComparisonReport {
            chart_png,
            years: series.iter().map(|s| s.year).collect(),
            omitted_years: table.missing_years().to_vec(),
        })
    }
}

/// Double-smoothed (week, volume) lines for every year present in the table, oldest first.
pub fn smooth_comparison(table: &YearComparisonTable) -> Result<Vec<YearSeries>> {
    if table.week_column_missing() {
        return Err(ReportError::MissingColumn("week".to_string()));
    }
    for year in table.missing_years() {
        warn!("Year {} is missing from the comparison sheet and is left out", year);
    }
    if table.years().is_empty() {
        let missing = table.missing_years().iter().map(|y| y.to_string()).collect::<Vec<_>>();
        return Err(ReportError::MissingColumn(missing.join(", ")));
    }

    let weeks = table.weeks();
    Ok(table
        .years()
        .iter()
        .filter_map(|&year| table.series(year).map(|values| (year, values)))
        .map(|(year, values)| YearSeries {
            year,
            points: weeks
                .iter()
                .zip(double_smooth(&values))
                .filter_map(|(week, value)| Some((f64::from((*week)?), value?)))
                .collect(),
        })
        .collect())
}
