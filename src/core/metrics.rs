// src/core/metrics.rs

use crate::core::error::{ReportError, Result};
use crate::core::models::{Buyer, BuyerMetrics, WeeklyColumn, WeeklyMetrics, WeeklyTable};
use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use log::debug;

/// Target and previous week for a report produced on `today`.
///
/// The target is the last fully elapsed ISO week. In ISO week 1 this yields 0 and -1,
/// which no row carries.
pub fn report_weeks(today: NaiveDate) -> (i32, i32) {
    let current_week = today.iso_week().week() as i32;
    let target_week = current_week - 1;
    (target_week, target_week - 1)
}

fn delta(current: Option<i16>, previous: Option<i16>) -> Option<i32> {
    Some(i32::from(current?) - i32::from(previous?))
}

/// Median of the non-null values; the mean of the middle pair for even counts.
pub fn median(values: impl IntoIterator<Item = Option<i16>>) -> Option<f64> {
    let sorted: Vec<i16> = values.into_iter().flatten().sorted_unstable().collect();
    let len = sorted.len();
    match len {
        0 => None,
        _ if len % 2 == 1 => Some(f64::from(sorted[len / 2])),
        _ => Some((f64::from(sorted[len / 2 - 1]) + f64::from(sorted[len / 2])) / 2.0),
    }
}

fn require_columns(table: &WeeklyTable, columns: &[WeeklyColumn]) -> Result<()> {
    match columns.iter().find(|column| !table.has_column(**column)) {
        Some(column) => Err(ReportError::MissingColumn(column.name().to_string())),
        None => Ok(()),
    }
}

/// Compares the last completed week with the one before it.
///
/// When a week number appears on several rows the first one wins.
pub fn compute_weekly_metrics(table: &WeeklyTable, today: NaiveDate) -> Result<WeeklyMetrics> {
    require_columns(
        table,
        &[
            WeeklyColumn::Week,
            WeeklyColumn::Safonov,
            WeeklyColumn::Grushin,
            WeeklyColumn::Katishev,
            WeeklyColumn::TotalForWeek,
        ],
    )?;

    let (target_week, prev_week) = report_weeks(today);
    debug!("Computing metrics for week {} against week {}", target_week, prev_week);

    let (target, previous) = match (table.find_week(target_week), table.find_week(prev_week)) {
        (Some(target), Some(previous)) => (target, previous),
        _ => return Err(ReportError::MissingWeekData { target_week, prev_week }),
    };

    let buyers = Buyer::ALL
        .iter()
        .map(|&buyer| BuyerMetrics {
            buyer,
            current: target.volume(buyer),
            delta: delta(target.volume(buyer), previous.volume(buyer)),
        })
        .collect();

    let ttl_trg_w = target.total_for_week;
    let ttl_pr_w = previous.total_for_week;
    let total_median = median(table.records().iter().map(|r| r.total_for_week));

    Ok(WeeklyMetrics {
        target_week,
        prev_week,
        current_date: target.date,
        current_delta_date: target.delta_date.clone(),
        buyers,
        ttl_trg_w,
        ttl_pr_w,
        total_delta_prev: delta(ttl_trg_w, ttl_pr_w),
        total_delta_median: ttl_trg_w.zip(total_median).map(|(t, m)| f64::from(t) - m),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::WeeklyRecord;

    fn record(week: i16, volumes: [Option<i16>; 3], total: Option<i16>, label: &str) -> WeeklyRecord {
        WeeklyRecord {
            delta_date: label.to_string(),
            iso_week: Some(week),
            safonov: volumes[0],
            grushin: volumes[1],
            katishev: volumes[2],
            total_for_week: total,
            date: crate::core::preparation::parse_label_date(label),
        }
    }

    fn table() -> WeeklyTable {
        WeeklyTable::new(
            vec![
                record(39, [Some(5), Some(5), Some(5)], Some(15), "пн. 22.09.25"),
                record(40, [Some(10), Some(20), Some(30)], Some(60), "пн. 29.09.25"),
                record(41, [Some(12), None, Some(25)], Some(70), "пн. 06.10.25"),
                record(41, [Some(99), Some(99), Some(99)], Some(99), "дубль"),
                record(42, [None, None, None], None, "пн. 13.10.25"),
            ],
            vec![],
        )
    }

    // Wednesday of ISO week 42, 2025.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 15).unwrap()
    }

    #[test]
    fn test_report_weeks() {
        assert_eq!(report_weeks(today()), (41, 40));
        assert_eq!(report_weeks(NaiveDate::from_ymd_opt(2025, 12, 30).unwrap()), (0, -1));
    }

    #[test]
    fn test_compute_weekly_metrics() {
        let metrics = compute_weekly_metrics(&table(), today()).unwrap();

        assert_eq!(metrics.target_week, 41);
        assert_eq!(metrics.prev_week, 40);
        assert_eq!(metrics.current_delta_date, "пн. 06.10.25");
        assert_eq!(metrics.display_date().as_deref(), Some("06.10.2025"));

        let safonov = metrics.buyer(Buyer::Safonov).unwrap();
        assert_eq!(safonov.current, Some(12));
        assert_eq!(safonov.delta, Some(2));
        let grushin = metrics.buyer(Buyer::Grushin).unwrap();
        assert_eq!(grushin.current, None);
        assert_eq!(grushin.delta, None);
        assert_eq!(metrics.buyer(Buyer::Katishev).unwrap().delta, Some(-5));

        assert_eq!(metrics.ttl_trg_w, Some(70));
        assert_eq!(metrics.ttl_pr_w, Some(60));
        assert_eq!(metrics.total_delta_prev, Some(10));
    }

    #[test]
    fn test_total_delta_prev_identity() {
        let metrics = compute_weekly_metrics(&table(), today()).unwrap();
        let (trg, pr) = (metrics.ttl_trg_w.unwrap(), metrics.ttl_pr_w.unwrap());
        assert_eq!(i32::from(trg) - i32::from(pr), metrics.total_delta_prev.unwrap());
    }

    #[test]
    fn test_total_delta_median() {
        // Totals 15, 60, 70, 99 (null excluded) -> median 65.
        let metrics = compute_weekly_metrics(&table(), today()).unwrap();
        assert_eq!(metrics.total_delta_median, Some(5.0));
    }

    #[test]
    fn test_missing_target_week_names_both_weeks() {
        let later = NaiveDate::from_ymd_opt(2025, 11, 5).unwrap();
        let err = compute_weekly_metrics(&table(), later).unwrap_err();
        let (target_week, prev_week) = report_weeks(later);
        assert!(matches!(err, ReportError::MissingWeekData { .. }));
        let text = err.to_string();
        assert!(text.contains(&target_week.to_string()));
        assert!(text.contains(&prev_week.to_string()));
    }

    #[test]
    fn test_missing_previous_week_fails() {
        // Target week 39 exists, week 38 does not.
        let early = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        assert!(matches!(
            compute_weekly_metrics(&table(), early),
            Err(ReportError::MissingWeekData { target_week: 39, prev_week: 38 })
        ));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let table = WeeklyTable::new(vec![], vec![WeeklyColumn::TotalForWeek]);
        let err = compute_weekly_metrics(&table, today()).unwrap_err();
        assert!(err.to_string().contains("total_for_week"));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(vec![Some(3), None, Some(1), Some(2)]), Some(2.0));
        assert_eq!(median(vec![Some(4), Some(1)]), Some(2.5));
        assert_eq!(median(vec![None]), None);
    }
}
