use crate::core::error::ReportError;
use crate::core::models::{Buyer, ComparisonReport, WeeklyMetrics};
use std::fmt::Display;

/// The two reports a user can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Week,
    Compare,
}

impl ReportKind {
    pub fn callback_data(&self) -> &'static str {
        match self {
            ReportKind::Week => "report_week",
            ReportKind::Compare => "compare_year_report",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        match data {
            "report_week" => Some(ReportKind::Week),
            "compare_year_report" => Some(ReportKind::Compare),
            _ => None,
        }
    }

    pub fn button_text(&self) -> &'static str {
        match self {
            ReportKind::Week => "📈 Отчет за прошлую неделю",
            ReportKind::Compare => "📊 Сравнение заготовки (2022-2025)",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::Week => "weekly_report.png",
            ReportKind::Compare => "compare_year_report.png",
        }
    }
}

fn or_missing<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "н/д".to_string())
}

fn signed<T: Display + PartialOrd + Default>(value: Option<T>) -> String {
    match value {
        Some(v) if v > T::default() => format!("+{}", v),
        other => or_missing(other),
    }
}

pub fn greeting(full_name: &str) -> String {
    format!(
        "Привет, {}!\nЯ — бот для отправки отчетов о заготовке зерна.\nКакой отчет нужен?",
        full_name
    )
}

pub fn weekly_caption(metrics: &WeeklyMetrics) -> String {
    let mut caption = format!("📈 Отчет за прошлую неделю: {}\n", metrics.current_delta_date);
    caption.push_str(&format!(
        "Неделя {}, дата: {}\n",
        metrics.target_week,
        or_missing(metrics.display_date())
    ));
    caption.push_str(&format!(
        "\nВсего за прошлую неделю купили: {} тонн.\n",
        or_missing(metrics.ttl_trg_w)
    ));
    caption.push_str("Из них:\n");
    for buyer in Buyer::ALL {
        let (current, delta) = metrics
            .buyer(buyer)
            .map(|m| (m.current, m.delta))
            .unwrap_or((None, None));
        caption.push_str(&format!(
            "- {}: {} ({})\n",
            buyer.display_name(),
            or_missing(current),
            signed(delta)
        ));
    }
    caption.push_str(&format!(
        "\nК неделе {}: {} тонн.\n",
        metrics.prev_week,
        signed(metrics.total_delta_prev)
    ));
    caption.push_str(&format!(
        "К медиане за год: {} тонн.\n",
        signed(metrics.total_delta_median.map(|d| d.round() as i64))
    ));
    caption
}

pub fn comparison_caption(report: &ComparisonReport) -> String {
    let mut caption = String::from(
        "ℹ️ График сглажен.\nЧто это значит? - сглажены колебания.\nЗачем? - так легче сравнивать.\n",
    );
    if !report.omitted_years.is_empty() {
        let years: Vec<String> = report.omitted_years.iter().map(|y| y.to_string()).collect();
        caption.push_str(&format!("\nНет данных за: {}.\n", years.join(", ")));
    }
    caption
}

pub fn error_message(error: &ReportError) -> String {
    format!("❌ Ошибка: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::BuyerMetrics;
    use chrono::NaiveDate;

    fn metrics() -> WeeklyMetrics {
        WeeklyMetrics {
            target_week: 41,
            prev_week: 40,
            current_date: NaiveDate::from_ymd_opt(2025, 10, 6),
            current_delta_date: "пн. 06.10.25".to_string(),
            buyers: vec![
                BuyerMetrics { buyer: Buyer::Safonov, current: Some(12), delta: Some(2) },
                BuyerMetrics { buyer: Buyer::Grushin, current: None, delta: None },
                BuyerMetrics { buyer: Buyer::Katishev, current: Some(25), delta: Some(-5) },
            ],
            ttl_trg_w: Some(70),
            ttl_pr_w: Some(60),
            total_delta_prev: Some(10),
            total_delta_median: Some(-4.6),
        }
    }

    #[test]
    fn test_callback_data_round_trip() {
        for kind in [ReportKind::Week, ReportKind::Compare] {
            assert_eq!(ReportKind::from_callback_data(kind.callback_data()), Some(kind));
        }
        assert_eq!(ReportKind::from_callback_data("unknown"), None);
    }

    #[test]
    fn test_weekly_caption() {
        let caption = weekly_caption(&metrics());
        assert!(caption.starts_with("📈 Отчет за прошлую неделю: пн. 06.10.25\n"));
        assert!(caption.contains("Неделя 41, дата: 06.10.2025\n"));
        assert!(caption.contains("Всего за прошлую неделю купили: 70 тонн."));
        assert!(caption.contains("- Сафонов: 12 (+2)"));
        assert!(caption.contains("- Грушин: н/д (н/д)"));
        assert!(caption.contains("- Катышев: 25 (-5)"));
        assert!(caption.contains("К неделе 40: +10 тонн."));
        assert!(caption.contains("К медиане за год: -5 тонн."));
    }

    #[test]
    fn test_weekly_caption_without_date() {
        let metrics = WeeklyMetrics { current_date: None, ..metrics() };
        assert!(weekly_caption(&metrics).contains("Неделя 41, дата: н/д\n"));
    }

    #[test]
    fn test_comparison_caption_lists_omitted_years() {
        let report = ComparisonReport {
            chart_png: vec![],
            years: vec![2023, 2024, 2025],
            omitted_years: vec![2022],
        };
        let caption = comparison_caption(&report);
        assert!(caption.starts_with("ℹ️ График сглажен."));
        assert!(caption.contains("Нет данных за: 2022."));
    }

    #[test]
    fn test_error_message() {
        let e = ReportError::Fetch("HTTP 500".to_string());
        assert_eq!(error_message(&e), "❌ Ошибка: не удалось загрузить таблицу: HTTP 500");
    }

    #[test]
    fn test_greeting() {
        assert!(greeting("Иван Петров").starts_with("Привет, Иван Петров!"));
    }
}
