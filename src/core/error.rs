// src/core/error.rs

use thiserror::Error;

/// Everything that can go wrong while building a report.
///
/// Each variant is created where the failure happens and carried up with `?`;
/// the chat layer only ever sees the `Display` text.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("не удалось загрузить таблицу: {0}")]
    Fetch(String),

    #[error("некорректный CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("в таблице нет столбца '{0}'")]
    MissingColumn(String),

    #[error("Нет данных за целевую неделю ({target_week}) или предыдущую ({prev_week})")]
    MissingWeekData { target_week: i32, prev_week: i32 },

    #[error("{0}")]
    Render(String),

    #[error("{stage}: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<ReportError>,
    },
}

impl ReportError {
    pub fn in_stage(self, stage: &'static str) -> Self {
        ReportError::Stage { stage, source: Box::new(self) }
    }

    pub fn render(e: impl std::fmt::Display) -> Self {
        ReportError::Render(e.to_string())
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(e: reqwest::Error) -> Self {
        ReportError::Fetch(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_week_names_both_weeks() {
        let e = ReportError::MissingWeekData { target_week: 41, prev_week: 40 };
        let text = e.to_string();
        assert_eq!(text, "Нет данных за целевую неделю (41) или предыдущую (40)");
    }

    #[test]
    fn test_stage_prefixes_message() {
        let e = ReportError::MissingColumn("total_for_week".to_string()).in_stage("metrics");
        assert_eq!(e.to_string(), "metrics: в таблице нет столбца 'total_for_week'");
    }
}
