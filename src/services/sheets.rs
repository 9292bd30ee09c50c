use crate::app_config::SheetConfig;
use crate::core::error::{ReportError, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// The two tabs the reports are built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sheet {
    /// Default tab with the current year's weekly purchases.
    CurrentYear,
    /// Secondary tab with weekly totals for several years.
    YearComparison,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Returns the CSV export of `sheet`.
    async fn fetch_csv(&self, sheet: Sheet) -> Result<String>;
}

pub struct GoogleSheetSource {
    client: Client,
    sheets: SheetConfig,
}

impl GoogleSheetSource {
    pub fn new(sheets: SheetConfig, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, sheets })
    }

    pub fn export_url(&self, sheet: Sheet) -> String {
        let base = format!(
            "{}/{}/export?format=csv",
            self.sheets.export_base_url.trim_end_matches('/'),
            self.sheets.spreadsheet_id
        );
        match sheet {
            Sheet::CurrentYear => base,
            Sheet::YearComparison => format!("{}&gid={}&single=true", base, self.sheets.comparison_sheet_gid),
        }
    }
}

#[async_trait]
impl SheetSource for GoogleSheetSource {
    async fn fetch_csv(&self, sheet: Sheet) -> Result<String> {
        let url = self.export_url(sheet);
        info!("Fetching {:?} sheet export", sheet);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{:?} sheet export returned HTTP {}", sheet, status);
            return Err(ReportError::Fetch(format!("сервер ответил HTTP {}", status)));
        }

        let body = response.text().await?;
        debug!("Received {} bytes for {:?} sheet", body.len(), sheet);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base_url: &str) -> GoogleSheetSource {
        let sheets = SheetConfig {
            export_base_url: base_url.to_string(),
            spreadsheet_id: "doc".to_string(),
            comparison_sheet_gid: 42,
            ..SheetConfig::default()
        };
        GoogleSheetSource::new(sheets, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_export_urls() {
        let source = source("https://docs.google.com/spreadsheets/d/");
        assert_eq!(
            source.export_url(Sheet::CurrentYear),
            "https://docs.google.com/spreadsheets/d/doc/export?format=csv"
        );
        assert_eq!(
            source.export_url(Sheet::YearComparison),
            "https://docs.google.com/spreadsheets/d/doc/export?format=csv&gid=42&single=true"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        // Port 9 on localhost is the discard port and is not expected to serve HTTP.
        let source = source("http://127.0.0.1:9");
        let result = source.fetch_csv(Sheet::CurrentYear).await;
        assert!(matches!(result, Err(ReportError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_mock_source_returns_canned_csv() {
        let mut mock = MockSheetSource::new();
        mock.expect_fetch_csv()
            .withf(|sheet| *sheet == Sheet::YearComparison)
            .times(1)
            .returning(|_| Ok("week\n".to_string()));
        assert_eq!(mock.fetch_csv(Sheet::YearComparison).await.unwrap(), "week\n");
    }
}
