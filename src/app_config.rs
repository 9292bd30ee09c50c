use serde::Deserialize;
use std::env;
use std::path::Path;
use config::{Config, ConfigError, Environment, File, FileSourceFile, FileFormat};
use std::convert::TryFrom;

pub const DEFAULT_SPREADSHEET_ID: &str = "1qisfDBdQVu7UTjtZrAo0M5s3ZLZyVrp_ohZMKFv9sb0";
pub const DEFAULT_COMPARISON_SHEET_GID: u64 = 1232882650;
pub const DEFAULT_EXPORT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";
pub const DEFAULT_ROW_CAP: usize = 53;

/// Where the two tables live and which columns to take from them.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub comparison_sheet_gid: u64,
    pub export_base_url: String,
    pub row_cap: usize,
    /// Positions of delta_date, week, Safonov, Grushin, Katishev, total_for_week.
    pub current_year_columns: Vec<usize>,
    /// Position of the week column followed by one position per entry of `comparison_years`.
    pub comparison_columns: Vec<usize>,
    /// Years in the order their columns appear in the sheet.
    pub comparison_years: Vec<u16>,
}

impl SheetConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.current_year_columns.len() != 6 {
            return Err(ConfigError::Message(format!(
                "current_year_columns must list 6 positions, got {}",
                self.current_year_columns.len()
            )));
        }
        if self.comparison_columns.len() != self.comparison_years.len() + 1 {
            return Err(ConfigError::Message(format!(
                "comparison_columns must list the week column plus one column per year ({} years, {} columns)",
                self.comparison_years.len(),
                self.comparison_columns.len()
            )));
        }
        if self.row_cap == 0 {
            return Err(ConfigError::Message("row_cap must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            comparison_sheet_gid: DEFAULT_COMPARISON_SHEET_GID,
            export_base_url: DEFAULT_EXPORT_BASE_URL.to_string(),
            row_cap: DEFAULT_ROW_CAP,
            current_year_columns: vec![0, 1, 4, 5, 6, 9],
            comparison_columns: vec![12, 13, 14, 15, 16],
            comparison_years: vec![2025, 2024, 2023, 2022],
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub sheets: SheetConfig,
    pub request_timeout_secs: u64,
    pub telegram: TelegramConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(File::with_name("config").required(false))
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::load(File::from(path).required(true))
    }

    fn load(file: File<FileSourceFile, FileFormat>) -> Result<Self, ConfigError> {
        let defaults = SheetConfig::default();

        let settings = Config::builder()
            // Start off with default values
            .set_default("spreadsheet_id", defaults.spreadsheet_id)?
            .set_default("comparison_sheet_gid", defaults.comparison_sheet_gid as i64)?
            .set_default("export_base_url", defaults.export_base_url)?
            .set_default("row_cap", defaults.row_cap as i64)?
            .set_default("current_year_columns", to_config_list(&defaults.current_year_columns))?
            .set_default("comparison_columns", to_config_list(&defaults.comparison_columns))?
            .set_default(
                "comparison_years",
                defaults.comparison_years.iter().map(|y| i64::from(*y)).collect::<Vec<_>>(),
            )?
            .set_default("request_timeout_secs", 30i64)?
            .set_default("telegram_token", "")?
            .add_source(file)
            // Settings from environment variables (with a prefix of APP), lists comma separated
            .add_source(
                Environment::with_prefix("APP")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("current_year_columns")
                    .with_list_parse_key("comparison_columns")
                    .with_list_parse_key("comparison_years"),
            )
            .set_override_option("telegram_token", env::var("TELEGRAM_BOT_TOKEN").ok())?
            .build()?;

        let config = AppConfig::try_from(settings)?;
        config.sheets.validate()?;
        Ok(config)
    }
}

fn to_config_list(values: &[usize]) -> Vec<i64> {
    values.iter().map(|v| *v as i64).collect()
}

impl TryFrom<Config> for AppConfig {
    type Error = ConfigError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        Ok(Self {
            sheets: SheetConfig {
                spreadsheet_id: config.get_string("spreadsheet_id")?,
                comparison_sheet_gid: config.get_int("comparison_sheet_gid")? as u64,
                export_base_url: config.get_string("export_base_url")?,
                row_cap: config.get_int("row_cap")? as usize,
                current_year_columns: config.get::<Vec<usize>>("current_year_columns")?,
                comparison_columns: config.get::<Vec<usize>>("comparison_columns")?,
                comparison_years: config.get::<Vec<u16>>("comparison_years")?,
            },
            request_timeout_secs: config.get_int("request_timeout_secs")? as u64,
            telegram: TelegramConfig {
                token: config.get_string("telegram_token")?,
            },
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheets: SheetConfig::default(),
            request_timeout_secs: 30,
            telegram: TelegramConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_default_years_follow_sheet_order() {
        assert_eq!(SheetConfig::default().comparison_years, vec![2025, 2024, 2023, 2022]);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SheetConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_comparison_columns() {
        let sheets = SheetConfig {
            comparison_columns: vec![12, 13],
            ..SheetConfig::default()
        };
        assert!(sheets.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "spreadsheet_id = \"test-sheet\"").unwrap();
        writeln!(file, "row_cap = 10").unwrap();
        writeln!(file, "comparison_columns = [2, 3, 4]").unwrap();
        writeln!(file, "comparison_years = [2024, 2023]").unwrap();
        file.flush().unwrap();

        let config = AppConfig::from_path(file.path()).unwrap();
        assert_eq!(config.sheets.spreadsheet_id, "test-sheet");
        assert_eq!(config.sheets.row_cap, 10);
        assert_eq!(config.sheets.comparison_columns, vec![2, 3, 4]);
        assert_eq!(config.sheets.comparison_years, vec![2024, 2023]);
        assert_eq!(config.sheets.current_year_columns, vec![0, 1, 4, 5, 6, 9]);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_layout() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "current_year_columns = [0, 1]").unwrap();
        file.flush().unwrap();

        assert!(AppConfig::from_path(file.path()).is_err());
    }
}
