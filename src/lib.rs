use crate::app_config::AppConfig;
use crate::core::reporting::ReportAssembler;
use crate::services::sheets::GoogleSheetSource;
use crate::services::telegram::TelegramBot;
use dotenvy::dotenv;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

pub mod core;
pub mod services;
pub mod commands;
pub mod app_config;

pub fn initialize_environment() {
    let dotenv_result = dotenv();
    pretty_env_logger::init();
    if let Err(e) = dotenv_result {
        debug!("No .env file loaded: {}", e);
    }
}

pub fn initialize_system() -> Result<(ReportAssembler, AppConfig), Box<dyn std::error::Error>> {
    let config = AppConfig::new()?;
    let source = GoogleSheetSource::new(
        config.sheets.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let assembler = ReportAssembler::new(Arc::new(source), config.sheets.clone());
    Ok((assembler, config))
}

pub async fn run_telegram_bot() -> Result<(), Box<dyn std::error::Error>> {
    let (assembler, config) = initialize_system()?;
    if config.telegram.token.is_empty() {
        return Err("TELEGRAM_BOT_TOKEN is not set".into());
    }

    let bot = teloxide::Bot::new(&config.telegram.token);
    let telegram_bot = TelegramBot::new(bot, Arc::new(assembler));

    info!("Starting report bot for spreadsheet {}", config.sheets.spreadsheet_id);
    telegram_bot.run().await;
    info!("Report bot stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_initialize_system_success() {
        env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
        let result = initialize_system();
        assert!(result.is_ok());

        let (_, config) = result.unwrap();
        assert_eq!(config.telegram.token, "test_token");
        assert_eq!(config.sheets.row_cap, 53);
    }
}
