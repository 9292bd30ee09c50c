use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::command::BotCommands;
use crate::core::reporting::ReportAssembler;
use crate::commands::common::{comparison_caption, error_message, weekly_caption, ReportKind};

/// Доступные команды:
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case")]
pub enum TelegramCommand {
    /// Показать меню отчетов.
    Start,

    /// Показать этот список.
    Help,

    /// Отчет за прошлую неделю с графиком с начала года.
    Week,

    /// Сглаженное сравнение заготовки по годам.
    Compare,
}

pub const UNKNOWN_COMMAND_REPLY: &str = "Неизвестная команда. Список команд: /help";

/// What the bot sends back for a report request.
#[derive(Debug, PartialEq)]
pub enum ReportReply {
    Photo {
        png: Vec<u8>,
        file_name: &'static str,
        caption: String,
    },
    Error(String),
}

pub fn parse_command(text: &str, bot_name: &str) -> Option<TelegramCommand> {
    TelegramCommand::parse(text, bot_name).ok()
}

pub fn report_command(command: &TelegramCommand) -> Option<ReportKind> {
    match command {
        TelegramCommand::Week => Some(ReportKind::Week),
        TelegramCommand::Compare => Some(ReportKind::Compare),
        TelegramCommand::Start | TelegramCommand::Help => None,
    }
}

fn report_button(kind: ReportKind) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(kind.button_text(), kind.callback_data())
}

/// Two buttons, one per report, stacked vertically.
pub fn start_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![report_button(ReportKind::Week)],
        vec![report_button(ReportKind::Compare)],
    ])
}

pub fn refresh_keyboard(kind: ReportKind) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Обновить отчет",
        kind.callback_data(),
    )]])
}

/// Builds the requested report and turns it into a reply. Failures become a user-facing message.
pub async fn execute_report(kind: ReportKind, assembler: &ReportAssembler) -> ReportReply {
    let result = match kind {
        ReportKind::Week => assembler
            .weekly_report()
            .await
            .map(|report| (report.chart_png, weekly_caption(&report.metrics))),
        ReportKind::Compare => assembler
            .comparison_report()
            .await
            .map(|report| {
                let caption = comparison_caption(&report);
                (report.chart_png, caption)
            }),
    };

    match result {
        Ok((png, caption)) => ReportReply::Photo {
            png,
            file_name: kind.file_name(),
            caption,
        },
        Err(e) => ReportReply::Error(error_message(&e)),
    }
}
