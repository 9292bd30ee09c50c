use crate::commands::common::{greeting, ReportKind};
use crate::commands::telegram::{
    execute_report, parse_command, refresh_keyboard, report_command, start_keyboard, ReportReply,
    TelegramCommand, UNKNOWN_COMMAND_REPLY,
};
use crate::core::reporting::ReportAssembler;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InputFile, Me};
use teloxide::utils::command::BotCommands;

pub struct TelegramBot {
    bot: Bot,
    assembler: Arc<ReportAssembler>,
}

impl TelegramBot {
    pub fn new(bot: Bot, assembler: Arc<ReportAssembler>) -> Self {
        Self { bot, assembler }
    }

    pub async fn run(self) {
        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(handle_message))
            .branch(Update::filter_callback_query().endpoint(handle_callback));

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.assembler])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    me: Me,
    assembler: Arc<ReportAssembler>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let Some(command) = parse_command(text, me.username()) else {
        bot.send_message(msg.chat.id, UNKNOWN_COMMAND_REPLY)
            .await?;
        return Ok(());
    };

    match command {
        TelegramCommand::Start => {
            let name = msg.from.as_ref().map(|user| user.full_name()).unwrap_or_default();
            info!("User {} opened the report menu in chat {}", name, msg.chat.id);
            bot.send_message(msg.chat.id, greeting(&name))
                .reply_markup(start_keyboard())
                .await?;
        }
        TelegramCommand::Help => {
            bot.send_message(msg.chat.id, TelegramCommand::descriptions().to_string())
                .await?;
        }
        TelegramCommand::Week | TelegramCommand::Compare => {
            if let Some(kind) = report_command(&command) {
                send_report(&bot, msg.chat.id, kind, &assembler).await?;
            }
        }
    }
    Ok(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    assembler: Arc<ReportAssembler>,
) -> ResponseResult<()> {
    // Answered before the report is built.
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(kind) = q.data.as_deref().and_then(ReportKind::from_callback_data) else {
        warn!("Ignoring callback with unknown data {:?}", q.data);
        return Ok(());
    };

    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or_else(|| q.from.id.into());
    send_report(&bot, chat_id, kind, &assembler).await
}

async fn send_report(
    bot: &Bot,
    chat_id: ChatId,
    kind: ReportKind,
    assembler: &ReportAssembler,
) -> ResponseResult<()> {
    info!("Building {:?} report for chat {}", kind, chat_id);
    match execute_report(kind, assembler).await {
        ReportReply::Photo { png, file_name, caption } => {
            bot.send_photo(chat_id, InputFile::memory(png).file_name(file_name))
                .caption(caption)
                .reply_markup(refresh_keyboard(kind))
                .await?;
        }
        ReportReply::Error(text) => {
            bot.send_message(chat_id, text).await?;
        }
    }
    Ok(())
}
