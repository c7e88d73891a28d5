//! Routes Telegram updates to the orchestrator. Endpoints only spawn work so
//! the polling loop is never held up by a lookup or a download.

use std::sync::Arc;

use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};
use yt_source::YtDlp;

use crate::{transport::telegram::TelegramTransport, Orchestrator};

pub type BotOrchestrator = Orchestrator<YtDlp, YtDlp, TelegramTransport>;

type HandlerResult = anyhow::Result<()>;

#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "say hello and show how to use the bot")]
    Start,
    #[command(description = "show how to use the bot")]
    Help,
}

pub fn schema() -> UpdateHandler<anyhow::Error> {
    let commands = dptree::entry()
        .filter_command::<Command>()
        .endpoint(on_command);

    let messages = Update::filter_message()
        .branch(commands)
        .branch(dptree::endpoint(on_text));

    let selections = Update::filter_callback_query().endpoint(on_selection);

    dptree::entry().branch(messages).branch(selections)
}

async fn on_command(orchestrator: Arc<BotOrchestrator>, msg: Message, cmd: Command) -> HandlerResult {
    match cmd {
        Command::Start | Command::Help => orchestrator.handle_help(msg.chat.id).await?,
    }
    Ok(())
}

async fn on_text(orchestrator: Arc<BotOrchestrator>, msg: Message) -> HandlerResult {
    if let Some(text) = msg.text() {
        orchestrator.spawn_text(msg.chat.id, text);
    }
    Ok(())
}

async fn on_selection(orchestrator: Arc<BotOrchestrator>, query: CallbackQuery) -> HandlerResult {
    let chat = query
        .message
        .as_ref()
        .map(|message| message.chat().id)
        .unwrap_or_else(|| ChatId::from(query.from.id));
    let payload = query.data.unwrap_or_default();

    orchestrator.spawn_selection(chat, query.id.to_string(), payload);
    Ok(())
}
