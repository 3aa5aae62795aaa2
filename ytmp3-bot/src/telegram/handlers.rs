//! Update routing and endpoint handlers

use std::sync::Arc;
use teloxide::dispatching::{MessageFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::auth::Requester;
use crate::commands::{
    self, error_reply, ClearOutcome, TextOutcome, CLEARED_REPLY, GREETING, INVALID_LINK_REPLY,
};
use crate::telegram::gateway::{reply, TelegramGateway};
use crate::AppContext;

/// Bot commands; trailing text after the command is accepted and ignored
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "show the greeting")]
    Start(String),
    #[command(description = "delete all working files (admin only)")]
    Clear(String),
}

/// Message routing: commands first, other text is a link candidate.
/// Non-text messages (stickers, photos, voice) match no branch and are dropped.
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Message::filter_text().endpoint(text_handler))
}

/// Sender of `msg`, falling back to the chat id for anonymous senders
pub fn requester_of(msg: &Message) -> Requester {
    match msg.from.as_ref() {
        Some(user) => Requester::new(user.id.0, user.username.clone()),
        None => Requester::new(msg.chat.id.0.unsigned_abs(), None),
    }
}

async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: Arc<AppContext>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start(_) => {
            reply(&bot, &msg, GREETING).await?;
        }
        Command::Clear(_) => {
            let requester = requester_of(&msg);
            let outcome = {
                let ctx = Arc::clone(&ctx);
                tokio::task::spawn_blocking(move || commands::clear_workspace(&ctx, &requester))
                    .await
                    .map_err(|e| ytmp3_common::Error::Internal(format!("clear task failed: {}", e)))
                    .and_then(|result| result)
            };

            match outcome {
                Ok(ClearOutcome::Cleared(_)) => {
                    reply(&bot, &msg, CLEARED_REPLY).await?;
                }
                Ok(ClearOutcome::Denied) => {}
                Err(e) => {
                    tracing::error!("Clear failed: {}", e);
                    reply(&bot, &msg, &error_reply(&e)).await?;
                }
            }
        }
    }
    Ok(())
}

async fn text_handler(
    bot: Bot,
    msg: Message,
    text: String,
    ctx: Arc<AppContext>,
) -> ResponseResult<()> {
    let requester = requester_of(&msg);
    let gateway = TelegramGateway::new(bot.clone(), msg.chat.id, msg.id);

    match commands::handle_text(&ctx, &requester, &text, &gateway).await {
        TextOutcome::Rejected => {
            reply(&bot, &msg, INVALID_LINK_REPLY).await?;
        }
        TextOutcome::Delivered(_) => {}
        TextOutcome::Failed(e) => {
            reply(&bot, &msg, &error_reply(&e)).await?;
        }
    }
    Ok(())
}
