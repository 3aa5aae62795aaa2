//! Telegram transport (teloxide)

pub mod gateway;
pub mod handlers;

pub use gateway::TelegramGateway;
pub use handlers::{schema, Command};

use std::sync::Arc;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::AppContext;

/// Poll for updates until Ctrl+C
///
/// Updates queued while the bot was offline are dropped. Every message is
/// handled in its own task, so requests from the same chat run concurrently.
pub async fn run(bot: Bot, ctx: Arc<AppContext>) -> Result<(), teloxide::RequestError> {
    bot.delete_webhook().drop_pending_updates(true).await?;
    bot.set_my_commands(Command::bot_commands()).await?;

    let me = bot.get_me().await?;
    tracing::info!(username = ?me.username, "Bot connected, polling for updates");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![ctx])
        .distribution_function(|_| None::<std::convert::Infallible>)
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Dispatcher stopped");
    Ok(())
}
