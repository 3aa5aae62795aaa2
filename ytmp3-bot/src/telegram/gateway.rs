//! Telegram implementation of [`ChatGateway`]
//!
//! The status message is posted as a reply to the user's link on the first
//! update and edited in place afterwards.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ParseMode, ReplyParameters};
use teloxide::utils::html;
use tokio::sync::Mutex;

use crate::error::RequestResult;
use crate::gateway::{AudioDelivery, ChatGateway};

pub struct TelegramGateway {
    bot: Bot,
    chat_id: ChatId,
    reply_to: MessageId,
    status: Mutex<Option<MessageId>>,
}

impl TelegramGateway {
    /// Gateway replying to message `reply_to` in `chat_id`
    pub fn new(bot: Bot, chat_id: ChatId, reply_to: MessageId) -> Self {
        Self {
            bot,
            chat_id,
            reply_to,
            status: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    async fn update_status(&self, text: &str) -> RequestResult<()> {
        let mut status = self.status.lock().await;
        match *status {
            Some(message_id) => {
                self.bot
                    .edit_message_text(self.chat_id, message_id, text)
                    .await?;
            }
            None => {
                let sent = self
                    .bot
                    .send_message(self.chat_id, text)
                    .reply_parameters(ReplyParameters::new(self.reply_to))
                    .await?;
                *status = Some(sent.id);
            }
        }
        Ok(())
    }

    async fn send_audio(&self, delivery: &AudioDelivery) -> RequestResult<()> {
        self.bot
            .send_audio(self.chat_id, InputFile::file(delivery.audio_path.clone()))
            .title(delivery.title.clone())
            .performer(delivery.performer.clone())
            .caption(caption_html(delivery))
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(self.reply_to))
            .await?;
        Ok(())
    }

    async fn clear_status(&self) -> RequestResult<()> {
        let message_id = self.status.lock().await.take();
        if let Some(message_id) = message_id {
            self.bot.delete_message(self.chat_id, message_id).await?;
        }
        Ok(())
    }
}

/// HTML caption: bold title, then an italic link back to the source
pub fn caption_html(delivery: &AudioDelivery) -> String {
    format!(
        "🎵 <b>{}</b>\n\n<em><a href='{}'>song.link</a></em>",
        html::escape(&delivery.title),
        html::escape(&delivery.source_url).replace('\'', "&#39;"),
    )
}

/// Plain-text reply to `msg`
pub async fn reply(bot: &Bot, msg: &Message, text: &str) -> ResponseResult<Message> {
    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn delivery(title: &str, source_url: &str) -> AudioDelivery {
        AudioDelivery {
            audio_path: PathBuf::from("a.mp3"),
            title: title.to_string(),
            performer: "Band".to_string(),
            source_url: source_url.to_string(),
        }
    }

    #[test]
    fn test_caption_format() {
        assert_eq!(
            caption_html(&delivery("Song", "https://youtu.be/abc")),
            "🎵 <b>Song</b>\n\n<em><a href='https://youtu.be/abc'>song.link</a></em>"
        );
    }

    #[test]
    fn test_caption_escapes_markup() {
        let caption = caption_html(&delivery(
            "Rock & <Roll>",
            "https://youtube.com/watch?v=a&t=1'",
        ));
        assert!(caption.contains("<b>Rock &amp; &lt;Roll&gt;</b>"));
        assert!(caption.contains("href='https://youtube.com/watch?v=a&amp;t=1&#39;'"));
    }
}
