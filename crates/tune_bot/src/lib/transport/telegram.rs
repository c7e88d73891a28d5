use std::{ops::Deref, path::Path};

use teloxide::{
    payloads::setters::*,
    prelude::*,
    types::{ChatAction, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode},
};

use crate::transport::{ChatTransport, Choice, MessageId};

#[derive(Clone)]
pub struct TelegramTransport(pub Bot);

impl Deref for TelegramTransport {
    type Target = Bot;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ChatTransport for TelegramTransport {
    async fn send_typing(&self, chat: ChatId) -> anyhow::Result<()> {
        self.0.send_chat_action(chat, ChatAction::Typing).await?;
        Ok(())
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> anyhow::Result<MessageId> {
        let message = self
            .0
            .send_message(chat, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(message.id)
    }

    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str) -> anyhow::Result<()> {
        self.0
            .edit_message_text(chat, message, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn present_choices(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        choices: &[Choice],
    ) -> anyhow::Result<()> {
        let keyboard = InlineKeyboardMarkup::new(choices.iter().map(|choice| {
            vec![InlineKeyboardButton::callback(
                choice.label.clone(),
                choice.payload.clone(),
            )]
        }));

        self.0
            .edit_message_text(chat, message, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn send_audio(&self, chat: ChatId, file: &Path, title: &str) -> anyhow::Result<()> {
        self.0
            .send_audio(chat, InputFile::file(file.to_path_buf()))
            .title(title)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to upload audio"))?;
        Ok(())
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> anyhow::Result<()> {
        self.0.delete_message(chat, message).await?;
        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str, text: Option<&str>) -> anyhow::Result<()> {
        let mut answer = self.0.answer_callback_query(callback_id.to_string());
        if let Some(text) = text {
            answer = answer.text(text);
        }
        answer.await?;
        Ok(())
    }
}
