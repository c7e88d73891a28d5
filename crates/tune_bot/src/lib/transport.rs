pub mod telegram;

use std::{future::Future, path::Path};

pub use teloxide::types::{ChatId, MessageId};

/// One button of a choice menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    /// Callback data handed back verbatim when the button is clicked
    pub payload: String,
}

/// Outbound side of the chat platform. Texts use the HTML parse mode.
pub trait ChatTransport {
    fn send_typing(&self, chat: ChatId) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn send_text(
        &self,
        chat: ChatId,
        text: &str,
    ) -> impl Future<Output = anyhow::Result<MessageId>> + Send;

    fn edit_text(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Replaces the text of `message` and attaches one button per choice.
    fn present_choices(
        &self,
        chat: ChatId,
        message: MessageId,
        text: &str,
        choices: &[Choice],
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn send_audio(
        &self,
        chat: ChatId,
        file: &Path,
        title: &str,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn delete_message(
        &self,
        chat: ChatId,
        message: MessageId,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Answers a button click, optionally with a short notification.
    fn acknowledge(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}
