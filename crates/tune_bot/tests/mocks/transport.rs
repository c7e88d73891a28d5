use std::{
    path::Path,
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc, Mutex,
    },
};

use tune_bot::transport::{ChatId, ChatTransport, Choice, MessageId};

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Typing,
    Text {
        message: MessageId,
        text: String,
    },
    Edit {
        message: MessageId,
        text: String,
    },
    Choices {
        message: MessageId,
        text: String,
        choices: Vec<Choice>,
    },
    Audio {
        title: String,
        contents: String,
    },
    Delete {
        message: MessageId,
    },
    Ack {
        callback_id: String,
        text: Option<String>,
    },
}

#[derive(Clone, Default)]
pub struct MockTransport {
    pub sent: Arc<Mutex<Vec<Sent>>>,
    pub fail_audio: Option<String>,
    /// Edits whose text contains this marker fail
    pub fail_edits_containing: Option<String>,
    next_message_id: Arc<AtomicI32>,
}

impl MockTransport {
    pub fn failing_audio(msg: &str) -> Self {
        Self {
            fail_audio: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn failing_edits(marker: &str) -> Self {
        Self {
            fail_edits_containing: Some(marker.to_string()),
            ..Default::default()
        }
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }
}

impl ChatTransport for MockTransport {
    async fn send_typing(&self, _chat: ChatId) -> anyhow::Result<()> {
        self.record(Sent::Typing);
        Ok(())
    }

    async fn send_text(&self, _chat: ChatId, text: &str) -> anyhow::Result<MessageId> {
        let message = MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst) + 100);
        self.record(Sent::Text {
            message,
            text: text.to_string(),
        });
        Ok(message)
    }

    async fn edit_text(&self, _chat: ChatId, message: MessageId, text: &str) -> anyhow::Result<()> {
        if let Some(ref marker) = self.fail_edits_containing {
            if text.contains(marker.as_str()) {
                return Err(anyhow::anyhow!("Bad Request: message to edit not found"));
            }
        }
        self.record(Sent::Edit {
            message,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn present_choices(
        &self,
        _chat: ChatId,
        message: MessageId,
        text: &str,
        choices: &[Choice],
    ) -> anyhow::Result<()> {
        self.record(Sent::Choices {
            message,
            text: text.to_string(),
            choices: choices.to_vec(),
        });
        Ok(())
    }

    async fn send_audio(&self, _chat: ChatId, file: &Path, title: &str) -> anyhow::Result<()> {
        if let Some(ref msg) = self.fail_audio {
            return Err(anyhow::anyhow!("{}", msg));
        }
        let contents = tokio::fs::read_to_string(file).await?;
        self.record(Sent::Audio {
            title: title.to_string(),
            contents,
        });
        Ok(())
    }

    async fn delete_message(&self, _chat: ChatId, message: MessageId) -> anyhow::Result<()> {
        self.record(Sent::Delete { message });
        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str, text: Option<&str>) -> anyhow::Result<()> {
        self.record(Sent::Ack {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
        });
        Ok(())
    }
}
