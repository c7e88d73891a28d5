//! # Selection payloads
//!
//! In `choose` mode every button carries the video reference and the id of
//! the message to keep editing, serialized as JSON into the callback data.
//! Nothing is kept server-side; a click is accepted only if its payload
//! decodes to exactly these two fields.

use serde::{Deserialize, Serialize};
use teloxide::types::MessageId;

/// Telegram rejects callback data longer than this many bytes.
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionPayload {
    pub url: String,
    pub message_id: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("invalid selection payload: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("selection payload is {0} bytes, callback data is limited to 64")]
    TooLong(usize),
}

impl SelectionPayload {
    /// Builds the payload for a button, shortening YouTube references to
    /// `https://youtu.be/<id>` so they fit in the callback data.
    pub fn new(reference: &str, message: MessageId) -> Self {
        Self {
            url: yt_source::short_url(reference).unwrap_or_else(|| reference.to_string()),
            message_id: message.0,
        }
    }

    pub fn message(&self) -> MessageId {
        MessageId(self.message_id)
    }

    pub fn encode(&self) -> Result<String, PayloadError> {
        let data = serde_json::to_string(self)?;
        if data.len() > MAX_CALLBACK_DATA_LEN {
            return Err(PayloadError::TooLong(data.len()));
        }
        Ok(data)
    }

    pub fn decode(data: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(data)?)
    }
}
