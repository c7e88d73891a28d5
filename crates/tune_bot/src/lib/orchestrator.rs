pub mod builder;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use tempfile::NamedTempFile;
use tokio::{
    sync::{OwnedSemaphorePermit, Semaphore},
    task::JoinHandle,
};
use yt_source::{AudioExtractor, VideoCandidate, VideoLookup};

use crate::{
    messages,
    selection::SelectionPayload,
    transport::{ChatId, ChatTransport, Choice, MessageId},
    BotError,
};

/// How a text query is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Send the audio of the first search result right away
    AutoPick,
    /// Offer up to `choices` results as buttons and wait for a click
    Choose { choices: usize },
}

/// What a finished request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Sent { title: String },
    Offered { count: usize },
}

/// Runs one pipeline per inbound event: lookup, download, send, clean up.
pub struct Orchestrator<L, X, T>
where
    L: VideoLookup + Send + Sync + 'static,
    X: AudioExtractor + Send + Sync + 'static,
    T: ChatTransport + Send + Sync + 'static,
{
    mode: Mode,
    workdir: PathBuf,
    lookup: L,
    extractor: X,
    transport: T,
    limiter: Option<Arc<Semaphore>>,
}

impl<L, X, T> Orchestrator<L, X, T>
where
    L: VideoLookup + Send + Sync + 'static,
    X: AudioExtractor + Send + Sync + 'static,
    T: ChatTransport + Send + Sync + 'static,
{
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Starts a task for a text query. Blank text starts nothing.
    pub fn spawn_text(self: &Arc<Self>, chat: ChatId, text: &str) -> Option<JoinHandle<()>> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        let this = Arc::clone(self);

        let handle = match self.admit() {
            Ok(permit) => tokio::spawn(async move {
                let _permit = permit;
                let _ = this.handle_text(chat, &query).await;
            }),
            Err(Busy) => tokio::spawn(async move {
                tracing::warn!(chat = chat.0, "Rejecting query, too many requests in flight");
                if let Err(e) = this.transport.send_text(chat, messages::BUSY).await {
                    tracing::warn!(error = ?e, "Failed to send busy notice");
                }
            }),
        };

        Some(handle)
    }

    /// Starts a task for a button click.
    pub fn spawn_selection(
        self: &Arc<Self>,
        chat: ChatId,
        callback_id: String,
        payload: String,
    ) -> JoinHandle<()> {
        let this = Arc::clone(self);

        match self.admit() {
            Ok(permit) => tokio::spawn(async move {
                let _permit = permit;
                let _ = this.handle_selection(chat, &callback_id, &payload).await;
            }),
            Err(Busy) => tokio::spawn(async move {
                tracing::warn!(chat = chat.0, "Rejecting selection, too many requests in flight");
                if let Err(e) = this
                    .transport
                    .acknowledge(&callback_id, Some(messages::BUSY))
                    .await
                {
                    tracing::warn!(error = ?e, "Failed to acknowledge selection");
                }
            }),
        }
    }

    pub async fn handle_help(&self, chat: ChatId) -> anyhow::Result<()> {
        self.transport
            .send_text(chat, &messages::help(self.mode))
            .await?;
        Ok(())
    }

    /// Answers a text query according to the configured [`Mode`].
    ///
    /// Failures are reported to the user before being returned.
    #[tracing::instrument(skip(self), fields(chat = chat.0))]
    pub async fn handle_text(&self, chat: ChatId, query: &str) -> Result<Outcome, BotError> {
        tracing::info!("Received query");
        let mut status = None;

        let result = match self.mode {
            Mode::AutoPick => self.send_first_result(chat, query, &mut status).await,
            Mode::Choose { choices } => self.offer_choices(chat, query, choices, &mut status).await,
        };

        self.finish(chat, status, result).await
    }

    /// Downloads and sends the video a button click points at.
    #[tracing::instrument(skip(self, payload), fields(chat = chat.0))]
    pub async fn handle_selection(
        &self,
        chat: ChatId,
        callback_id: &str,
        payload: &str,
    ) -> Result<Outcome, BotError> {
        let selection = match SelectionPayload::decode(payload) {
            Ok(selection) => selection,
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting malformed selection");
                if let Err(ack_err) = self
                    .transport
                    .acknowledge(callback_id, Some(messages::INVALID_SELECTION))
                    .await
                {
                    tracing::warn!(error = ?ack_err, "Failed to acknowledge selection");
                }
                return Err(BotError::MalformedSelection(e));
            }
        };

        if let Err(e) = self.transport.acknowledge(callback_id, None).await {
            tracing::warn!(error = ?e, "Failed to acknowledge selection");
        }

        let status = Some(selection.message());
        let result = self.send_selected(chat, &selection).await;

        self.finish(chat, status, result).await
    }

    async fn send_first_result(
        &self,
        chat: ChatId,
        query: &str,
        status: &mut Option<MessageId>,
    ) -> Result<Outcome, BotError> {
        let message = self.start_search(chat, status).await?;

        let hit = self
            .lookup
            .search(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(BotError::NoResults)?;

        let video = self
            .lookup
            .resolve(&hit.url)
            .await?
            .ok_or(BotError::NoResults)?;

        self.transport
            .edit_text(chat, message, &messages::found(&video.title))
            .await?;

        self.deliver(chat, &video).await?;

        if let Err(e) = self.transport.delete_message(chat, message).await {
            tracing::warn!(error = ?e, "Failed to delete status message");
        }
        *status = None;

        Ok(Outcome::Sent { title: video.title })
    }

    async fn offer_choices(
        &self,
        chat: ChatId,
        query: &str,
        limit: usize,
        status: &mut Option<MessageId>,
    ) -> Result<Outcome, BotError> {
        let message = self.start_search(chat, status).await?;

        let hits = self.lookup.search(query, limit).await?;

        let choices = hits
            .iter()
            .take(limit)
            .filter_map(|hit| {
                let payload = SelectionPayload::new(&hit.url, message)
                    .encode()
                    .inspect_err(|e| tracing::warn!(error = %e, url = %hit.url, "Skipping result"))
                    .ok()?;
                Some(Choice {
                    label: messages::choice_label(&hit.title),
                    payload,
                })
            })
            .collect::<Vec<_>>();

        if choices.is_empty() {
            return Err(BotError::NoResults);
        }

        self.transport
            .present_choices(chat, message, messages::PICK_A_TRACK, &choices)
            .await?;
        tracing::info!(count = choices.len(), "Offered choices");

        Ok(Outcome::Offered {
            count: choices.len(),
        })
    }

    async fn send_selected(
        &self,
        chat: ChatId,
        selection: &SelectionPayload,
    ) -> Result<Outcome, BotError> {
        let message = selection.message();
        self.transport
            .edit_text(chat, message, messages::GETTING_TRACK)
            .await?;

        // the reference is looked up again; the video may differ from the one offered
        let video = self
            .lookup
            .resolve(&selection.url)
            .await?
            .ok_or(BotError::NoResults)?;

        self.transport
            .edit_text(chat, message, &messages::found(&video.title))
            .await?;

        self.deliver(chat, &video).await?;

        // audio is delivered at this point, a failed status edit does not fail the request
        if let Err(e) = self
            .transport
            .edit_text(chat, message, &messages::sent(&video.title))
            .await
        {
            tracing::warn!(error = ?e, "Failed to update status message");
        }

        Ok(Outcome::Sent { title: video.title })
    }

    async fn start_search(
        &self,
        chat: ChatId,
        status: &mut Option<MessageId>,
    ) -> Result<MessageId, BotError> {
        if let Err(e) = self.transport.send_typing(chat).await {
            tracing::debug!(error = ?e, "Failed to send typing indicator");
        }

        let message = self.transport.send_text(chat, messages::SEARCHING).await?;
        *status = Some(message);

        Ok(message)
    }

    /// Picks the best audio stream, downloads it into a temporary file and sends it.
    #[tracing::instrument(skip_all, fields(url = %video.url))]
    async fn deliver(&self, chat: ChatId, video: &VideoCandidate) -> Result<(), BotError> {
        let stream = video
            .best_audio()
            .ok_or_else(|| BotError::NoAudioStream(video.title.clone()))?;
        tracing::debug!(
            format_id = %stream.format_id,
            bitrate = stream.bitrate,
            "Selected audio stream"
        );

        // removed on drop if anything below fails
        let audio_file = self.temp_file(&stream.ext)?;

        self.extractor
            .download(video, stream, audio_file.path())
            .await?;

        self.transport
            .send_audio(chat, audio_file.path(), &video.title)
            .await?;

        remove_temp_file(audio_file);

        Ok(())
    }

    fn temp_file(&self, ext: &str) -> anyhow::Result<NamedTempFile> {
        let suffix = if ext.is_empty() {
            String::new()
        } else {
            format!(".{ext}")
        };

        tempfile::Builder::new()
            .prefix("tune-")
            .suffix(&suffix)
            .tempfile_in(&self.workdir)
            .with_context(|| format!("Failed to create temporary file in {:?}", self.workdir))
    }

    /// Reports a failed request to the user, editing the status message when there is one.
    async fn finish(
        &self,
        chat: ChatId,
        status: Option<MessageId>,
        result: Result<Outcome, BotError>,
    ) -> Result<Outcome, BotError> {
        let Err(ref e) = result else {
            return result;
        };

        if e.is_internal() {
            tracing::error!(error = ?e, "Request failed");
        } else {
            tracing::info!(error = %e, "Request ended without audio");
        }

        let text = e.user_message();
        let reported = match status {
            Some(message) => self.transport.edit_text(chat, message, &text).await,
            None => self.transport.send_text(chat, &text).await.map(|_| ()),
        };
        if let Err(report_err) = reported {
            tracing::warn!(error = ?report_err, "Failed to report error to user");
        }

        result
    }

    fn admit(&self) -> Result<Option<OwnedSemaphorePermit>, Busy> {
        match self.limiter {
            Some(ref limiter) => Arc::clone(limiter)
                .try_acquire_owned()
                .map(Some)
                .map_err(|_| Busy),
            None => Ok(None),
        }
    }
}

struct Busy;

fn remove_temp_file(file: NamedTempFile) {
    let path = file.path().to_path_buf();
    match file.close() {
        Ok(()) => tracing::info!(path = ?path, "Deleted temporary file"),
        Err(e) => tracing::warn!(error = ?e, path = ?path, "Failed to delete temporary file"),
    }
}
