use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tokio::sync::Notify;
use yt_source::{AudioExtractor, AudioStream, SourceError, VideoCandidate};

#[derive(Clone, Default)]
pub struct MockExtractor {
    /// (format_id, destination) per download
    pub calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
    pub fail_with: Option<String>,
    pub gate: Option<Arc<Notify>>,
}

impl MockExtractor {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    /// Downloads block until the returned handle is notified.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let extractor = Self {
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        };
        (extractor, gate)
    }
}

impl AudioExtractor for MockExtractor {
    async fn download(
        &self,
        video: &VideoCandidate,
        stream: &AudioStream,
        dest: &Path,
    ) -> Result<(), SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((stream.format_id.clone(), dest.to_path_buf()));

        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }
        if let Some(ref msg) = self.fail_with {
            return Err(SourceError::Failed {
                status: "exit status: 1".into(),
                stderr: msg.clone(),
            });
        }

        tokio::fs::write(dest, format!("audio of {}", video.url)).await?;
        Ok(())
    }
}
