use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use yt_source::{video_id, AudioStream, SourceError, VideoCandidate, VideoLookup, VideoSummary};

#[derive(Clone, Default)]
pub struct MockLookup {
    pub results: Vec<VideoSummary>,
    pub videos: HashMap<String, VideoCandidate>,
    pub searches: Arc<Mutex<Vec<(String, usize)>>>,
    pub resolves: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
    pub unavailable: bool,
}

fn key(reference: &str) -> String {
    video_id(reference)
        .map(str::to_string)
        .unwrap_or_else(|| reference.to_string())
}

pub fn audio(format_id: &str, bitrate: f64) -> AudioStream {
    AudioStream {
        format_id: format_id.to_string(),
        bitrate,
        ext: "m4a".to_string(),
        audio_only: true,
    }
}

pub fn muxed(format_id: &str, bitrate: f64) -> AudioStream {
    AudioStream {
        format_id: format_id.to_string(),
        bitrate,
        ext: "mp4".to_string(),
        audio_only: false,
    }
}

/// A video with an 11 character id derived from `n`.
pub fn video(n: usize, streams: Vec<AudioStream>) -> VideoCandidate {
    VideoCandidate {
        title: format!("Calm Down #{n}"),
        url: format!("https://www.youtube.com/watch?v=video{n:06}"),
        streams,
    }
}

impl MockLookup {
    pub fn with_videos(videos: Vec<VideoCandidate>) -> Self {
        let results = videos
            .iter()
            .map(|v| VideoSummary {
                title: v.title.clone(),
                url: v.url.clone(),
            })
            .collect();
        let videos = videos.into_iter().map(|v| (key(&v.url), v)).collect();

        Self {
            results,
            videos,
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn unavailable(videos: Vec<VideoCandidate>) -> Self {
        Self {
            unavailable: true,
            ..Self::with_videos(videos)
        }
    }
}

impl VideoLookup for MockLookup {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VideoSummary>, SourceError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), limit));
        if let Some(ref msg) = self.fail_with {
            return Err(SourceError::Failed {
                status: "exit status: 1".into(),
                stderr: msg.clone(),
            });
        }
        Ok(self.results.iter().take(limit).cloned().collect())
    }

    async fn resolve(&self, reference: &str) -> Result<Option<VideoCandidate>, SourceError> {
        self.resolves.lock().unwrap().push(reference.to_string());
        if self.unavailable {
            return Err(SourceError::Unavailable(format!("{reference}: Video unavailable")));
        }
        Ok(self.videos.get(&key(reference)).cloned())
    }
}
