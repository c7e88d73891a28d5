use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    process::Output,
};

use serde::Deserialize;
use tokio::process::Command;

use crate::{
    source::{AudioExtractor, VideoLookup},
    AudioStream, SourceError, VideoCandidate, VideoSummary,
};

/// `yt-dlp` driven as a child process.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    cookies_path: Option<PathBuf>,
    socket_timeout_secs: Option<u32>,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlp {
    const WATCH_URL: &'static str = "https://www.youtube.com/watch";

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            cookies_path: None,
            socket_timeout_secs: None,
        }
    }

    pub fn with_cookies(mut self, cookies_path: Option<PathBuf>) -> Self {
        self.cookies_path = cookies_path;
        self
    }

    pub fn with_socket_timeout(mut self, secs: u32) -> Self {
        self.socket_timeout_secs = Some(secs);
        self
    }

    async fn run<I, S>(&self, args: I) -> Result<Output, SourceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.arg("--no-warnings");
        if let Some(ref cookies) = self.cookies_path {
            command.arg("--cookies").arg(cookies);
        }
        if let Some(secs) = self.socket_timeout_secs {
            command.arg("--socket-timeout").arg(secs.to_string());
        }
        command.args(args);

        let output = command.output().await.map_err(|source| SourceError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            let err = SourceError::from_stderr(output.status, &output.stderr);
            tracing::warn!(error = %err, "yt-dlp failed");
            return Err(err);
        }
        Ok(output)
    }
}

impl VideoLookup for YtDlp {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VideoSummary>, SourceError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let search_term = format!("ytsearch{limit}:{query}");
        let output = self
            .run(["--flat-playlist", "--dump-json", search_term.as_str()])
            .await?;

        let mut results = parse_search_output(&String::from_utf8_lossy(&output.stdout))?;
        results.truncate(limit);
        tracing::info!(count = results.len(), "Search finished");

        Ok(results)
    }

    #[tracing::instrument(skip(self))]
    async fn resolve(&self, reference: &str) -> Result<Option<VideoCandidate>, SourceError> {
        let output = match self
            .run(["--dump-single-json", "--no-playlist", "--", reference])
            .await
        {
            Ok(output) => output,
            Err(e) if e.is_unknown_reference() => {
                tracing::info!("Reference does not name a video");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let candidate = parse_video_info(&String::from_utf8_lossy(&output.stdout))?;
        tracing::debug!(
            title = %candidate.title,
            streams = candidate.streams.len(),
            "Resolved video"
        );

        Ok(Some(candidate))
    }
}

impl AudioExtractor for YtDlp {
    #[tracing::instrument(skip(self, video), fields(url = %video.url))]
    async fn download(
        &self,
        video: &VideoCandidate,
        stream: &AudioStream,
        dest: &Path,
    ) -> Result<(), SourceError> {
        let dest_arg = dest.as_os_str();
        self.run([
            OsStr::new("-f"),
            OsStr::new(&stream.format_id),
            OsStr::new("--no-playlist"),
            OsStr::new("--force-overwrites"),
            OsStr::new("--no-part"),
            OsStr::new("-o"),
            dest_arg,
            OsStr::new("--"),
            OsStr::new(&video.url),
        ])
        .await?;

        let size = tokio::fs::metadata(dest).await?.len();
        if size == 0 {
            return Err(SourceError::EmptyDownload(dest.display().to_string()));
        }
        tracing::info!(bytes = size, "Audio downloaded");

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    id: Option<String>,
    title: Option<String>,
    url: Option<String>,
    webpage_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoInfo {
    id: String,
    title: Option<String>,
    webpage_url: Option<String>,
    #[serde(default)]
    formats: Vec<FormatInfo>,
}

#[derive(Debug, Deserialize)]
struct FormatInfo {
    format_id: String,
    #[serde(default)]
    ext: String,
    abr: Option<f64>,
    tbr: Option<f64>,
    acodec: Option<String>,
    vcodec: Option<String>,
}

impl FormatInfo {
    fn is_audio_only(&self) -> bool {
        let has_audio = self
            .acodec
            .as_deref()
            .is_some_and(|a| a != "none" && !a.is_empty());
        let has_video = self
            .vcodec
            .as_deref()
            .is_some_and(|v| v != "none" && !v.is_empty());
        has_audio && !has_video
    }
}

impl From<FormatInfo> for AudioStream {
    fn from(format: FormatInfo) -> Self {
        AudioStream {
            audio_only: format.is_audio_only(),
            bitrate: format.abr.or(format.tbr).unwrap_or_default(),
            format_id: format.format_id,
            ext: format.ext,
        }
    }
}

/// Parses `--flat-playlist --dump-json` output, one JSON object per line.
fn parse_search_output(stdout: &str) -> Result<Vec<VideoSummary>, SourceError> {
    let mut results = Vec::new();

    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let entry = serde_json::from_str::<SearchEntry>(line)?;

        let url = match (entry.webpage_url, entry.url, &entry.id) {
            (Some(url), _, _) | (None, Some(url), _) => url,
            (None, None, Some(id)) => format!("{}?v={id}", YtDlp::WATCH_URL),
            (None, None, None) => {
                tracing::debug!("Skipping search entry without a reference");
                continue;
            }
        };
        let title = entry
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| url.clone());

        results.push(VideoSummary { title, url });
    }

    Ok(results)
}

/// Parses `--dump-single-json` output for one video.
fn parse_video_info(stdout: &str) -> Result<VideoCandidate, SourceError> {
    let info = serde_json::from_str::<VideoInfo>(stdout.trim())?;

    let url = info
        .webpage_url
        .unwrap_or_else(|| format!("{}?v={}", YtDlp::WATCH_URL, info.id));

    Ok(VideoCandidate {
        title: info.title.unwrap_or_else(|| info.id.clone()),
        url,
        streams: info.formats.into_iter().map(AudioStream::from).collect(),
    })
}
