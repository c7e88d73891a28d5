#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("video unavailable: {0}")]
    Unavailable(String),
    #[error("yt-dlp exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("failed to parse yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("download finished but {0} is empty")]
    EmptyDownload(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Classifies a failed yt-dlp run by its stderr.
    pub(crate) fn from_stderr(status: std::process::ExitStatus, stderr: &[u8]) -> Self {
        let stderr = String::from_utf8_lossy(stderr);
        let mut lines = stderr.lines().map(str::trim).filter(|l| !l.is_empty());
        // a crash leaves a traceback without any ERROR line; its last line names the exception
        let line = lines
            .clone()
            .rev()
            .find(|line| line.starts_with("ERROR:"))
            .or_else(|| lines.next_back())
            .unwrap_or_default();
        let message = truncate(line.trim_start_matches("ERROR:").trim());

        const UNAVAILABLE_MARKERS: [&str; 4] = [
            "Video unavailable",
            "Private video",
            "This video is not available",
            "This video has been removed",
        ];
        if UNAVAILABLE_MARKERS.iter().any(|m| message.contains(m)) {
            return Self::Unavailable(message);
        }

        Self::Failed {
            status: status.to_string(),
            stderr: message,
        }
    }

    /// Whether yt-dlp rejected the reference itself rather than failing to fetch it.
    pub fn is_unknown_reference(&self) -> bool {
        const MARKERS: [&str; 3] = [
            "is not a valid URL",
            "Unsupported URL",
            "Incomplete YouTube ID",
        ];
        match self {
            Self::Failed { stderr, .. } => MARKERS.iter().any(|m| stderr.contains(m)),
            _ => false,
        }
    }
}

/// Longest message kept from yt-dlp stderr, in chars.
const MAX_MESSAGE_CHARS: usize = 300;

fn truncate(message: &str) -> String {
    if message.chars().count() <= MAX_MESSAGE_CHARS {
        return message.to_string();
    }
    let mut short = message
        .chars()
        .take(MAX_MESSAGE_CHARS - 1)
        .collect::<String>();
    short.push('…');
    short
}
