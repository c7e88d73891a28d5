use std::sync::LazyLock;

use regex::Regex;

static YT_VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:watch\?(?:[^#\s]*&)?v=|shorts/|embed/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .unwrap()
});

static YT_BARE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

/// A search hit: enough to label a choice and to resolve it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSummary {
    pub title: String,
    /// Canonical watch reference, accepted by [`crate::VideoLookup::resolve`]
    pub url: String,
}

/// A resolved video together with the streams it offers.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoCandidate {
    pub title: String,
    pub url: String,
    pub streams: Vec<AudioStream>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioStream {
    /// Handle understood by the extractor (the yt-dlp `format_id`)
    pub format_id: String,
    /// Average bitrate in kbit/s, 0.0 when the source does not report one
    pub bitrate: f64,
    /// Container extension, e.g. `m4a` or `webm`
    pub ext: String,
    pub audio_only: bool,
}

impl VideoCandidate {
    pub fn best_audio(&self) -> Option<&AudioStream> {
        select_best_audio(&self.streams)
    }
}

/// Picks the audio-only stream with the highest bitrate.
///
/// Ties resolve to the first stream carrying the maximum.
pub fn select_best_audio(streams: &[AudioStream]) -> Option<&AudioStream> {
    streams
        .iter()
        .filter(|s| s.audio_only)
        .reduce(|best, s| if s.bitrate > best.bitrate { s } else { best })
}

/// Extracts the 11 character YouTube video id from a watch/short/embed URL
/// or a bare id.
pub fn video_id(reference: &str) -> Option<&str> {
    let reference = reference.trim();
    if YT_BARE_ID_RE.is_match(reference) {
        return Some(reference);
    }
    YT_VIDEO_ID_RE
        .captures(reference)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Compact `https://youtu.be/<id>` form of a reference, if it names a video.
pub fn short_url(reference: &str) -> Option<String> {
    video_id(reference).map(|id| format!("https://youtu.be/{id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(format_id: &str, bitrate: f64, audio_only: bool) -> AudioStream {
        AudioStream {
            format_id: format_id.to_string(),
            bitrate,
            ext: "m4a".to_string(),
            audio_only,
        }
    }

    #[test]
    fn test_selects_highest_bitrate_audio_only() {
        let streams = vec![
            stream("139", 48.0, true),
            stream("251", 160.0, true),
            stream("140", 129.5, true),
            stream("18", 400.0, false),
        ];

        let best = select_best_audio(&streams).expect("an audio stream");
        assert_eq!(best.format_id, "251");
    }

    #[test]
    fn test_ties_resolve_to_first_maximum() {
        let streams = vec![
            stream("a", 64.0, true),
            stream("b", 128.0, true),
            stream("c", 128.0, true),
        ];

        let best = select_best_audio(&streams).unwrap();
        assert_eq!(best.format_id, "b");
    }

    #[test]
    fn test_no_audio_only_streams() {
        let streams = vec![stream("18", 400.0, false), stream("22", 900.0, false)];
        assert!(select_best_audio(&streams).is_none());
        assert!(select_best_audio(&[]).is_none());
    }

    #[test]
    fn test_unknown_bitrate_still_selectable() {
        let streams = vec![stream("x", 0.0, true)];
        assert_eq!(select_best_audio(&streams).unwrap().format_id, "x");
    }

    #[test]
    fn test_video_id_extraction() {
        let cases = [
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=3", Some("dQw4w9WgXcQ")),
            ("https://music.youtube.com/watch?v=dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("https://youtu.be/dQw4w9WgXcQ?si=abc", Some("dQw4w9WgXcQ")),
            ("https://www.youtube.com/shorts/dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("dQw4w9WgXcQ", Some("dQw4w9WgXcQ")),
            ("bad", None),
            ("https://example.com/watch?v=short", None),
        ];

        for (input, expected) in cases {
            assert_eq!(video_id(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            short_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("https://youtu.be/dQw4w9WgXcQ")
        );
        assert_eq!(short_url("bad"), None);
    }
}
