use yt_source::SourceError;

use crate::{messages, selection::PayloadError};

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("search returned no results")]
    NoResults,
    #[error("no audio-only stream available for {0:?}")]
    NoAudioStream(String),
    #[error("YouTube source error: {0}")]
    Source(#[from] SourceError),
    #[error("malformed selection: {0}")]
    MalformedSelection(#[from] PayloadError),
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl BotError {
    /// Text shown to the user when a request ends with this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoResults => messages::NO_RESULTS.to_string(),
            Self::NoAudioStream(_) => messages::NO_AUDIO.to_string(),
            Self::Source(SourceError::Unavailable(_)) => messages::UNAVAILABLE.to_string(),
            Self::Source(SourceError::Spawn { .. }) | Self::Source(SourceError::Io(_)) => {
                messages::UNEXPECTED.to_string()
            }
            Self::Source(SourceError::Failed { stderr, .. }) => messages::lookup_failed(stderr),
            Self::Source(e) => messages::lookup_failed(&e.to_string()),
            Self::MalformedSelection(_) => messages::INVALID_SELECTION.to_string(),
            Self::Unclassified(_) => messages::UNEXPECTED.to_string(),
        }
    }

    /// Whether this error points at a fault on our side rather than at the request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Unclassified(_)
                | Self::Source(SourceError::Spawn { .. })
                | Self::Source(SourceError::Io(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(BotError::NoResults.user_message(), messages::NO_RESULTS);
        assert_eq!(
            BotError::NoAudioStream("x".into()).user_message(),
            messages::NO_AUDIO
        );
        assert_eq!(
            BotError::Source(SourceError::Unavailable("private".into())).user_message(),
            messages::UNAVAILABLE
        );
        assert_eq!(
            BotError::Unclassified(anyhow::anyhow!("boom")).user_message(),
            messages::UNEXPECTED
        );
    }

    #[test]
    fn test_library_errors_carry_their_text() {
        let err = BotError::Source(SourceError::Failed {
            status: "exit status: 1".into(),
            stderr: "HTTP Error 429: Too Many Requests".into(),
        });
        let text = err.user_message();
        assert_eq!(
            text,
            "Sorry, YouTube lookup failed: HTTP Error 429: Too Many Requests"
        );
        assert!(!text.contains("exit status"));
        assert!(!err.is_internal());
    }
}
