use std::{future::Future, path::Path};

use crate::{AudioStream, SourceError, VideoCandidate, VideoSummary};

pub mod ytdlp;

pub trait VideoLookup {
    /// Searches YouTube for `query`, returning at most `limit` hits in rank order.
    fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<VideoSummary>, SourceError>> + Send;

    /// Resolves a reference to the video and its streams.
    ///
    /// `Ok(None)` means the reference does not name any video.
    fn resolve(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<Option<VideoCandidate>, SourceError>> + Send;
}

pub trait AudioExtractor {
    /// Writes the bytes of `stream` of `video` to `dest`, replacing its contents.
    fn download(
        &self,
        video: &VideoCandidate,
        stream: &AudioStream,
        dest: &Path,
    ) -> impl Future<Output = Result<(), SourceError>> + Send;
}

impl<T: VideoLookup + Send + Sync> VideoLookup for &T {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VideoSummary>, SourceError> {
        (**self).search(query, limit).await
    }

    async fn resolve(&self, reference: &str) -> Result<Option<VideoCandidate>, SourceError> {
        (**self).resolve(reference).await
    }
}

impl<T: AudioExtractor + Send + Sync> AudioExtractor for &T {
    async fn download(
        &self,
        video: &VideoCandidate,
        stream: &AudioStream,
        dest: &Path,
    ) -> Result<(), SourceError> {
        (**self).download(video, stream, dest).await
    }
}
