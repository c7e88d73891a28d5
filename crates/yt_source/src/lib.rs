//! # Yt Source
//!
//! This crate provides the YouTube side of the bot: looking up videos by
//! free-text query, resolving a video reference into its available streams,
//! and pulling the bytes of one audio stream onto disk.
//!
//! The collaborators are exposed as traits so the orchestrator can be driven
//! by test doubles; [`YtDlp`] is the production implementation backed by the
//! `yt-dlp` executable.

mod domain;
mod error;
mod source;

pub use domain::{select_best_audio, short_url, video_id, AudioStream, VideoCandidate, VideoSummary};
pub use error::SourceError;
pub use source::ytdlp::YtDlp;
pub use source::{AudioExtractor, VideoLookup};
