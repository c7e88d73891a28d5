//! User-facing texts. Everything here is sent with the HTML parse mode, so
//! dynamic parts go through [`escape`].

use teloxide::utils::html::escape;

use crate::Mode;

pub const SEARCHING: &str = "Searching for your song on YouTube...";
pub const PICK_A_TRACK: &str = "Here is what I found. Pick a track:";
pub const GETTING_TRACK: &str = "Getting your track...";

pub const NO_RESULTS: &str = "Sorry, I couldn't find any results for that query.";
pub const NO_AUDIO: &str = "Sorry, no audio streams found for this video.";
pub const UNAVAILABLE: &str = "Sorry, this video is unavailable.";
pub const UNEXPECTED: &str = "An unexpected error occurred while processing your request.";
pub const INVALID_SELECTION: &str = "That selection is no longer valid.";
pub const BUSY: &str = "I'm busy with other requests right now, please try again in a minute.";

const CHOICE_LABEL_MAX_CHARS: usize = 60;

pub fn found(title: &str) -> String {
    format!("Found it! Getting audio for: <b>{}</b>.", escape(title))
}

pub fn sent(title: &str) -> String {
    format!("Sent: <b>{}</b>", escape(title))
}

pub fn lookup_failed(detail: &str) -> String {
    format!("Sorry, YouTube lookup failed: {}", escape(detail))
}

/// Button labels are plain text; long titles are cut on a char boundary.
pub fn choice_label(title: &str) -> String {
    let title = title.trim();
    if title.chars().count() <= CHOICE_LABEL_MAX_CHARS {
        return title.to_string();
    }
    let mut label = title
        .chars()
        .take(CHOICE_LABEL_MAX_CHARS - 1)
        .collect::<String>();
    label.push('…');
    label
}

pub fn help(mode: Mode) -> String {
    let how = match mode {
        Mode::AutoPick => {
            "Note: I'll search for the top result on YouTube and download the highest quality audio stream."
        }
        Mode::Choose { .. } => {
            "Note: I'll show you the top results on YouTube, tap one and I'll send you its highest quality audio stream."
        }
    };

    format!(
        "Hello! I am a YouTube Music Bot.\n\
         Just send me the name of a song or artist, and I'll send you the audio.\n\n\
         Example: <b>Rema Calm Down</b>\n\n\
         {how}"
    )
}
