//! readaloud - Read PDF documents aloud with PlayAI text-to-speech
//!
//! Splits page text into speakable chunks, synthesizes them in order
//! through the PlayAI API, and plays them back gaplessly.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod chunker;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod document;
pub mod error;
pub mod playback;
pub mod sequencer;
pub mod session;
pub mod tts;

// Core traits (document → chunk → synthesize → play)
pub use document::DocumentSource;
pub use playback::AudioOutput;
pub use tts::Synthesizer;

// Pipeline
pub use chunker::{ChunkerConfig, TextChunk};
pub use playback::{AudioSegment, Player, PlayerEvent, PlayerState};
pub use sequencer::{CancelToken, RunEvent, RunHandle, RunSummary, Sequencer, SpeechSettings};
pub use session::{PageProgress, Session, SessionEvent};

// Error handling
pub use error::{ReadaloudError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }
}
