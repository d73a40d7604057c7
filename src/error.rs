//! Error types for readaloud.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadaloudError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error(
        "PlayAI credentials missing — set PLAYAI_API_KEY and PLAYAI_USER_ID or fill the [api] config section"
    )]
    MissingCredentials,

    // Chunking errors
    #[error("No text to read: input is empty or whitespace-only")]
    EmptyInput,

    // Synthesis errors
    #[error("Speech request rejected: text is empty after trimming")]
    EmptyText,

    #[error("Speech request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Speech service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Speech service returned an empty audio payload")]
    EmptyAudio,

    #[error("Speech request failed: {message}")]
    Network { message: String },

    // Playback errors
    #[error("Playback failed for segment {index}: {message}")]
    Playback { index: usize, message: String },

    // Document errors
    #[error("Failed to read document {path}: {message}")]
    Document { path: String, message: String },

    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ReadaloudError>;
