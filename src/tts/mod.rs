//! Text-to-speech service integration: voice catalog and HTTP client.

pub mod client;
pub mod voices;

pub use client::{SpeechClient, SpeechClientConfig, SpeechRequest, Synthesizer};
pub use voices::{Voice, VOICES, default_voice, find_voice};
