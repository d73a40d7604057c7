//! Default configuration constants for readaloud.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

use std::time::Duration;

/// Default PlayAI TTS endpoint.
pub const TTS_ENDPOINT: &str = "https://api.play.ai/api/v1/tts/stream";

/// Model identifier sent with every synthesis request.
pub const TTS_MODEL: &str = "PlayDialog";

/// Minimum chunk size in characters.
///
/// A word-boundary break inside an oversized sentence is only taken if it
/// leaves at least this much text in the emitted chunk, so chunks do not
/// degenerate into fragments the voice reads with odd prosody.
pub const MIN_CHUNK_SIZE: usize = 100;

/// Maximum chunk size in characters.
///
/// 200 characters is roughly one spoken sentence and keeps per-request
/// synthesis latency low enough that playback can start quickly.
pub const MAX_CHUNK_SIZE: usize = 200;

/// Text shorter than `SINGLE_CHUNK_FACTOR × max_chunk_size` is kept as one
/// chunk. Splitting a short page buys nothing and adds request overhead.
pub const SINGLE_CHUNK_FACTOR: f32 = 1.5;

/// Default synthesis temperature (0.0 to 1.0).
pub const TEMPERATURE: f32 = 0.5;

/// Default playback speed multiplier (0.5 to 2.0).
pub const SPEED: f32 = 1.0;

/// Hard client-side timeout for one synthesis request.
///
/// The in-flight request is aborted when this expires; the service is slow
/// enough on long chunks that anything shorter produces spurious timeouts.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Pause between consecutive synthesis requests.
///
/// Keeps a generation run from bursting into the service's rate limiter.
pub const INTER_REQUEST_DELAY: Duration = Duration::from_millis(50);

/// How close to the reported duration playback must get before the
/// position-based fallback declares the track finished.
///
/// Backstop for outputs that miss the natural end signal. Tuning constant,
/// configurable via `[playback] end_window_ms`.
pub const END_WINDOW: Duration = Duration::from_millis(100);

/// Minimum real play time before the position-based fallback may fire.
///
/// Right after a new track is bound, position and duration can briefly agree
/// at zero; requiring half a second of actual playback filters that out.
pub const MIN_PLAY_TIME: Duration = Duration::from_millis(500);

/// Cadence at which the session polls the player for end-of-track detection.
pub const PLAYER_TICK: Duration = Duration::from_millis(50);

/// Environment variable holding the PlayAI API key.
pub const API_KEY_ENV: &str = "PLAYAI_API_KEY";

/// Environment variable holding the PlayAI user id.
pub const USER_ID_ENV: &str = "PLAYAI_USER_ID";
