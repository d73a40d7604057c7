//! Audio playback: segments, the output-device seam, and the player
//! state machine that provides gapless multi-segment playback.

pub mod output;
pub mod player;
pub mod rodio;
pub mod segment;

pub use output::{AudioOutput, MockOutput};
pub use player::{EndDetection, Player, PlayerEvent, PlayerState};
pub use self::rodio::RodioOutput;
pub use segment::AudioSegment;
