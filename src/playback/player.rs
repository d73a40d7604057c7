//! Gapless multi-segment player.
//!
//! Owns the ordered segment queue and the authoritative playback state.
//! Segments are appended incrementally while earlier ones play; on natural
//! end of a track the player binds the next segment and keeps playing.
//!
//! End-of-track detection uses two independent signals: the output's natural
//! finished signal, and a position-vs-duration fallback for outputs that
//! miss it. The fallback is debounced so a freshly bound track is never
//! declared finished before it has actually played.

use crate::defaults;
use crate::error::{ReadaloudError, Result};
use crate::playback::{AudioOutput, AudioSegment};
use std::time::{Duration, Instant};

/// Playback states. The player is the single owner of this state; other
/// components observe transitions through [`PlayerEvent`] and accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No segments appended yet.
    Empty,
    /// Segments present, first one bound, not playing.
    Ready,
    Playing,
    Paused,
    /// Natural end reached on the last segment.
    Ended,
}

/// Tuning for end-of-track detection.
///
/// These are carried as configuration rather than hard-coded: the values are
/// inherited tuning constants, not validated laws.
#[derive(Debug, Clone)]
pub struct EndDetection {
    /// How close to the reported duration the position must get before the
    /// fallback declares the track finished.
    pub end_window: Duration,
    /// Minimum real play time before the fallback may fire.
    pub min_play_time: Duration,
}

impl Default for EndDetection {
    fn default() -> Self {
        Self {
            end_window: defaults::END_WINDOW,
            min_play_time: defaults::MIN_PLAY_TIME,
        }
    }
}

/// Transitions surfaced to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Auto-advanced to the segment at this index.
    Advanced(usize),
    /// Natural end reached on the last segment.
    Finished,
    /// A segment failed to play after one reload attempt. Auto-advance is
    /// halted; the segment is not silently skipped.
    Error { index: usize, message: String },
}

/// Player over an ordered queue of audio segments.
pub struct Player {
    output: Box<dyn AudioOutput>,
    segments: Vec<AudioSegment>,
    current: usize,
    state: PlayerState,
    end_detection: EndDetection,
    /// Guard against re-entrant play while a bind/play operation is in
    /// flight.
    loading: bool,
    /// A segment is currently bound to the output.
    bound: bool,
    /// Wall-clock start of the current segment's playback, for the
    /// fallback debounce.
    play_started: Option<Instant>,
    /// The current segment has already used its one automatic reload.
    reloaded: bool,
    /// The current segment failed twice; auto-advance is halted until a
    /// manual play/reset.
    failed: bool,
}

impl Player {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self::with_end_detection(output, EndDetection::default())
    }

    pub fn with_end_detection(output: Box<dyn AudioOutput>, end_detection: EndDetection) -> Self {
        Self {
            output,
            segments: Vec::new(),
            current: 0,
            state: PlayerState::Empty,
            end_detection,
            loading: false,
            bound: false,
            play_started: None,
            reloaded: false,
            failed: false,
        }
    }

    /// Appends a segment to the queue.
    ///
    /// The first append binds the segment and moves `Empty → Ready`. Later
    /// appends only extend the queue — current playback is never
    /// interrupted.
    ///
    /// `Ended` is sticky: a segment appended after playback has outrun
    /// generation stays queued and only becomes reachable through
    /// [`reset`](Self::reset). Auto-advance never restarts a finished
    /// queue on its own.
    pub fn append(&mut self, segment: AudioSegment) -> Result<()> {
        self.segments.push(segment);
        if self.state == PlayerState::Empty {
            self.current = 0;
            self.bind_current()?;
            self.state = PlayerState::Ready;
        }
        Ok(())
    }

    /// Starts or resumes playback of the current segment.
    ///
    /// No-op while already playing, while a play operation is in flight, or
    /// when there is nothing to play. A playback failure triggers one
    /// automatic reload of the segment before the error is surfaced.
    pub fn play(&mut self) -> Result<()> {
        if self.loading {
            return Ok(());
        }
        match self.state {
            PlayerState::Ready | PlayerState::Paused => {
                // Manual play clears a halted state and retries the segment.
                self.failed = false;
                match self.start_current_with_reload() {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        self.failed = true;
                        self.state = PlayerState::Paused;
                        Err(e)
                    }
                }
            }
            PlayerState::Playing | PlayerState::Empty | PlayerState::Ended => Ok(()),
        }
    }

    /// Pauses playback, keeping position and the bound segment.
    pub fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.output.pause();
            self.state = PlayerState::Paused;
        }
    }

    /// Stops output and returns the cursor to segment 0.
    ///
    /// If playback was active, playback of the first segment resumes once
    /// it is bound again — binding is synchronous-complete, so there is no
    /// settle delay.
    pub fn reset(&mut self) -> Result<()> {
        let was_playing = self.state == PlayerState::Playing;
        self.output.stop();
        self.bound = false;
        self.current = 0;
        self.reloaded = false;
        self.failed = false;
        self.play_started = None;

        if self.segments.is_empty() {
            self.state = PlayerState::Empty;
            return Ok(());
        }

        self.state = PlayerState::Ready;
        if was_playing {
            self.play()?;
        } else {
            self.bind_current()?;
        }
        Ok(())
    }

    /// Stops output and drops every segment, freeing their buffers.
    pub fn clear(&mut self) {
        self.output.stop();
        self.segments.clear();
        self.bound = false;
        self.current = 0;
        self.state = PlayerState::Empty;
        self.play_started = None;
        self.reloaded = false;
        self.failed = false;
    }

    /// Polls end-of-track detection and auto-advances.
    ///
    /// Call at a steady cadence while playing. Returns a transition event
    /// when one occurred.
    pub fn tick(&mut self) -> Option<PlayerEvent> {
        if self.state != PlayerState::Playing || self.failed {
            return None;
        }
        if self.output.finished() || self.near_end() {
            self.advance()
        } else {
            None
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Index of the segment the cursor is on.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total_segments(&self) -> usize {
        self.segments.len()
    }

    /// True once at least one segment is appended and bound.
    pub fn is_ready(&self) -> bool {
        self.state != PlayerState::Empty
    }

    /// True while a bind/play operation is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Position-vs-duration fallback, debounced by real elapsed play time.
    fn near_end(&self) -> bool {
        let Some(duration) = self.output.duration() else {
            return false;
        };
        if duration.is_zero() {
            return false;
        }
        let position = self.output.position();
        if position.is_zero() || position + self.end_detection.end_window < duration {
            return false;
        }
        self.play_started
            .is_some_and(|started| started.elapsed() >= self.end_detection.min_play_time)
    }

    /// Moves to the next segment, or ends the queue on the last one.
    fn advance(&mut self) -> Option<PlayerEvent> {
        if self.current + 1 < self.segments.len() {
            self.current += 1;
            self.reloaded = false;
            self.bound = false;
            match self.start_current_with_reload() {
                Ok(()) => Some(PlayerEvent::Advanced(self.current)),
                Err(e) => {
                    // Halt here rather than skipping content unnoticed.
                    self.failed = true;
                    self.state = PlayerState::Paused;
                    Some(PlayerEvent::Error {
                        index: self.current,
                        message: e.to_string(),
                    })
                }
            }
        } else {
            self.output.stop();
            self.bound = false;
            self.state = PlayerState::Ended;
            self.play_started = None;
            Some(PlayerEvent::Finished)
        }
    }

    /// Binds the current segment if needed and starts playing it, with one
    /// automatic reload on failure.
    fn start_current_with_reload(&mut self) -> Result<()> {
        match self.start_current() {
            Ok(()) => {
                self.reloaded = false;
                Ok(())
            }
            Err(_) if !self.reloaded => {
                self.reloaded = true;
                self.bound = false;
                self.start_current()
            }
            Err(e) => Err(e),
        }
    }

    fn start_current(&mut self) -> Result<()> {
        if !self.bound {
            self.bind_current()?;
        }
        self.loading = true;
        let result = self.output.play();
        self.loading = false;
        result?;
        self.state = PlayerState::Playing;
        self.play_started = Some(Instant::now());
        Ok(())
    }

    /// One bind attempt of the current segment; records the reported
    /// duration on success.
    fn bind_current(&mut self) -> Result<()> {
        let segment = self
            .segments
            .get(self.current)
            .ok_or_else(|| ReadaloudError::Playback {
                index: self.current,
                message: "no segment at cursor".to_string(),
            })?;

        self.loading = true;
        let result = self.output.load(segment);
        self.loading = false;
        result?;

        self.bound = true;
        if let Some(duration) = self.output.duration() {
            self.segments[self.current].duration = Some(duration);
        }
        Ok(())
    }
}
