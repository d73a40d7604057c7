//! Output-device seam for the player.

use crate::error::Result;
use crate::playback::AudioSegment;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Trait for the audio output device behind the player.
///
/// This trait allows swapping implementations (real rodio device vs mock).
/// `load` binds exactly one segment at a time and returns only once the
/// resource is ready to play, so callers never need a settle delay after a
/// track switch.
pub trait AudioOutput {
    /// Decodes and binds a segment, replacing any previously bound one.
    /// The output is left paused.
    fn load(&mut self, segment: &AudioSegment) -> Result<()>;

    /// Starts or resumes output of the bound segment.
    fn play(&mut self) -> Result<()>;

    /// Pauses output, keeping the bound segment and its position.
    fn pause(&mut self);

    /// Stops output and unbinds the segment.
    fn stop(&mut self);

    /// Current playback position within the bound segment.
    fn position(&self) -> Duration;

    /// Total duration of the bound segment, when the decoder reports one.
    fn duration(&self) -> Option<Duration>;

    /// True once the bound segment has played to its natural end.
    fn finished(&self) -> bool;
}

/// Scripted state backing a [`MockOutput`].
#[derive(Debug, Default)]
struct MockState {
    /// Indices of segments loaded, in order.
    loads: Vec<usize>,
    bound: Option<usize>,
    playing: bool,
    finished: bool,
    position: Duration,
    duration: Option<Duration>,
    /// Remaining load failures per segment index.
    load_failures: Vec<(usize, usize)>,
    /// Remaining play failures.
    play_failures: usize,
}

/// Mock output for testing the player without an audio device.
///
/// Cloning returns a handle to the same scripted state, so tests can keep a
/// handle while the player owns the output.
#[derive(Debug, Clone, Default)]
pub struct MockOutput {
    state: Arc<Mutex<MockState>>,
}

#[allow(clippy::unwrap_used)]
impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the duration reported for every loaded segment.
    pub fn with_duration(self, duration: Duration) -> Self {
        self.state.lock().unwrap().duration = Some(duration);
        self
    }

    /// Scripts the next `times` loads of segment `index` to fail.
    pub fn fail_loads(&self, index: usize, times: usize) {
        self.state.lock().unwrap().load_failures.push((index, times));
    }

    /// Scripts the next `times` play calls to fail.
    pub fn fail_plays(&self, times: usize) {
        self.state.lock().unwrap().play_failures = times;
    }

    /// Marks the bound segment as naturally ended.
    pub fn finish_current(&self) {
        let mut state = self.state.lock().unwrap();
        state.finished = true;
        state.playing = false;
    }

    /// Advances the reported playback position.
    pub fn advance_position(&self, by: Duration) {
        self.state.lock().unwrap().position += by;
    }

    /// Returns the indices of all segments loaded so far, in order.
    pub fn loads(&self) -> Vec<usize> {
        self.state.lock().unwrap().loads.clone()
    }

    /// Returns the currently bound segment index, if any.
    pub fn bound(&self) -> Option<usize> {
        self.state.lock().unwrap().bound
    }

    /// Returns true while the mock is "playing".
    pub fn playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }
}

#[allow(clippy::unwrap_used)]
impl AudioOutput for MockOutput {
    fn load(&mut self, segment: &AudioSegment) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.loads.push(segment.index);

        if let Some(entry) = state
            .load_failures
            .iter_mut()
            .find(|(index, times)| *index == segment.index && *times > 0)
        {
            entry.1 -= 1;
            return Err(crate::error::ReadaloudError::Playback {
                index: segment.index,
                message: "scripted load failure".to_string(),
            });
        }

        state.bound = Some(segment.index);
        state.playing = false;
        state.finished = false;
        state.position = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.play_failures > 0 {
            state.play_failures -= 1;
            return Err(crate::error::ReadaloudError::Playback {
                index: state.bound.unwrap_or(0),
                message: "scripted play failure".to_string(),
            });
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().playing = false;
    }

    fn stop(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.bound = None;
        state.playing = false;
        state.finished = false;
        state.position = Duration::ZERO;
    }

    fn position(&self) -> Duration {
        self.state.lock().unwrap().position
    }

    fn duration(&self) -> Option<Duration> {
        let state = self.state.lock().unwrap();
        state.bound.and_then(|_| state.duration)
    }

    fn finished(&self) -> bool {
        self.state.lock().unwrap().finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_load_and_play() {
        let handle = MockOutput::new();
        let mut output = handle.clone();

        let segment = AudioSegment::new(0, vec![0u8; 16]);
        output.load(&segment).unwrap();
        assert_eq!(handle.bound(), Some(0));
        assert!(!handle.playing());

        output.play().unwrap();
        assert!(handle.playing());

        output.stop();
        assert_eq!(handle.bound(), None);
    }

    #[test]
    fn test_mock_scripted_load_failure() {
        let handle = MockOutput::new();
        let mut output = handle.clone();
        handle.fail_loads(1, 1);

        let segment = AudioSegment::new(1, vec![0u8; 16]);
        assert!(output.load(&segment).is_err());
        // Second attempt succeeds
        assert!(output.load(&segment).is_ok());
        assert_eq!(handle.loads(), vec![1, 1]);
    }

    #[test]
    fn test_mock_finish_current() {
        let handle = MockOutput::new();
        let mut output = handle.clone();
        output.load(&AudioSegment::new(0, vec![0u8; 16])).unwrap();
        output.play().unwrap();
        assert!(!output.finished());

        handle.finish_current();
        assert!(output.finished());
    }
}
