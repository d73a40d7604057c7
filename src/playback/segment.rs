//! Synthesized audio segments.

use std::time::Duration;

/// The audio result of synthesizing one text chunk.
///
/// The segment owns its encoded byte payload. Dropping the segment frees the
/// buffer, so release is deterministic: the player drops all segments on
/// `clear()` and the sequencer drops undelivered segments on cancellation.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Chunk index this segment was synthesized from.
    pub index: usize,
    /// Decoded-on-demand playback duration, filled in once the segment has
    /// been bound to an output.
    pub duration: Option<Duration>,
    bytes: Vec<u8>,
}

impl AudioSegment {
    /// Wraps a synthesized payload. `bytes` must be non-empty — the speech
    /// client rejects empty payloads before constructing a segment.
    pub fn new(index: usize, bytes: Vec<u8>) -> Self {
        Self {
            index,
            duration: None,
            bytes,
        }
    }

    /// Returns the encoded audio payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_owns_payload() {
        let segment = AudioSegment::new(3, vec![1, 2, 3, 4]);
        assert_eq!(segment.index, 3);
        assert_eq!(segment.len(), 4);
        assert_eq!(segment.bytes(), &[1, 2, 3, 4]);
        assert!(segment.duration.is_none());
    }
}
