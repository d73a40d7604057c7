//! rodio-backed audio output.
//!
//! Binds one decoded segment at a time to a paused sink. Kept behind the
//! [`AudioOutput`] trait so the player logic stays testable without an
//! audio device.

use crate::error::{ReadaloudError, Result};
use crate::playback::{AudioOutput, AudioSegment};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::time::Duration;

/// Audio output on the default system device.
pub struct RodioOutput {
    // The stream must outlive every sink created from its handle.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    duration: Option<Duration>,
    current_index: usize,
}

impl RodioOutput {
    /// Opens the default audio output device.
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().map_err(|e| {
            ReadaloudError::Other(format!("failed to open audio output device: {e}"))
        })?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            duration: None,
            current_index: 0,
        })
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, segment: &AudioSegment) -> Result<()> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = None;
        self.current_index = segment.index;

        let decoder =
            Decoder::new(Cursor::new(segment.bytes().to_vec())).map_err(|e| {
                ReadaloudError::Playback {
                    index: segment.index,
                    message: format!("decode failed: {e}"),
                }
            })?;
        self.duration = decoder.total_duration();

        let sink = Sink::try_new(&self.handle).map_err(|e| ReadaloudError::Playback {
            index: segment.index,
            message: format!("failed to create sink: {e}"),
        })?;
        sink.pause();
        sink.append(decoder);
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        match &self.sink {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(ReadaloudError::Playback {
                index: self.current_index,
                message: "no segment bound".to_string(),
            }),
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.duration = None;
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map(|sink| sink.get_pos())
            .unwrap_or(Duration::ZERO)
    }

    fn duration(&self) -> Option<Duration> {
        self.sink.as_ref().and(self.duration)
    }

    fn finished(&self) -> bool {
        self.sink.as_ref().map_or(true, |sink| sink.empty())
    }
}
