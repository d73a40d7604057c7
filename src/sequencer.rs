//! Generation sequencer: drives chunk synthesis strictly in order.
//!
//! Chunk 0 is delivered as soon as it resolves so playback can start while
//! the rest of the page is still being synthesized — perceived startup
//! latency is the cost of one chunk, not the whole page. Later chunks are
//! processed one at a time in ascending order, which both preserves playback
//! ordering and bounds the load on the remote service.
//!
//! Per-chunk failures are reported and skipped; a single bad chunk must not
//! silence the rest of the page. Cancellation is cooperative: checked before
//! each request and after each resolve, and a segment that resolves after
//! cancellation is dropped instead of delivered.

use crate::chunker::TextChunk;
use crate::defaults;
use crate::playback::AudioSegment;
use crate::tts::{SpeechRequest, Synthesizer, default_voice};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cooperative cancellation token.
///
/// Cloned into the run task and checked at each suspension point. `cancel`
/// is idempotent; once set the token never clears.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Session-wide voice settings, applied uniformly to every chunk of a run.
#[derive(Debug, Clone)]
pub struct SpeechSettings {
    /// Voice identifier from the catalog.
    pub voice: String,
    /// Sampling temperature, 0.0 to 1.0.
    pub temperature: f32,
    /// Playback speed multiplier, 0.5 to 2.0.
    pub speed: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            voice: default_voice().id.to_string(),
            temperature: defaults::TEMPERATURE,
            speed: defaults::SPEED,
        }
    }
}

/// Events published by a generation run, in order.
#[derive(Debug)]
pub enum RunEvent {
    /// Chunk 0 resolved — playback can start now.
    FirstReady(AudioSegment),
    /// A later chunk resolved. Segments arrive in ascending index order.
    SegmentReady(AudioSegment),
    /// A chunk failed and was skipped; the run continues.
    ChunkFailed { index: usize, error: String },
    /// The run finished: all chunks attempted, or cancellation observed.
    /// Sent exactly once, always last.
    Done(RunSummary),
}

/// Final accounting for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Chunks for which a synthesis request was issued.
    pub attempted: usize,
    /// Chunks that produced a delivered segment.
    pub completed: usize,
    /// Chunks that failed and were skipped.
    pub failed: usize,
    pub cancelled: bool,
}

/// Configuration for the sequencer.
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Pause between consecutive synthesis requests, to avoid rate-limit
    /// bursts.
    pub inter_request_delay: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            inter_request_delay: defaults::INTER_REQUEST_DELAY,
        }
    }
}

/// Handle to a running generation. Cancellation is cooperative — the
/// in-flight request is allowed to finish, but its result is discarded.
pub struct RunHandle {
    cancel: CancelToken,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Requests cancellation. Idempotent; returns immediately.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the run task to wind down.
    pub async fn wait(self) {
        self.task.await.ok();
    }
}

/// Spawns generation runs against a synthesizer.
pub struct Sequencer {
    synthesizer: Arc<dyn Synthesizer>,
    config: SequencerConfig,
}

impl Sequencer {
    pub fn new(synthesizer: Arc<dyn Synthesizer>) -> Self {
        Self::with_config(synthesizer, SequencerConfig::default())
    }

    pub fn with_config(synthesizer: Arc<dyn Synthesizer>, config: SequencerConfig) -> Self {
        Self { synthesizer, config }
    }

    /// Starts a run over `chunks`, publishing [`RunEvent`]s to `events`.
    ///
    /// One request is in flight at a time, strictly in ascending chunk
    /// order. The returned handle cancels the run cooperatively.
    pub fn spawn(
        &self,
        chunks: Vec<TextChunk>,
        settings: SpeechSettings,
        events: mpsc::Sender<RunEvent>,
    ) -> RunHandle {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let synthesizer = Arc::clone(&self.synthesizer);
        let delay = self.config.inter_request_delay;

        let task = tokio::spawn(async move {
            let total = chunks.len();
            let mut summary = RunSummary {
                attempted: 0,
                completed: 0,
                failed: 0,
                cancelled: false,
            };

            for chunk in &chunks {
                if token.is_cancelled() {
                    break;
                }

                let request = SpeechRequest {
                    text: chunk.content.clone(),
                    voice: settings.voice.clone(),
                    temperature: settings.temperature,
                    speed: settings.speed,
                };

                summary.attempted += 1;
                match synthesizer.synthesize(chunk.index, &request).await {
                    Ok(segment) => {
                        if token.is_cancelled() {
                            // Resolved after cancellation: drop, never deliver
                            drop(segment);
                            break;
                        }
                        summary.completed += 1;
                        let event = if chunk.index == 0 {
                            RunEvent::FirstReady(segment)
                        } else {
                            RunEvent::SegmentReady(segment)
                        };
                        if events.send(event).await.is_err() {
                            // Receiver gone — nobody is listening anymore
                            return;
                        }
                    }
                    Err(e) => {
                        summary.failed += 1;
                        if token.is_cancelled() {
                            break;
                        }
                        let failed = RunEvent::ChunkFailed {
                            index: chunk.index,
                            error: e.to_string(),
                        };
                        if events.send(failed).await.is_err() {
                            return;
                        }
                    }
                }

                if chunk.index + 1 < total && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            summary.cancelled = token.is_cancelled();
            events.send(RunEvent::Done(summary)).await.ok();
        });

        RunHandle { cancel, task }
    }
}
