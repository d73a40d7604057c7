//! Session controller: wires a document, the generation sequencer, and the
//! player into one page-at-a-time reading session.
//!
//! At most one generation run and one player exist at a time. Opening a
//! page cancels the previous run and clears the player before the new run
//! starts, so segments from different pages can never interleave.

use crate::chunker::{self, ChunkerConfig};
use crate::document::{fallback_narration, DocumentSource};
use crate::error::Result;
use crate::playback::{Player, PlayerEvent};
use crate::sequencer::{RunEvent, RunHandle, RunSummary, Sequencer, SpeechSettings};
use tokio::sync::mpsc;

/// Generation progress for the current page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageProgress {
    /// Chunks the current page split into.
    pub total: usize,
    /// Chunks resolved so far, delivered or failed.
    pub processed: usize,
    /// Chunks that failed and were skipped.
    pub failed: usize,
}

impl PageProgress {
    /// Whole-number percentage of chunks processed.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.processed as f64 / self.total as f64) * 100.0).round() as u8
    }
}

/// Notable happenings drained from the active run.
#[derive(Debug)]
pub enum SessionEvent {
    /// A segment was appended to the player queue.
    SegmentQueued(usize),
    /// A chunk failed synthesis and was skipped.
    ChunkFailed { index: usize, error: String },
    /// The generation run for the current page finished.
    GenerationDone(RunSummary),
    /// The player transitioned (advance, finish, or playback error).
    Playback(PlayerEvent),
}

struct ActiveRun {
    handle: RunHandle,
    events: mpsc::Receiver<RunEvent>,
}

/// One reading session over one document.
pub struct Session {
    document: Box<dyn DocumentSource>,
    sequencer: Sequencer,
    player: Player,
    chunker_config: ChunkerConfig,
    settings: SpeechSettings,
    /// Start playback automatically once the first segment is ready.
    autoplay: bool,
    current_page: usize,
    progress: PageProgress,
    run: Option<ActiveRun>,
}

impl Session {
    pub fn new(
        document: Box<dyn DocumentSource>,
        sequencer: Sequencer,
        player: Player,
        chunker_config: ChunkerConfig,
        settings: SpeechSettings,
    ) -> Self {
        Self {
            document,
            sequencer,
            player,
            chunker_config,
            settings,
            autoplay: true,
            current_page: 0,
            progress: PageProgress::default(),
            run: None,
        }
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn document_name(&self) -> &str {
        self.document.name()
    }

    pub fn page_count(&self) -> usize {
        self.document.page_count()
    }

    /// Current page number, 1-based. Zero before the first `open_page`.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn progress(&self) -> PageProgress {
        self.progress
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// True once the run for the current page has reported done.
    pub fn generation_done(&self) -> bool {
        self.run.is_none() && self.current_page != 0
    }

    /// Opens `page`: cancels any in-flight run, clears the player queue,
    /// chunks the page text, and starts a fresh generation run.
    ///
    /// An empty extraction result is narrated with a deterministic
    /// stand-in rather than failing, so every page is speakable.
    pub fn open_page(&mut self, page: usize) -> Result<()> {
        let text = self.document.page_text(page)?;

        if let Some(run) = self.run.take() {
            run.handle.cancel();
            // Receiver drops here; anything still in flight is discarded
        }
        self.player.clear();

        let narration = if text.trim().is_empty() {
            fallback_narration(page, self.document.page_count(), self.document.name())
        } else {
            text
        };

        let chunks = chunker::split(&narration, &self.chunker_config)?;
        self.progress = PageProgress {
            total: chunks.len(),
            processed: 0,
            failed: 0,
        };
        self.current_page = page;

        let (tx, rx) = mpsc::channel(chunks.len().max(1));
        let handle = self.sequencer.spawn(chunks, self.settings.clone(), tx);
        self.run = Some(ActiveRun { handle, events: rx });
        Ok(())
    }

    /// Moves to the next page. Returns false when already on the last one.
    pub fn next_page(&mut self) -> Result<bool> {
        if self.current_page >= self.document.page_count() {
            return Ok(false);
        }
        self.open_page(self.current_page + 1)?;
        Ok(true)
    }

    /// Moves to the previous page. Returns false when already on page 1.
    pub fn prev_page(&mut self) -> Result<bool> {
        if self.current_page <= 1 {
            return Ok(false);
        }
        self.open_page(self.current_page - 1)?;
        Ok(true)
    }

    /// Starts or resumes playback. After a `stop`, regenerates the current
    /// page's audio first.
    pub fn play(&mut self) -> Result<()> {
        if self.player.total_segments() == 0 && self.run.is_none() && self.current_page != 0 {
            return self.open_page(self.current_page);
        }
        self.player.play()
    }

    /// Cancels any in-flight generation and drops all queued audio.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            run.handle.cancel();
        }
        self.player.clear();
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn toggle(&mut self) -> Result<()> {
        use crate::playback::PlayerState;
        match self.player.state() {
            PlayerState::Playing => {
                self.player.pause();
                Ok(())
            }
            _ => self.player.play(),
        }
    }

    pub fn reset(&mut self) -> Result<()> {
        self.player.reset()
    }

    /// Drains pending run events into the player and polls end-of-track
    /// detection. Call at a steady cadence from the driving loop.
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        let mut out = Vec::new();

        let mut run_finished = false;
        if let Some(run) = self.run.as_mut() {
            while let Ok(event) = run.events.try_recv() {
                match event {
                    RunEvent::FirstReady(segment) | RunEvent::SegmentReady(segment) => {
                        let index = segment.index;
                        let first = self.player.total_segments() == 0;
                        self.progress.processed += 1;
                        match self.player.append(segment) {
                            Ok(()) => {
                                out.push(SessionEvent::SegmentQueued(index));
                                if first && self.autoplay {
                                    if let Err(e) = self.player.play() {
                                        out.push(SessionEvent::Playback(PlayerEvent::Error {
                                            index,
                                            message: e.to_string(),
                                        }));
                                    }
                                }
                            }
                            Err(e) => {
                                out.push(SessionEvent::Playback(PlayerEvent::Error {
                                    index,
                                    message: e.to_string(),
                                }));
                            }
                        }
                    }
                    RunEvent::ChunkFailed { index, error } => {
                        self.progress.processed += 1;
                        self.progress.failed += 1;
                        out.push(SessionEvent::ChunkFailed { index, error });
                    }
                    RunEvent::Done(summary) => {
                        run_finished = true;
                        out.push(SessionEvent::GenerationDone(summary));
                    }
                }
            }
        }
        if run_finished {
            self.run = None;
        }

        if let Some(event) = self.player.tick() {
            out.push(SessionEvent::Playback(event));
        }

        out
    }
}
