//! End-to-end pipeline tests: document text through chunking, synthesis,
//! and playback with a mock audio output.

use async_trait::async_trait;
use readaloud::chunker::ChunkerConfig;
use readaloud::document::TextDocument;
use readaloud::playback::{MockOutput, Player, PlayerEvent, PlayerState};
use readaloud::sequencer::{Sequencer, SequencerConfig, SpeechSettings};
use readaloud::session::{Session, SessionEvent};
use readaloud::tts::{SpeechRequest, Synthesizer};
use readaloud::{AudioSegment, ReadaloudError};
use std::sync::Arc;
use std::time::Duration;

/// Synthesizer stub that echoes the request text as audio bytes and can be
/// scripted to fail specific chunks.
struct ScriptedSynthesizer {
    fail_indices: Vec<usize>,
}

impl ScriptedSynthesizer {
    fn ok() -> Self {
        Self {
            fail_indices: Vec::new(),
        }
    }

    fn failing(indices: &[usize]) -> Self {
        Self {
            fail_indices: indices.to_vec(),
        }
    }
}

#[async_trait]
impl Synthesizer for ScriptedSynthesizer {
    async fn synthesize(
        &self,
        index: usize,
        request: &SpeechRequest,
    ) -> readaloud::Result<AudioSegment> {
        if self.fail_indices.contains(&index) {
            return Err(ReadaloudError::Service {
                status: 500,
                body: "synthesis unavailable".to_string(),
            });
        }
        Ok(AudioSegment::new(index, request.text.as_bytes().to_vec()))
    }
}

fn long_page() -> String {
    // Long enough to split into several chunks with the default bounds
    let sentence = "The quick brown fox jumps over the lazy dog near the riverbank. ";
    sentence.repeat(12)
}

fn build_session(text: &str, synthesizer: Arc<dyn Synthesizer>) -> (Session, MockOutput) {
    let output = MockOutput::new().with_duration(Duration::from_secs(4));
    let player = Player::new(Box::new(output.clone()));
    let sequencer = Sequencer::with_config(
        synthesizer,
        SequencerConfig {
            inter_request_delay: Duration::ZERO,
        },
    );
    let session = Session::new(
        Box::new(TextDocument::from_string("book.txt", text)),
        sequencer,
        player,
        ChunkerConfig::default(),
        SpeechSettings::default(),
    );
    (session, output)
}

async fn pump_until_generation_done(session: &mut Session) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    for _ in 0..400 {
        events.extend(session.pump());
        if session.generation_done() {
            return events;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("generation did not finish");
}

#[tokio::test]
async fn full_page_reads_through_all_segments() {
    let (mut session, output) = build_session(&long_page(), Arc::new(ScriptedSynthesizer::ok()));
    session.open_page(1).unwrap();

    pump_until_generation_done(&mut session).await;
    let total = session.player().total_segments();
    assert!(total >= 3, "expected several segments, got {total}");
    assert_eq!(session.player().state(), PlayerState::Playing);
    assert_eq!(session.progress().percent(), 100);

    // Finish each segment in turn; the player advances gaplessly in order
    let mut advanced = Vec::new();
    let mut finished = false;
    for _ in 0..total {
        output.finish_current();
        for event in session.pump() {
            match event {
                SessionEvent::Playback(PlayerEvent::Advanced(index)) => advanced.push(index),
                SessionEvent::Playback(PlayerEvent::Finished) => finished = true,
                _ => {}
            }
        }
    }

    assert!(finished, "last segment should finish the page");
    assert_eq!(advanced, (1..total).collect::<Vec<_>>());
    assert_eq!(session.player().state(), PlayerState::Ended);
    // Every segment was bound exactly once, in order
    assert_eq!(output.loads(), (0..total).collect::<Vec<_>>());
}

#[tokio::test]
async fn failed_chunk_is_skipped_playback_continues() {
    let (mut session, _output) =
        build_session(&long_page(), Arc::new(ScriptedSynthesizer::failing(&[1])));
    session.open_page(1).unwrap();

    let events = pump_until_generation_done(&mut session).await;
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::ChunkFailed { index: 1, .. })));

    let progress = session.progress();
    assert_eq!(progress.failed, 1);
    assert_eq!(progress.processed, progress.total);
    // Remaining chunks still play
    assert_eq!(session.player().total_segments(), progress.total - 1);
    assert_eq!(session.player().state(), PlayerState::Playing);
}

#[tokio::test]
async fn first_segment_starts_before_generation_completes() {
    let (mut session, output) = build_session(&long_page(), Arc::new(ScriptedSynthesizer::ok()));
    session.open_page(1).unwrap();

    // Pump until the first segment is queued, then check playback started
    // even though later chunks are still outstanding
    let mut saw_first = false;
    for _ in 0..400 {
        for event in session.pump() {
            if matches!(event, SessionEvent::SegmentQueued(0)) {
                saw_first = true;
            }
        }
        if saw_first {
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert!(saw_first);
    assert_eq!(session.player().state(), PlayerState::Playing);
    assert!(output.playing());

    pump_until_generation_done(&mut session).await;
}

#[tokio::test]
async fn switching_pages_discards_previous_audio() {
    let page_one = long_page();
    let text = format!("{page_one}\x0cSecond page, much shorter than the first.");
    let (mut session, _output) = build_session(&text, Arc::new(ScriptedSynthesizer::ok()));

    session.open_page(1).unwrap();
    pump_until_generation_done(&mut session).await;
    let first_total = session.player().total_segments();
    assert!(first_total >= 3);

    session.open_page(2).unwrap();
    assert_eq!(session.player().total_segments(), 0);
    pump_until_generation_done(&mut session).await;

    // Only the second page's segments are queued
    assert_eq!(session.player().total_segments(), 1);
    assert_eq!(session.current_page(), 2);
}

#[tokio::test]
async fn pause_and_resume_keep_position() {
    let (mut session, output) = build_session(&long_page(), Arc::new(ScriptedSynthesizer::ok()));
    session.open_page(1).unwrap();
    pump_until_generation_done(&mut session).await;

    assert_eq!(session.player().state(), PlayerState::Playing);
    session.pause();
    assert_eq!(session.player().state(), PlayerState::Paused);
    assert!(!output.playing());

    session.play().unwrap();
    assert_eq!(session.player().state(), PlayerState::Playing);
    // Still on the same segment; pausing never rebinds
    assert_eq!(session.player().current_index(), 0);
}

#[tokio::test]
async fn reset_returns_to_first_segment() {
    let (mut session, output) = build_session(&long_page(), Arc::new(ScriptedSynthesizer::ok()));
    session.open_page(1).unwrap();
    pump_until_generation_done(&mut session).await;

    // Advance one segment, then reset
    output.finish_current();
    session.pump();
    assert_eq!(session.player().current_index(), 1);

    session.reset().unwrap();
    assert_eq!(session.player().current_index(), 0);
    // Was playing before reset, so playback resumes from the top
    assert_eq!(session.player().state(), PlayerState::Playing);
}
