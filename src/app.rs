//! Application wiring for the `readaloud` command.
//!
//! Builds the document, speech client, player, and session from CLI
//! arguments and configuration, then drives the session from a small
//! interactive loop on the main task. The loop stays on one thread because
//! the audio output handle is not `Send`.

use crate::chunker::ChunkerConfig;
use crate::cli::Cli;
use crate::config::Config;
use crate::defaults;
use crate::document::{DocumentSource, PdfDocument, TextDocument};
use crate::playback::{EndDetection, Player, PlayerEvent, PlayerState, RodioOutput};
use crate::sequencer::{Sequencer, SequencerConfig, SpeechSettings};
use crate::session::{Session, SessionEvent};
use crate::tts::{find_voice, SpeechClient, SpeechClientConfig};
use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use std::io::{BufRead, IsTerminal};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs the reading session described by the parsed CLI.
pub async fn run_read_command(config: Config, cli: Cli) -> Result<()> {
    let quiet = cli.quiet;
    let verbose = cli.verbose;

    let settings = resolve_settings(&config, &cli)?;
    let document = open_document(&cli)?;

    let client = SpeechClient::new(SpeechClientConfig {
        endpoint: config.api.endpoint.clone(),
        api_key: config.api.api_key.clone(),
        user_id: config.api.user_id.clone(),
        timeout_secs: config.api.timeout_secs,
    })
    .context("speech client setup failed (set PLAYAI_API_KEY and PLAYAI_USER_ID)")?;

    let sequencer = Sequencer::with_config(
        Arc::new(client),
        SequencerConfig {
            inter_request_delay: config.generation.inter_request_delay(),
        },
    );

    let output = RodioOutput::new().context("audio output unavailable")?;
    let player = Player::with_end_detection(
        Box::new(output),
        EndDetection {
            end_window: config.playback.end_window(),
            min_play_time: config.playback.min_play_time(),
        },
    );

    let chunker_config = ChunkerConfig {
        min_size: config.chunker.min_size,
        max_size: config.chunker.max_size,
        single_chunk_factor: config.chunker.single_chunk_factor,
    };

    let mut session = Session::new(document, sequencer, player, chunker_config, settings);
    session.set_autoplay(!cli.no_autoplay);

    if !quiet {
        eprintln!(
            "Reading {} ({} pages), starting at page {}",
            session.document_name().bold(),
            session.page_count(),
            cli.page
        );
    }
    session.open_page(cli.page)?;

    run_loop(&mut session, quiet, verbose).await
}

/// Merges config and CLI into the session-wide speech settings.
fn resolve_settings(config: &Config, cli: &Cli) -> Result<SpeechSettings> {
    let mut settings = SpeechSettings::default();

    let requested = cli.voice.as_deref().or_else(|| {
        if config.speech.voice.is_empty() {
            None
        } else {
            Some(config.speech.voice.as_str())
        }
    });
    if let Some(name) = requested {
        settings.voice = resolve_voice(name)?;
    }

    settings.temperature = cli.temperature.unwrap_or(config.speech.temperature);
    settings.speed = cli.speed.unwrap_or(config.speech.speed);

    if !(0.0..=1.0).contains(&settings.temperature) {
        bail!("temperature {} is outside 0.0..=1.0", settings.temperature);
    }
    if !(0.5..=2.0).contains(&settings.speed) {
        bail!("speed {} is outside 0.5..=2.0", settings.speed);
    }
    Ok(settings)
}

/// Accepts either a catalog voice name or a raw voice identifier.
fn resolve_voice(name: &str) -> Result<String> {
    if let Some(voice) = find_voice(name) {
        return Ok(voice.id.to_string());
    }
    if name.starts_with("s3://") {
        return Ok(name.to_string());
    }
    bail!("unknown voice '{name}'; run `readaloud voices` to list them");
}

fn open_document(cli: &Cli) -> Result<Box<dyn DocumentSource>> {
    if let Some(text) = &cli.text {
        return Ok(Box::new(TextDocument::from_string("text", text)));
    }
    let Some(path) = &cli.file else {
        bail!("no input: pass a FILE argument or --text");
    };
    if is_pdf(path) {
        Ok(Box::new(PdfDocument::open(path)?))
    } else {
        Ok(Box::new(TextDocument::from_file(path)?))
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Keys accepted on stdin while reading.
fn print_controls() {
    eprintln!(
        "{}",
        "Controls: [p]lay/pause  [r]estart page  [n]ext page  [b]ack page  [q]uit".dimmed()
    );
}

/// Drives the session: pumps generation and playback on a steady tick and
/// reacts to single-letter commands from stdin.
async fn run_loop(session: &mut Session, quiet: bool, verbose: u8) -> Result<()> {
    let interactive = std::io::stdin().is_terminal();
    if interactive && !quiet {
        print_controls();
    }

    let mut commands = spawn_stdin_reader(interactive);
    // Once stdin closes, stop polling the channel so the loop does not spin
    let mut stdin_closed = false;
    let mut tick = tokio::time::interval(defaults::PLAYER_TICK);
    // Track the end of the last page so batch mode knows when to exit
    let mut page_finished = false;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                for event in session.pump() {
                    render_event(&event, session, quiet, verbose);
                    if matches!(event, SessionEvent::Playback(PlayerEvent::Finished)) {
                        page_finished = true;
                    }
                }
                if !interactive
                    && session.generation_done()
                    && batch_complete(session.player().state(), page_finished, session.autoplay())
                {
                    break;
                }
            }
            command = commands.recv(), if !stdin_closed => {
                let Some(line) = command else {
                    stdin_closed = true;
                    if interactive {
                        // Ctrl+D on the terminal ends the session
                        break;
                    }
                    continue;
                };
                if handle_command(session, line.trim(), quiet)? {
                    break;
                }
                page_finished = false;
            }
            _ = tokio::signal::ctrl_c() => {
                if !quiet {
                    eprintln!("\nInterrupted");
                }
                break;
            }
        }
    }

    Ok(())
}

/// Decides whether a non-interactive run has nothing left to do once
/// generation has finished. `Empty` means every chunk failed; `Ended` plus
/// the finished flag means the last segment played out; `Ready` with
/// autoplay off means nothing will ever start playback.
fn batch_complete(state: PlayerState, page_finished: bool, autoplay: bool) -> bool {
    match state {
        PlayerState::Empty => true,
        PlayerState::Ended => page_finished,
        PlayerState::Ready => !autoplay,
        PlayerState::Playing | PlayerState::Paused => false,
    }
}

/// Applies one stdin command. Returns true when the session should end.
fn handle_command(session: &mut Session, command: &str, quiet: bool) -> Result<bool> {
    match command {
        "q" | "quit" => return Ok(true),
        "p" | "" => {
            session.toggle()?;
        }
        "r" => {
            session.reset()?;
            if !quiet {
                eprintln!("Restarting page {}", session.current_page());
            }
        }
        "n" => {
            if session.next_page()? {
                if !quiet {
                    eprintln!("Page {}", session.current_page());
                }
            } else if !quiet {
                eprintln!("Already on the last page");
            }
        }
        "b" => {
            if session.prev_page()? {
                if !quiet {
                    eprintln!("Page {}", session.current_page());
                }
            } else if !quiet {
                eprintln!("Already on the first page");
            }
        }
        other => {
            if !quiet {
                eprintln!("Unknown command '{other}'");
                print_controls();
            }
        }
    }
    Ok(false)
}

fn render_event(event: &SessionEvent, session: &Session, quiet: bool, verbose: u8) {
    match event {
        SessionEvent::SegmentQueued(index) => {
            if verbose >= 1 {
                eprintln!(
                    "chunk {} ready ({}%)",
                    index,
                    session.progress().percent()
                );
            }
        }
        SessionEvent::ChunkFailed { index, error } => {
            if !quiet {
                eprintln!("{}", format!("chunk {index} failed: {error}").yellow());
            }
        }
        SessionEvent::GenerationDone(summary) => {
            if !quiet {
                if summary.failed > 0 {
                    eprintln!(
                        "Page audio ready: {} of {} chunks ({} failed)",
                        summary.completed, summary.attempted, summary.failed
                    );
                } else if verbose >= 1 {
                    eprintln!("Page audio ready: {} chunks", summary.completed);
                }
            }
        }
        SessionEvent::Playback(PlayerEvent::Advanced(index)) => {
            if verbose >= 1 {
                eprintln!("playing segment {index}");
            }
        }
        SessionEvent::Playback(PlayerEvent::Finished) => {
            if !quiet {
                eprintln!("Page {} finished", session.current_page());
            }
        }
        SessionEvent::Playback(PlayerEvent::Error { index, message }) => {
            if !quiet {
                eprintln!(
                    "{}",
                    format!("playback error on segment {index}: {message}").red()
                );
            }
        }
    }
}

/// Reads stdin lines on a blocking thread and forwards them as commands.
/// When stdin is not a terminal the channel simply stays silent after EOF.
fn spawn_stdin_reader(interactive: bool) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    if interactive {
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
    }
    rx
}

/// Prints the voice catalog.
pub fn list_voices() {
    println!("Available voices:");
    for voice in crate::tts::VOICES {
        println!(
            "  {} — {} {} ({}, {})",
            voice.name.bold(),
            voice.accent,
            voice.gender,
            voice.style,
            voice.language_code
        );
    }
}

/// Loads configuration the same way the read command does, for the config
/// subcommands.
pub fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };
    Ok(config.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_resolve_voice_by_name() {
        let id = resolve_voice("Angelo").unwrap();
        assert!(id.starts_with("s3://"));
    }

    #[test]
    fn test_resolve_voice_raw_identifier_passthrough() {
        let raw = "s3://voice-cloning-zero-shot/abc/custom/manifest.json";
        assert_eq!(resolve_voice(raw).unwrap(), raw);
    }

    #[test]
    fn test_resolve_voice_unknown_fails() {
        assert!(resolve_voice("NotAVoice").is_err());
    }

    #[test]
    fn test_resolve_settings_cli_overrides_config() {
        let mut config = Config::default();
        config.speech.speed = 1.2;
        let cli = cli(&["readaloud", "x.pdf", "--speed", "1.8"]);
        let settings = resolve_settings(&config, &cli).unwrap();
        assert_eq!(settings.speed, 1.8);
        assert_eq!(settings.temperature, 0.5);
    }

    #[test]
    fn test_resolve_settings_rejects_out_of_range() {
        let config = Config::default();
        let cli = cli(&["readaloud", "x.pdf", "--speed", "9.0"]);
        assert!(resolve_settings(&config, &cli).is_err());
    }

    #[test]
    fn test_is_pdf_by_extension() {
        assert!(is_pdf(Path::new("a/b/paper.PDF")));
        assert!(!is_pdf(Path::new("notes.txt")));
        assert!(!is_pdf(Path::new("noext")));
    }

    #[test]
    fn test_open_document_requires_input() {
        let cli = cli(&["readaloud"]);
        assert!(open_document(&cli).is_err());
    }

    #[test]
    fn test_batch_complete_ready_without_autoplay_exits() {
        assert!(batch_complete(PlayerState::Ready, false, false));
    }

    #[test]
    fn test_batch_complete_ready_with_autoplay_waits() {
        assert!(!batch_complete(PlayerState::Ready, false, true));
    }

    #[test]
    fn test_batch_complete_playing_waits() {
        assert!(!batch_complete(PlayerState::Playing, false, true));
        assert!(!batch_complete(PlayerState::Paused, false, true));
    }

    #[test]
    fn test_batch_complete_ended_needs_finished_flag() {
        assert!(batch_complete(PlayerState::Ended, true, true));
        assert!(!batch_complete(PlayerState::Ended, false, true));
    }

    #[test]
    fn test_batch_complete_empty_exits() {
        assert!(batch_complete(PlayerState::Empty, false, true));
    }

    #[test]
    fn test_open_document_text_flag() {
        let cli = cli(&["readaloud", "--text", "Hello."]);
        let doc = open_document(&cli).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page_text(1).unwrap(), "Hello.");
    }
}
