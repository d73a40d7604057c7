//! Command-line interface for readaloud
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Read PDF documents aloud with PlayAI text-to-speech
#[derive(Parser, Debug)]
#[command(
    name = "readaloud",
    version,
    about = "Read PDF documents aloud with PlayAI text-to-speech"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// PDF or plain-text file to read
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: progress per chunk, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Page to start reading from (1-based)
    #[arg(long, short = 'p', value_name = "N", default_value = "1")]
    pub page: usize,

    /// Voice name or identifier (see `readaloud voices`)
    #[arg(long, value_name = "VOICE")]
    pub voice: Option<String>,

    /// Playback speed multiplier (0.5 to 2.0)
    #[arg(long, value_name = "SPEED")]
    pub speed: Option<f32>,

    /// Sampling temperature (0.0 to 1.0)
    #[arg(long, value_name = "TEMP")]
    pub temperature: Option<f32>,

    /// Read literal text instead of a file
    #[arg(long, value_name = "TEXT", conflicts_with = "file")]
    pub text: Option<String>,

    /// Do not start playback automatically when audio is ready
    #[arg(long)]
    pub no_autoplay: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available voices
    Voices,

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Write a default configuration file
    Init,
    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_argument() {
        let cli = Cli::try_parse_from(["readaloud", "paper.pdf"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("paper.pdf")));
        assert!(cli.command.is_none());
        assert_eq!(cli.page, 1);
        assert!(cli.voice.is_none());
        assert!(cli.speed.is_none());
        assert!(cli.temperature.is_none());
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_page_option() {
        let cli = Cli::try_parse_from(["readaloud", "paper.pdf", "--page", "7"]).unwrap();
        assert_eq!(cli.page, 7);

        let cli = Cli::try_parse_from(["readaloud", "paper.pdf", "-p", "3"]).unwrap();
        assert_eq!(cli.page, 3);
    }

    #[test]
    fn test_parse_speech_options() {
        let cli = Cli::try_parse_from([
            "readaloud",
            "paper.pdf",
            "--voice",
            "Angelo",
            "--speed",
            "1.5",
            "--temperature",
            "0.7",
        ])
        .unwrap();
        assert_eq!(cli.voice.as_deref(), Some("Angelo"));
        assert_eq!(cli.speed, Some(1.5));
        assert_eq!(cli.temperature, Some(0.7));
    }

    #[test]
    fn test_text_conflicts_with_file() {
        let result = Cli::try_parse_from(["readaloud", "paper.pdf", "--text", "Hello."]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_text_alone() {
        let cli = Cli::try_parse_from(["readaloud", "--text", "Hello there."]).unwrap();
        assert_eq!(cli.text.as_deref(), Some("Hello there."));
        assert!(cli.file.is_none());
    }

    #[test]
    fn test_parse_voices_command() {
        let cli = Cli::try_parse_from(["readaloud", "voices"]).unwrap();
        match cli.command {
            Some(Commands::Voices) => {}
            _ => panic!("Expected Voices command"),
        }
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["readaloud", "config", "show"]).unwrap();
        match cli.command {
            Some(Commands::Config { action }) => match action {
                ConfigAction::Show => {}
                _ => panic!("Expected Show action"),
            },
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["readaloud", "config", "init"]).unwrap();
        match cli.command {
            Some(Commands::Config { action }) => match action {
                ConfigAction::Init => {}
                _ => panic!("Expected Init action"),
            },
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_config_requires_subcommand() {
        let result = Cli::try_parse_from(["readaloud", "config"]);
        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn test_parse_global_config_path() {
        let cli =
            Cli::try_parse_from(["readaloud", "--config", "/path/to/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_parse_global_quiet_with_command() {
        let cli = Cli::try_parse_from(["readaloud", "--quiet", "voices"]).unwrap();
        assert!(cli.quiet);
        match cli.command {
            Some(Commands::Voices) => {}
            _ => panic!("Expected Voices command"),
        }
    }

    #[test]
    fn test_parse_verbose_repeated_flags() {
        let cli = Cli::try_parse_from(["readaloud", "-v", "-v"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_no_autoplay() {
        let cli = Cli::try_parse_from(["readaloud", "paper.pdf", "--no-autoplay"]).unwrap();
        assert!(cli.no_autoplay);
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["readaloud", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
