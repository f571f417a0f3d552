//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::config::BackendKind;

/// NoteScribe - transcribe media linked from markdown notes
#[derive(Parser, Debug)]
#[command(name = "note-scribe")]
#[command(version)]
#[command(about = "Transcribe audio and video files linked from markdown notes")]
#[command(long_about = None)]
pub struct Cli {
    /// Markdown note whose linked media should be transcribed
    #[arg(value_name = "NOTE")]
    pub note: Option<String>,

    /// Only transcribe the linked file with this name
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<String>,

    /// Vault root directory (defaults to the note's parent directory)
    #[arg(long, value_name = "DIR")]
    pub vault: Option<String>,

    /// Transcription backend
    #[arg(short, long, value_name = "BACKEND")]
    pub backend: Option<BackendArg>,

    /// ASR server URL; repeat for ordered failover (whisper-asr backend)
    #[arg(long = "asr-url", value_name = "URL")]
    pub asr_urls: Vec<String>,

    /// Language hint (ISO code, or "auto" to detect)
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Translate to English instead of transcribing
    #[arg(long)]
    pub translate: bool,

    /// Prepend timestamps to transcript lines
    #[arg(short, long)]
    pub timestamps: bool,

    /// Timestamp format: HH:mm:ss, mm:ss, ss, or auto
    #[arg(long, value_name = "FMT")]
    pub timestamp_format: Option<String>,

    /// Group timestamps into fixed buckets of this many seconds
    #[arg(long, value_name = "SECS")]
    pub timestamp_interval: Option<u32>,

    /// One transcript line per word (requires server word timing)
    #[arg(long)]
    pub word_timestamps: bool,

    /// Print transcripts to stdout instead of splicing into the note
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Backend argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    WhisperAsr,
    Cloud,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::WhisperAsr => BackendKind::WhisperAsr,
            BackendArg::Cloud => BackendKind::Cloud,
        }
    }
}

/// Parsed transcribe options
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    pub note: String,
    pub file: Option<String>,
    pub vault: Option<String>,
    pub dry_run: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "backend",
    "asr_urls",
    "language",
    "translate",
    "encode",
    "vad_filter",
    "initial_prompt",
    "timestamps",
    "timestamp_format",
    "timestamp_interval",
    "word_timestamps",
    "embed_summary",
    "embed_outline",
    "embed_keywords",
    "embed_transcript_link",
    "poll_attempts",
    "debug",
    "cloud.api_url",
    "cloud.upload_url",
    "cloud.storage_url",
    "cloud.dashboard_url",
    "cloud.access_token",
    "cloud.account_id",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["note-scribe"]);
        assert!(cli.note.is_none());
        assert!(cli.file.is_none());
        assert!(cli.backend.is_none());
        assert!(cli.asr_urls.is_empty());
        assert!(!cli.translate);
        assert!(!cli.timestamps);
        assert!(!cli.dry_run);
        assert!(!cli.debug);
    }

    #[test]
    fn cli_parses_note_and_file() {
        let cli = Cli::parse_from(["note-scribe", "daily.md", "-f", "clip.mp3"]);
        assert_eq!(cli.note, Some("daily.md".to_string()));
        assert_eq!(cli.file, Some("clip.mp3".to_string()));
    }

    #[test]
    fn cli_parses_backend() {
        let cli = Cli::parse_from(["note-scribe", "daily.md", "-b", "cloud"]);
        assert_eq!(cli.backend, Some(BackendArg::Cloud));
    }

    #[test]
    fn cli_parses_repeated_asr_urls() {
        let cli = Cli::parse_from([
            "note-scribe",
            "daily.md",
            "--asr-url",
            "http://a:9000",
            "--asr-url",
            "http://b:9000",
        ]);
        assert_eq!(cli.asr_urls.len(), 2);
        assert_eq!(cli.asr_urls[0], "http://a:9000");
    }

    #[test]
    fn cli_parses_timestamp_options() {
        let cli = Cli::parse_from([
            "note-scribe",
            "daily.md",
            "-t",
            "--timestamp-format",
            "mm:ss",
            "--timestamp-interval",
            "30",
        ]);
        assert!(cli.timestamps);
        assert_eq!(cli.timestamp_format, Some("mm:ss".to_string()));
        assert_eq!(cli.timestamp_interval, Some(30));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["note-scribe", "config", "set", "language", "en"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "language");
            assert_eq!(value, "en");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn backend_arg_converts_to_backend_kind() {
        assert_eq!(BackendKind::from(BackendArg::WhisperAsr), BackendKind::WhisperAsr);
        assert_eq!(BackendKind::from(BackendArg::Cloud), BackendKind::Cloud);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("backend"));
        assert!(is_valid_config_key("timestamps"));
        assert!(is_valid_config_key("cloud.access_token"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
