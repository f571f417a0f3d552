//! NoteScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use note_scribe::cli::{
    app::{load_merged_config, run_transcribe, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, TranscribeOptions},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use note_scribe::domain::config::{AppConfig, BackendKind};
use note_scribe::infrastructure::XdgConfigStore;

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "note_scribe=debug"
    } else {
        "note_scribe=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let mut cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command.take() {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    let Some(note) = cli.note.clone() else {
        presenter.error("No note given. Usage: note-scribe <NOTE> [options]");
        return ExitCode::from(EXIT_USAGE_ERROR);
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        backend: cli.backend.map(|b| BackendKind::from(b).to_string()),
        asr_urls: if cli.asr_urls.is_empty() {
            None
        } else {
            Some(cli.asr_urls.clone())
        },
        language: cli.language.clone(),
        translate: if cli.translate { Some(true) } else { None },
        timestamps: if cli.timestamps { Some(true) } else { None },
        timestamp_format: cli.timestamp_format.clone(),
        timestamp_interval: cli.timestamp_interval,
        word_timestamps: if cli.word_timestamps { Some(true) } else { None },
        debug: if cli.debug { Some(true) } else { None },
        ..Default::default()
    };

    // Merge config
    let config = load_merged_config(cli_config).await;
    init_tracing(config.debug_or_default());

    let options = TranscribeOptions {
        note,
        file: cli.file.clone(),
        vault: cli.vault.clone(),
        dry_run: cli.dry_run,
    };

    run_transcribe(options, config).await
}
