//! Main app runner

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::ConfigStore;
use crate::application::{FileOutcome, TranscribeInput, TranscribeLinkedMediaUseCase};
use crate::domain::config::AppConfig;
use crate::infrastructure::auth::{StaticTokenProvider, TOKEN_ENV};
use crate::infrastructure::transcription::build_backend;
use crate::infrastructure::{MarkdownNoteStore, XdgConfigStore};

use super::args::TranscribeOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run the transcription for one note
pub async fn run_transcribe(options: TranscribeOptions, config: AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    let (root, note_name) = resolve_note(&options.note, options.vault.as_deref());

    let sink = presenter.start_spinner("Preparing...");
    let auth = StaticTokenProvider::from_config(&config);
    let backend = build_backend(&config, Arc::new(auth), Arc::new(sink.clone()));
    let notes = MarkdownNoteStore::new(root);
    let use_case = TranscribeLinkedMediaUseCase::new(backend, notes);

    // Ctrl+C stops the current transcription without touching the note
    let cancel = use_case.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let input = TranscribeInput {
        note: note_name,
        only_file: options.file.clone(),
        dry_run: options.dry_run,
    };

    let report = match use_case.execute(input, &sink).await {
        Ok(report) => report,
        Err(e) => {
            // eprintln-based reporting stays visible when stderr is piped
            presenter.stop_spinner();
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.stop_spinner();

    let mut exit = EXIT_SUCCESS;
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Transcribed(text) => {
                if options.dry_run {
                    presenter.output(text);
                }
                presenter.success(&format!("{} transcribed", file.file));
            }
            FileOutcome::Failed(error) => {
                presenter.error(&format!("{}: {}", file.file, error));
                exit = EXIT_ERROR;
            }
            FileOutcome::Cancelled => {
                presenter.warn(&format!("{}: cancelled, note left untouched", file.file));
                exit = EXIT_ERROR;
            }
        }
    }

    ExitCode::from(exit)
}

/// Split a note argument into (vault root, note path within the vault)
fn resolve_note(note: &str, vault: Option<&str>) -> (PathBuf, String) {
    if let Some(vault) = vault {
        return (PathBuf::from(vault), note.to_string());
    }

    let path = Path::new(note);
    let root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(note)
        .to_string();
    (root, name)
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        cloud: env::var(TOKEN_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(|token| crate::domain::config::CloudConfig {
                access_token: Some(token),
                ..Default::default()
            }),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_note_with_vault() {
        let (root, name) = resolve_note("notes/daily.md", Some("/vault"));
        assert_eq!(root, PathBuf::from("/vault"));
        assert_eq!(name, "notes/daily.md");
    }

    #[test]
    fn resolve_note_uses_parent_dir() {
        let (root, name) = resolve_note("/vault/notes/daily.md", None);
        assert_eq!(root, PathBuf::from("/vault/notes"));
        assert_eq!(name, "daily.md");
    }

    #[test]
    fn resolve_bare_note_uses_current_dir() {
        let (root, name) = resolve_note("daily.md", None);
        assert_eq!(root, PathBuf::from("."));
        assert_eq!(name, "daily.md");
    }
}
