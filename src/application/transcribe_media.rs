//! Transcribe linked media use case

use thiserror::Error;
use tracing::{debug, warn};

use super::cancel::CancelHandle;
use super::ports::{MediaLink, NoteError, NoteStore, StatusSink, TranscribeError, Transcriber};
use crate::domain::media::clamp_file_name;

/// Errors from the transcribe use case that abort the whole run.
/// Per-file transcription failures do not abort; they are collected in
/// the report and the remaining queue continues.
#[derive(Debug, Error)]
pub enum TranscribeRunError {
    #[error("Note access failed: {0}")]
    Note(#[from] NoteError),

    #[error("No transcribable files are linked from {0}")]
    NoLinkedMedia(String),

    #[error("No linked file named {0}")]
    UnknownFile(String),
}

/// Input parameters for the transcribe use case
#[derive(Debug, Clone, Default)]
pub struct TranscribeInput {
    /// Note whose linked media should be transcribed
    pub note: String,
    /// Only transcribe the linked file with this name
    pub only_file: Option<String>,
    /// Print transcripts instead of splicing them into the note
    pub dry_run: bool,
}

/// Why one file's transcription did not land in the note
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),

    #[error("Note update failed: {0}")]
    Note(#[from] NoteError),
}

/// Outcome for one linked file
#[derive(Debug)]
pub enum FileOutcome {
    /// Transcribed (and spliced unless dry-run); carries the transcript
    Transcribed(String),
    /// Transcription failed; the queue continued
    Failed(FileError),
    /// Cancelled before the note was touched
    Cancelled,
}

/// Per-file result row
#[derive(Debug)]
pub struct FileReport {
    pub file: String,
    pub outcome: FileOutcome,
}

/// Output from the transcribe use case
#[derive(Debug, Default)]
pub struct TranscribeReport {
    pub files: Vec<FileReport>,
}

impl TranscribeReport {
    pub fn succeeded(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Transcribed(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed(_)))
            .count()
    }

    pub fn cancelled(&self) -> bool {
        self.files
            .iter()
            .any(|f| matches!(f.outcome, FileOutcome::Cancelled))
    }
}

/// Insert a transcript on the line after the first occurrence of a link
/// tag. Returns None when the tag is not present in the note text.
pub fn splice_transcript(note_text: &str, link_tag: &str, transcript: &str) -> Option<String> {
    let anchor = note_text.find(link_tag)? + link_tag.len();
    let mut spliced = String::with_capacity(note_text.len() + transcript.len() + 1);
    spliced.push_str(&note_text[..anchor]);
    spliced.push('\n');
    spliced.push_str(transcript);
    spliced.push_str(&note_text[anchor..]);
    Some(spliced)
}

/// Transcribe every transcribable file linked from a note and splice each
/// transcript into the note below its link.
pub struct TranscribeLinkedMediaUseCase<T, N>
where
    T: Transcriber,
    N: NoteStore,
{
    transcriber: T,
    notes: N,
    cancel: CancelHandle,
}

impl<T, N> TranscribeLinkedMediaUseCase<T, N>
where
    T: Transcriber,
    N: NoteStore,
{
    pub fn new(transcriber: T, notes: N) -> Self {
        Self {
            transcriber,
            notes,
            cancel: CancelHandle::new(),
        }
    }

    /// Get the cancellation handle for external signal handling
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Execute the transcription workflow.
    ///
    /// Files are processed sequentially, each awaited in turn. A failing
    /// file is recorded and the queue continues; cancellation stops the
    /// queue without touching the note.
    pub async fn execute(
        &self,
        input: TranscribeInput,
        status: &dyn StatusSink,
    ) -> Result<TranscribeReport, TranscribeRunError> {
        let links = self.notes.linked_media(&input.note).await?;
        if links.is_empty() {
            return Err(TranscribeRunError::NoLinkedMedia(input.note.clone()));
        }

        let queue: Vec<MediaLink> = match &input.only_file {
            Some(name) => {
                let selected: Vec<MediaLink> = links
                    .into_iter()
                    .filter(|l| l.file_name() == name || l.target == *name)
                    .collect();
                if selected.is_empty() {
                    return Err(TranscribeRunError::UnknownFile(name.clone()));
                }
                selected
            }
            None => links,
        };

        let mut report = TranscribeReport::default();
        for link in queue {
            let file = link.file_name().to_string();
            status.status(&format!(
                "Transcribing {}",
                clamp_file_name(40, &file)
            ));

            let outcome = self.transcribe_one(&input, &link).await;
            if matches!(outcome, FileOutcome::Cancelled) {
                report.files.push(FileReport { file, outcome });
                break;
            }
            if let FileOutcome::Failed(ref error) = outcome {
                warn!(%file, %error, "transcription failed, continuing with remaining files");
            }
            report.files.push(FileReport { file, outcome });
        }

        Ok(report)
    }

    async fn transcribe_one(&self, input: &TranscribeInput, link: &MediaLink) -> FileOutcome {
        let source = match self.notes.open_media(link) {
            Ok(source) => source,
            Err(e) => return FileOutcome::Failed(e.into()),
        };

        let transcript = match self.transcriber.transcribe(source.as_ref(), &self.cancel).await {
            Ok(text) => text,
            Err(TranscribeError::Cancelled) => return FileOutcome::Cancelled,
            Err(e) => return FileOutcome::Failed(e.into()),
        };

        // Last cancellation check before the terminal side effect
        if self.cancel.is_cancelled() {
            return FileOutcome::Cancelled;
        }

        if input.dry_run {
            return FileOutcome::Transcribed(transcript);
        }

        match self.write_back(&input.note, link, &transcript).await {
            Ok(()) => FileOutcome::Transcribed(transcript),
            Err(e) => FileOutcome::Failed(e.into()),
        }
    }

    async fn write_back(
        &self,
        note: &str,
        link: &MediaLink,
        transcript: &str,
    ) -> Result<(), NoteError> {
        let text = self.notes.read_note(note).await?;
        let spliced = splice_transcript(&text, &link.tag, transcript)
            .ok_or_else(|| NoteError::UnresolvedLink(link.tag.clone()))?;
        debug!(note, tag = %link.tag, "splicing transcript into note");
        self.notes.write_note(note, &spliced).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ByteSource, MediaReadError, NullStatusSink};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubSource;

    #[async_trait]
    impl ByteSource for StubSource {
        fn name(&self) -> &str {
            "clip.mp3"
        }
        fn extension(&self) -> &str {
            "mp3"
        }
        fn label(&self) -> String {
            "clip.mp3".to_string()
        }
        async fn read(&self) -> Result<Vec<u8>, MediaReadError> {
            Ok(vec![0u8; 4])
        }
    }

    struct StubNotes {
        content: Mutex<String>,
        links: Vec<MediaLink>,
    }

    impl StubNotes {
        fn new(content: &str, links: Vec<MediaLink>) -> Self {
            Self {
                content: Mutex::new(content.to_string()),
                links,
            }
        }
    }

    #[async_trait]
    impl NoteStore for StubNotes {
        async fn read_note(&self, _note: &str) -> Result<String, NoteError> {
            Ok(self.content.lock().unwrap().clone())
        }
        async fn write_note(&self, _note: &str, content: &str) -> Result<(), NoteError> {
            *self.content.lock().unwrap() = content.to_string();
            Ok(())
        }
        async fn linked_media(&self, _note: &str) -> Result<Vec<MediaLink>, NoteError> {
            Ok(self.links.clone())
        }
        fn open_media(&self, _link: &MediaLink) -> Result<Box<dyn ByteSource>, NoteError> {
            Ok(Box::new(StubSource))
        }
    }

    struct StubTranscriber {
        result: Result<String, TranscribeError>,
    }

    #[async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe(
            &self,
            _media: &dyn ByteSource,
            _cancel: &CancelHandle,
        ) -> Result<String, TranscribeError> {
            self.result.clone()
        }
    }

    fn link(target: &str) -> MediaLink {
        MediaLink {
            target: target.to_string(),
            tag: format!("[[{}]]", target),
        }
    }

    #[test]
    fn splice_inserts_after_link() {
        let spliced = splice_transcript("intro [[clip.mp3]] outro", "[[clip.mp3]]", "hello").unwrap();
        assert_eq!(spliced, "intro [[clip.mp3]]\nhello outro");
    }

    #[test]
    fn splice_missing_tag_is_none() {
        assert!(splice_transcript("no links here", "[[clip.mp3]]", "hello").is_none());
    }

    #[tokio::test]
    async fn execute_splices_transcript() {
        let notes = StubNotes::new("before [[clip.mp3]] after", vec![link("clip.mp3")]);
        let use_case = TranscribeLinkedMediaUseCase::new(
            StubTranscriber {
                result: Ok("the transcript".to_string()),
            },
            notes,
        );

        let report = use_case
            .execute(
                TranscribeInput {
                    note: "note.md".to_string(),
                    ..Default::default()
                },
                &NullStatusSink,
            )
            .await
            .unwrap();

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 0);
        let content = use_case.notes.read_note("note.md").await.unwrap();
        assert_eq!(content, "before [[clip.mp3]]\nthe transcript after");
    }

    #[tokio::test]
    async fn execute_dry_run_leaves_note_untouched() {
        let notes = StubNotes::new("before [[clip.mp3]] after", vec![link("clip.mp3")]);
        let use_case = TranscribeLinkedMediaUseCase::new(
            StubTranscriber {
                result: Ok("the transcript".to_string()),
            },
            notes,
        );

        let report = use_case
            .execute(
                TranscribeInput {
                    note: "note.md".to_string(),
                    dry_run: true,
                    ..Default::default()
                },
                &NullStatusSink,
            )
            .await
            .unwrap();

        assert_eq!(report.succeeded(), 1);
        let content = use_case.notes.read_note("note.md").await.unwrap();
        assert_eq!(content, "before [[clip.mp3]] after");
    }

    #[tokio::test]
    async fn execute_continues_after_failure() {
        let notes = StubNotes::new(
            "a [[one.mp3]] b [[two.mp3]]",
            vec![link("one.mp3"), link("two.mp3")],
        );
        let use_case = TranscribeLinkedMediaUseCase::new(
            StubTranscriber {
                result: Err(TranscribeError::RequestFailed("boom".to_string())),
            },
            notes,
        );

        let report = use_case
            .execute(
                TranscribeInput {
                    note: "note.md".to_string(),
                    ..Default::default()
                },
                &NullStatusSink,
            )
            .await
            .unwrap();

        // Both files attempted despite the first failing
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.failed(), 2);
    }

    #[tokio::test]
    async fn cancellation_skips_note_mutation() {
        let notes = StubNotes::new("before [[clip.mp3]] after", vec![link("clip.mp3")]);
        let use_case = TranscribeLinkedMediaUseCase::new(
            StubTranscriber {
                result: Ok("never spliced".to_string()),
            },
            notes,
        );
        use_case.cancel_handle().cancel();

        let report = use_case
            .execute(
                TranscribeInput {
                    note: "note.md".to_string(),
                    ..Default::default()
                },
                &NullStatusSink,
            )
            .await
            .unwrap();

        assert!(report.cancelled());
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 0);
        let content = use_case.notes.read_note("note.md").await.unwrap();
        assert_eq!(content, "before [[clip.mp3]] after");
    }

    #[tokio::test]
    async fn unknown_only_file_is_an_error() {
        let notes = StubNotes::new("a [[one.mp3]]", vec![link("one.mp3")]);
        let use_case = TranscribeLinkedMediaUseCase::new(
            StubTranscriber {
                result: Ok("text".to_string()),
            },
            notes,
        );

        let result = use_case
            .execute(
                TranscribeInput {
                    note: "note.md".to_string(),
                    only_file: Some("missing.mp3".to_string()),
                    ..Default::default()
                },
                &NullStatusSink,
            )
            .await;

        assert!(matches!(result, Err(TranscribeRunError::UnknownFile(_))));
    }
}
