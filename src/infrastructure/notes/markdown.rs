//! Markdown note store adapter
//!
//! Treats a directory of markdown files as the note vault: scans wiki
//! (`[[file.ext]]`) and markdown (`[label](file.ext)`) links, filters
//! them to transcribable extensions, and resolves targets against the
//! vault root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{ByteSource, MediaLink, NoteError, NoteStore};
use crate::domain::media::is_transcribable;
use crate::infrastructure::media::{FileSource, RemoteUrlSource};

/// Note store rooted at a vault directory
pub struct MarkdownNoteStore {
    root: PathBuf,
}

impl MarkdownNoteStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn note_path(&self, note: &str) -> PathBuf {
        let path = Path::new(note);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn extension_of(target: &str) -> &str {
    match target.rfind('.') {
        Some(i) => &target[i + 1..],
        None => "",
    }
}

/// Scan `[[target]]` wiki links. The link text before any `|` alias or
/// `#` heading reference is the target.
fn scan_wiki_links(text: &str) -> Vec<(usize, MediaLink)> {
    let mut links = Vec::new();
    let mut pos = 0;
    while let Some(start_rel) = text[pos..].find("[[") {
        let start = pos + start_rel;
        let Some(end_rel) = text[start + 2..].find("]]") else {
            break;
        };
        let end = start + 2 + end_rel;
        let inner = &text[start + 2..end];
        let tag = &text[start..end + 2];
        pos = end + 2;

        let target = inner.split(['|', '#']).next().unwrap_or("").trim();
        if target.is_empty() {
            continue;
        }
        links.push((
            start,
            MediaLink {
                target: target.to_string(),
                tag: tag.to_string(),
            },
        ));
    }
    links
}

/// Scan `[label](target)` markdown links
fn scan_markdown_links(text: &str) -> Vec<(usize, MediaLink)> {
    let mut links = Vec::new();
    let mut pos = 0;
    while let Some(mid_rel) = text[pos..].find("](") {
        let mid = pos + mid_rel;
        let Some(label_start) = text[..mid].rfind('[') else {
            pos = mid + 2;
            continue;
        };
        let Some(close_rel) = text[mid + 2..].find(')') else {
            break;
        };
        let close = mid + 2 + close_rel;
        let target = text[mid + 2..close].trim();
        let tag = &text[label_start..=close];
        pos = close + 1;

        if target.is_empty() {
            continue;
        }
        links.push((
            label_start,
            MediaLink {
                target: target.to_string(),
                tag: tag.to_string(),
            },
        ));
    }
    links
}

/// All transcribable media links in a note, in document order, deduplicated
fn media_links(text: &str) -> Vec<MediaLink> {
    let mut found = scan_wiki_links(text);
    found.extend(scan_markdown_links(text));
    found.sort_by_key(|(pos, _)| *pos);

    let mut links: Vec<MediaLink> = Vec::new();
    for (_, link) in found {
        if !is_transcribable(extension_of(&link.target)) {
            continue;
        }
        if links.iter().any(|l| l.target == link.target) {
            continue;
        }
        links.push(link);
    }
    links
}

#[async_trait]
impl NoteStore for MarkdownNoteStore {
    async fn read_note(&self, note: &str) -> Result<String, NoteError> {
        let path = self.note_path(note);
        fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NoteError::NotFound(path.display().to_string())
            } else {
                NoteError::Read(e.to_string())
            }
        })
    }

    async fn write_note(&self, note: &str, content: &str) -> Result<(), NoteError> {
        fs::write(self.note_path(note), content)
            .await
            .map_err(|e| NoteError::Write(e.to_string()))
    }

    async fn linked_media(&self, note: &str) -> Result<Vec<MediaLink>, NoteError> {
        let text = self.read_note(note).await?;
        Ok(media_links(&text))
    }

    fn open_media(&self, link: &MediaLink) -> Result<Box<dyn ByteSource>, NoteError> {
        if link.target.starts_with("http://") || link.target.starts_with("https://") {
            Ok(Box::new(RemoteUrlSource::new(link.target.clone())))
        } else {
            Ok(Box::new(FileSource::vault(&self.root, &link.target)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wiki_links_with_alias_and_embed() {
        let text = "intro ![[clip.mp3|listen]] and [[talk.webm]] end";
        let links = media_links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].target, "clip.mp3");
        assert_eq!(links[0].tag, "[[clip.mp3|listen]]");
        assert_eq!(links[1].target, "talk.webm");
        assert_eq!(links[1].tag, "[[talk.webm]]");
    }

    #[test]
    fn markdown_links() {
        let text = "see [the recording](media/interview.m4a).";
        let links = media_links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "media/interview.m4a");
        assert_eq!(links[0].tag, "[the recording](media/interview.m4a)");
    }

    #[test]
    fn non_media_links_are_skipped() {
        let text = "[[other-note]] [[doc.pdf]] [site](https://example.com/page.html)";
        assert!(media_links(text).is_empty());
    }

    #[test]
    fn duplicates_are_removed_in_document_order() {
        let text = "[[b.mp3]] then [[a.mp3]] then [[b.mp3]] again";
        let links = media_links(text);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].target, "b.mp3");
        assert_eq!(links[1].target, "a.mp3");
    }

    #[test]
    fn remote_url_links_are_detected() {
        let text = "remote [clip](https://example.com/audio/clip.ogg)";
        let links = media_links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "https://example.com/audio/clip.ogg");
    }

    #[test]
    fn unterminated_links_do_not_panic() {
        assert!(media_links("broken [[clip.mp3").is_empty());
        assert!(media_links("broken [label](clip.mp3").is_empty());
    }

    #[test]
    fn extension_extraction() {
        assert_eq!(extension_of("a/b/clip.mp3"), "mp3");
        assert_eq!(extension_of("noext"), "");
    }

    #[tokio::test]
    async fn read_and_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = MarkdownNoteStore::new(dir.path());
        store.write_note("note.md", "content [[a.mp3]]").await.unwrap();
        let text = store.read_note("note.md").await.unwrap();
        assert_eq!(text, "content [[a.mp3]]");
        let links = store.linked_media("note.md").await.unwrap();
        assert_eq!(links.len(), 1);
    }

    #[tokio::test]
    async fn missing_note_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = MarkdownNoteStore::new(dir.path());
        let result = store.read_note("absent.md").await;
        assert!(matches!(result, Err(NoteError::NotFound(_))));
    }
}
