//! Filesystem byte sources

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{ByteSource, MediaReadError};
use crate::domain::media::clamp_file_name;

/// Byte source backed by a file on disk, either vault-resident or picked
/// from elsewhere on the local filesystem
pub struct FileSource {
    path: PathBuf,
    name: String,
    extension: String,
    display: String,
}

impl FileSource {
    /// A file inside the vault, addressed by its vault-relative path
    pub fn vault(root: &Path, relative: &str) -> Self {
        Self::build(root.join(relative), relative.to_string())
    }

    /// A file outside the vault, addressed by an arbitrary path
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self::build(path, display)
    }

    fn build(path: PathBuf, display: String) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        Self {
            path,
            name,
            extension,
            display,
        }
    }
}

#[async_trait]
impl ByteSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn label(&self) -> String {
        clamp_file_name(40, &self.display)
    }

    async fn read(&self) -> Result<Vec<u8>, MediaReadError> {
        fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaReadError::NotFound(self.path.display().to_string())
            } else {
                MediaReadError::Io(e.to_string())
            }
        })
    }
}
