//! Remote URL byte source

use async_trait::async_trait;

use crate::application::ports::{ByteSource, MediaReadError};
use crate::domain::media::clamp_file_name;

/// Byte source fetched from a remote URL. Each read re-fetches; nothing
/// is cached.
pub struct RemoteUrlSource {
    url: String,
    name: String,
    extension: String,
    client: reqwest::Client,
}

impl RemoteUrlSource {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let name = url
            .split(['?', '#'])
            .next()
            .unwrap_or(&url)
            .rsplit('/')
            .next()
            .unwrap_or(&url)
            .to_string();
        let extension = match name.rfind('.') {
            Some(i) => name[i + 1..].to_lowercase(),
            None => String::new(),
        };
        Self {
            url,
            name,
            extension,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ByteSource for RemoteUrlSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn label(&self) -> String {
        clamp_file_name(40, &self.url)
    }

    async fn read(&self) -> Result<Vec<u8>, MediaReadError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| MediaReadError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaReadError::Fetch(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MediaReadError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
