//! Raw text retrieval for the data tables.
//!
//! The loader never knows about transport; it asks a [`TextFetcher`] for
//! the text at a location and gets a blob back.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::SourceError;

/// Retrieves the text of a data table.
#[async_trait]
pub trait TextFetcher: Send + Sync {
    /// Returns the full text stored at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the location cannot be read.
    async fn fetch_text(&self, location: &str) -> Result<String, SourceError>;
}

/// Reads tables from a local directory.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    base_dir: PathBuf,
}

impl FileFetcher {
    /// Creates a fetcher that resolves locations relative to `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

#[async_trait]
impl TextFetcher for FileFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String, SourceError> {
        let path = self.base_dir.join(location);
        log::debug!("Reading {}", path.display());
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

/// Downloads tables over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher that resolves locations relative to `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else {
            format!("{}/{}", self.base_url, location.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl TextFetcher for HttpFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String, SourceError> {
        let url = self.url_for(location);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let text = response.text().await?;
        log::debug!("Downloaded {} bytes from {url}", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_locations_resolve_against_base() {
        let fetcher = HttpFetcher::new("https://example.org/data/");
        assert_eq!(
            fetcher.url_for("kehilot.csv"),
            "https://example.org/data/kehilot.csv"
        );
        assert_eq!(
            fetcher.url_for("https://cdn.example.org/events.csv"),
            "https://cdn.example.org/events.csv"
        );
    }

    #[tokio::test]
    async fn reads_files_relative_to_base_dir() {
        let dir = std::env::temp_dir().join("kehilot_map_file_fetcher_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("t.csv"), "a,b\n1,2\n").unwrap();

        let fetcher = FileFetcher::new(&dir);
        let text = fetcher.fetch_text("t.csv").await.unwrap();
        assert_eq!(text, "a,b\n1,2\n");

        assert!(matches!(
            fetcher.fetch_text("missing.csv").await,
            Err(SourceError::Io(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
