//! HTTP image downloader.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::ports::ImageFetchPort;

const DEFAULT_USER_AGENT: &str = concat!("wishcache/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP downloader.
#[derive(Debug, Clone, Default)]
pub struct ImageDownloaderConfig {
    /// Whole-request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
    /// User agent sent with every request.
    pub user_agent: Option<String>,
}

/// Downloads images over HTTP into local files.
#[derive(Debug, Clone)]
pub struct HttpImageDownloader {
    client: Client,
}

impl HttpImageDownloader {
    /// Creates a downloader.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &ImageDownloaderConfig) -> CacheResult<Self> {
        let mut builder = Client::builder().user_agent(
            config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CacheError::download("", format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Creates a downloader around an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn stream_to_file(
        &self,
        url: &str,
        mut response: reqwest::Response,
        part: &Path,
    ) -> CacheResult<u64> {
        let mut file = fs::File::create(part)
            .await
            .map_err(|e| CacheError::io(part, e))?;

        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| CacheError::download(url, format!("failed to read body: {e}")))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| CacheError::io(part, e))?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| CacheError::io(part, e))?;
        Ok(written)
    }
}

#[async_trait]
impl ImageFetchPort for HttpImageDownloader {
    async fn download(&self, url: &str, dest: &Path) -> CacheResult<u16> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::download(url, format!("request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(url = %url, status = status.as_u16(), "Download returned non-OK status");
            return Ok(status.as_u16());
        }

        let part = part_path(dest);
        let result = match self.stream_to_file(url, response, &part).await {
            Ok(size) => fs::rename(&part, dest)
                .await
                .map(|()| size)
                .map_err(|e| CacheError::io(dest, e)),
            Err(e) => Err(e),
        };

        match result {
            Ok(size) => {
                debug!(url = %url, path = %dest.display(), size, "Downloaded image");
                Ok(status.as_u16())
            }
            Err(e) => {
                if let Err(rm) = fs::remove_file(&part).await
                    && rm.kind() != std::io::ErrorKind::NotFound
                {
                    warn!(path = %part.display(), error = %rm, "Failed to remove partial download");
                }
                Err(e)
            }
        }
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map_or_else(|| OsString::from("download"), std::ffi::OsStr::to_os_string);
    name.push(".part");
    dest.with_file_name(name)
}
