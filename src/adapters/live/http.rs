//! Live adapter that downloads images over HTTP(S).

use std::io::Write;
use std::path::Path;

use reqwest::{Client, Response};

use crate::error::CardError;
use crate::ports::{DownloadFuture, DownloadProgress, Downloader, ProgressFn};

/// Streams remote images to disk, falling back to a single buffered fetch
/// when streaming fails.
pub struct HttpDownloader {
    client: Client,
    progress: Option<ProgressFn>,
}

impl HttpDownloader {
    /// Create a downloader with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new(), progress: None }
    }

    /// Report transfer progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    fn report(&self, url: &str, received: u64, total: Option<u64>) {
        if let Some(progress) = &self.progress {
            progress(&DownloadProgress { url: url.to_string(), received, total });
        }
    }

    async fn fetch_streamed(&self, url: &str, dest: &Path) -> Result<(), CardError> {
        let mut response = checked(url, self.client.get(url).send().await?)?;
        let total = response.content_length();

        let mut file = std::fs::File::create(dest)?;
        let mut received = 0u64;
        self.report(url, received, total);
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)?;
            received += chunk.len() as u64;
            self.report(url, received, total);
        }
        file.flush()?;
        Ok(())
    }

    async fn fetch_whole(&self, url: &str, dest: &Path) -> Result<(), CardError> {
        let response = checked(url, self.client.get(url).send().await?)?;
        let bytes = response.bytes().await?;
        std::fs::write(dest, &bytes)?;
        let len = bytes.len() as u64;
        self.report(url, len, Some(len));
        Ok(())
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader for HttpDownloader {
    fn download<'a>(&'a self, url: &'a str, dest: &'a Path) -> DownloadFuture<'a> {
        Box::pin(async move {
            tracing::debug!(url, dest = %dest.display(), "downloading");
            if let Err(e) = self.fetch_streamed(url, dest).await {
                tracing::warn!(url, error = %e, "streamed download failed, retrying without streaming");
                let _ = std::fs::remove_file(dest);
                self.fetch_whole(url, dest).await?;
            }
            Ok(dest.to_path_buf())
        })
    }
}

fn checked(url: &str, response: Response) -> Result<Response, CardError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CardError::Download { url: url.to_string(), status: status.as_u16() })
    }
}
