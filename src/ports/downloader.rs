//! Downloader port: fetching remote images to local files.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use crate::error::CardError;

/// Progress of a single transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProgress {
    /// The URL being fetched.
    pub url: String,
    /// Bytes written so far.
    pub received: u64,
    /// Total size, when the server announced one.
    pub total: Option<u64>,
}

impl DownloadProgress {
    /// Completion as a whole percentage, when the total is known.
    #[must_use]
    pub fn percent(&self) -> Option<u64> {
        match self.total {
            Some(0) => Some(100),
            Some(total) => Some((self.received.min(total) * 100) / total),
            None => None,
        }
    }
}

/// Callback invoked as a transfer advances.
pub type ProgressFn = Arc<dyn Fn(&DownloadProgress) + Send + Sync>;

/// Boxed future type returned by [`Downloader::download`].
pub type DownloadFuture<'a> = Pin<Box<dyn Future<Output = Result<PathBuf, CardError>> + Send + 'a>>;

/// Fetches a remote resource into a local file.
pub trait Downloader: Send + Sync {
    /// Download `url` into `dest`, resolving to the local path once the file
    /// is completely written.
    fn download<'a>(&'a self, url: &'a str, dest: &'a Path) -> DownloadFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(received: u64, total: Option<u64>) -> DownloadProgress {
        DownloadProgress { url: "https://example.com/a.png".into(), received, total }
    }

    #[test]
    fn percent_known_total() {
        assert_eq!(progress(0, Some(200)).percent(), Some(0));
        assert_eq!(progress(50, Some(200)).percent(), Some(25));
        assert_eq!(progress(200, Some(200)).percent(), Some(100));
    }

    #[test]
    fn percent_caps_at_total() {
        assert_eq!(progress(300, Some(200)).percent(), Some(100));
    }

    #[test]
    fn percent_unknown_total() {
        assert_eq!(progress(10, None).percent(), None);
        assert_eq!(progress(0, Some(0)).percent(), Some(100));
    }
}
