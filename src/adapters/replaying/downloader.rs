//! Replaying adapter for the `Downloader` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::cassette::replayer::CassetteReplayer;
use crate::error::CardError;
use crate::ports::{DownloadFuture, Downloader};

/// Writes recorded bodies to disk instead of touching the network.
pub struct ReplayingDownloader {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingDownloader {
    /// Create a replaying downloader backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn recorded_body(&self, url: &str) -> Result<Vec<u8>, CardError> {
        let mut replayer = self
            .replayer
            .lock()
            .map_err(|e| CardError::Replay(format!("Replayer lock poisoned: {e}")))?;
        let entry = replayer.next_download(url).map_err(CardError::Replay)?;
        entry.body().map_err(CardError::Replay)
    }
}

impl Downloader for ReplayingDownloader {
    fn download<'a>(&'a self, url: &'a str, dest: &'a Path) -> DownloadFuture<'a> {
        Box::pin(async move {
            let body = self.recorded_body(url)?;
            tracing::debug!(url, bytes = body.len(), "replaying recorded download");
            std::fs::write(dest, body)?;
            Ok(dest.to_path_buf())
        })
    }
}
