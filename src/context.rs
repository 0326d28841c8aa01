//! Service context that bundles all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::http::HttpDownloader;
use crate::adapters::recording::downloader::RecordingDownloader;
use crate::adapters::replaying::downloader::ReplayingDownloader;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::CardError;
use crate::ports::{Downloader, ProgressFn};

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Downloader port.
    pub downloader: Box<dyn Downloader>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// The context the session was created with must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context that downloads over HTTP.
    #[must_use]
    pub fn live(progress: Option<ProgressFn>) -> Self {
        let downloader = match progress {
            Some(progress) => HttpDownloader::new().with_progress(progress),
            None => HttpDownloader::new(),
        };
        Self { downloader: Box::new(downloader) }
    }

    /// Create a recording context that wraps the live downloader with a recorder.
    #[must_use]
    pub fn recording(progress: Option<ProgressFn>) -> (Self, RecordingSession) {
        let live_ctx = Self::live(progress);

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".socialcard/cassettes").join(&timestamp).join("downloads.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-downloads"),
            get_commit_hash(),
        )));

        let downloader = RecordingDownloader::new(live_ctx.downloader, Arc::clone(&recorder));
        (Self { downloader: Box::new(downloader) }, RecordingSession { recorder })
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, CardError> {
        let replayer = load_cassette(path)
            .map_err(|e| CardError::Config(format!("Failed to load cassette: {e}")))?;
        let downloader = ReplayingDownloader::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { downloader: Box::new(downloader) })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
