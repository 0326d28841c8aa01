//! Resolving remote image sources to local files, and removing them again.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CardError;
use crate::output::sanitize_for_filename;
use crate::ports::Downloader;

/// Whether `source` names a remote image rather than a local path.
#[must_use]
pub fn is_remote(source: &str) -> bool {
    source.starts_with("https://")
}

/// Files downloaded during one run, to be removed with [`Downloads::cleanup`].
#[derive(Debug)]
pub struct Downloads {
    dir: PathBuf,
    run_id: String,
    paths: Vec<PathBuf>,
}

impl Downloads {
    /// Track downloads placed in `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        Self { dir: dir.into(), run_id: format!("{}-{nanos}", std::process::id()), paths: Vec::new() }
    }

    /// Paths recorded so far.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Destination for the next download of `url`, unique within this run.
    #[must_use]
    pub fn temp_path_for(&self, url: &str) -> PathBuf {
        let last_segment = url
            .split(['?', '#'])
            .next()
            .and_then(|u| u.rsplit('/').next())
            .unwrap_or_default();
        let name = sanitize_for_filename(last_segment, 40);
        self.dir.join(format!("socialcard-{}-{}-{name}", self.run_id, self.paths.len()))
    }

    /// Return `source` as a local path, downloading it first when remote.
    ///
    /// The destination is recorded before the transfer starts, so a
    /// partially written file is removed by [`Downloads::cleanup`] too.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the download directory cannot be created, or
    /// the downloader's error when the transfer fails.
    pub async fn resolve(
        &mut self,
        downloader: &dyn Downloader,
        source: &str,
    ) -> Result<PathBuf, CardError> {
        if !is_remote(source) {
            return Ok(PathBuf::from(source));
        }

        std::fs::create_dir_all(&self.dir)?;
        let dest = self.temp_path_for(source);
        self.paths.push(dest.clone());
        let path = downloader.download(source, &dest).await?;
        if path != dest {
            self.paths.push(path.clone());
        }
        tracing::debug!(url = source, path = %path.display(), "downloaded");
        Ok(path)
    }

    /// Delete every recorded download. Returns how many files were removed.
    pub fn cleanup(self) -> usize {
        cleanup(&self.paths)
    }
}

/// Best-effort removal of `paths`; failures are logged, never raised.
///
/// Returns how many files were actually removed.
pub fn cleanup(paths: &[PathBuf]) -> usize {
    paths.iter().filter(|path| remove(path)).count()
}

fn remove(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed download");
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove download");
            false
        }
    }
}
