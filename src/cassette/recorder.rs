//! Records downloads into a cassette file.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, RecordedDownload};

/// Collects downloads and writes them as a YAML cassette file.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    downloads: Vec<RecordedDownload>,
}

impl CassetteRecorder {
    /// Create a recorder that will write to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self { path: path.into(), name: name.into(), commit: commit.into(), downloads: Vec::new() }
    }

    /// Next sequence number to hand out.
    fn next_seq(&self) -> u64 {
        self.downloads.len() as u64
    }

    /// Record a download that produced `body`.
    pub fn record_success(&mut self, url: &str, body: &[u8]) {
        let entry = RecordedDownload::success(self.next_seq(), url, body);
        self.downloads.push(entry);
    }

    /// Record a download that failed with `message`.
    pub fn record_failure(&mut self, url: &str, message: impl Into<String>) {
        let entry = RecordedDownload::failure(self.next_seq(), url, message);
        self.downloads.push(entry);
    }

    /// Write the cassette YAML file to disk and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            commit: self.commit,
            downloads: self.downloads,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_finish() {
        let dir = std::env::temp_dir().join("socialcard_recorder_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested/downloads.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "test-recording", "deadbeef");
        recorder.record_success("https://example.com/art.png", b"art-bytes");
        recorder.record_failure("https://example.com/missing.png", "404 Not Found");

        let written = recorder.finish().expect("finish should succeed");
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        let cassette: Cassette = serde_yaml::from_str(&content).unwrap();
        assert_eq!(cassette.name, "test-recording");
        assert_eq!(cassette.commit, "deadbeef");
        assert_eq!(cassette.downloads.len(), 2);
        assert_eq!(cassette.downloads[0].seq, 0);
        assert_eq!(cassette.downloads[0].body().unwrap(), b"art-bytes");
        assert_eq!(cassette.downloads[1].seq, 1);
        assert_eq!(cassette.downloads[1].body().unwrap_err(), "404 Not Found");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
