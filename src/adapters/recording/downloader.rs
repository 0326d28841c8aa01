//! Recording adapter for the `Downloader` port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::cassette::recorder::CassetteRecorder;
use crate::error::CardError;
use crate::ports::{DownloadFuture, Downloader};

/// Records every download while delegating to an inner implementation.
pub struct RecordingDownloader {
    inner: Box<dyn Downloader>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingDownloader {
    /// Creates a recording downloader wrapping the given implementation.
    pub fn new(inner: Box<dyn Downloader>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Downloader for RecordingDownloader {
    fn download<'a>(&'a self, url: &'a str, dest: &'a Path) -> DownloadFuture<'a> {
        Box::pin(async move {
            let result = self.inner.download(url, dest).await;
            let body = match &result {
                Ok(path) => std::fs::read(path).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            let mut recorder = self
                .recorder
                .lock()
                .map_err(|e| CardError::Replay(format!("Recorder lock poisoned: {e}")))?;
            match body {
                Ok(bytes) => recorder.record_success(url, &bytes),
                Err(message) => recorder.record_failure(url, message),
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct FixedDownloader(Result<&'static [u8], u16>);

    impl Downloader for FixedDownloader {
        fn download<'a>(&'a self, url: &'a str, dest: &'a Path) -> DownloadFuture<'a> {
            Box::pin(async move {
                match self.0 {
                    Ok(bytes) => {
                        std::fs::write(dest, bytes)?;
                        Ok(dest.to_path_buf())
                    }
                    Err(status) => Err(CardError::Download { url: url.to_string(), status }),
                }
            })
        }
    }

    fn cassette_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("socialcard_recording_{name}.cassette.yaml"))
    }

    fn read_back(path: &Path) -> crate::cassette::format::Cassette {
        serde_yaml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn records_successful_body() {
        let path = cassette_path("ok");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "t", "c")));
        let downloader = RecordingDownloader::new(Box::new(FixedDownloader(Ok(&b"png"[..]))), Arc::clone(&recorder));

        let dest = std::env::temp_dir().join("socialcard_recording_ok.bin");
        let got = downloader.download("https://example.com/a.png", &dest).await.unwrap();
        assert_eq!(got, dest);

        drop(downloader);
        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();
        let cassette = read_back(&path);
        assert_eq!(cassette.downloads.len(), 1);
        assert_eq!(cassette.downloads[0].body().unwrap(), b"png");

        let _ = std::fs::remove_file(&dest);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn records_failure_and_propagates() {
        let path = cassette_path("err");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "t", "c")));
        let downloader = RecordingDownloader::new(Box::new(FixedDownloader(Err(404))), Arc::clone(&recorder));

        let dest = std::env::temp_dir().join("socialcard_recording_err.bin");
        let err = downloader.download("https://example.com/gone.png", &dest).await.unwrap_err();
        assert!(matches!(err, CardError::Download { status: 404, .. }));

        drop(downloader);
        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();
        let cassette = read_back(&path);
        assert!(cassette.downloads[0].body().unwrap_err().contains("404"));

        let _ = std::fs::remove_file(&path);
    }
}
