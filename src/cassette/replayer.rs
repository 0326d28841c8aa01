//! Serves recorded downloads back by URL.

use std::collections::HashMap;

use super::format::{Cassette, RecordedDownload};

/// Replays downloads from a loaded cassette. Each URL's recordings are
/// served in the order they were made.
pub struct CassetteReplayer {
    queues: HashMap<String, Vec<RecordedDownload>>,
    cursors: HashMap<String, usize>,
}

impl CassetteReplayer {
    /// Index a loaded cassette by URL.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<String, Vec<RecordedDownload>> = HashMap::new();
        for entry in &cassette.downloads {
            queues.entry(entry.url.clone()).or_default().push(entry.clone());
        }
        for queue in queues.values_mut() {
            queue.sort_by_key(|entry| entry.seq);
        }
        Self { queues, cursors: HashMap::new() }
    }

    /// Return the next recording for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` was never recorded or all of its
    /// recordings have already been served.
    pub fn next_download(&mut self, url: &str) -> Result<&RecordedDownload, String> {
        let Some(queue) = self.queues.get(url) else {
            let mut known: Vec<&str> = self.queues.keys().map(String::as_str).collect();
            known.sort_unstable();
            return Err(format!(
                "Cassette has no download recorded for {url}. Recorded URLs: [{}]",
                known.join(", ")
            ));
        };

        let cursor = self.cursors.entry(url.to_string()).or_insert(0);
        let Some(entry) = queue.get(*cursor) else {
            return Err(format!(
                "Cassette exhausted: all {} downloads of {url} have been served",
                queue.len()
            ));
        };
        *cursor += 1;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_cassette(downloads: Vec<RecordedDownload>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), commit: "abc".into(), downloads }
    }

    #[test]
    fn replays_per_url_in_order() {
        let cassette = make_cassette(vec![
            RecordedDownload::success(0, "https://a.test/art.png", b"first"),
            RecordedDownload::success(1, "https://a.test/thumb.png", b"thumb"),
            RecordedDownload::success(2, "https://a.test/art.png", b"second"),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_download("https://a.test/art.png").unwrap().seq, 0);
        assert_eq!(replayer.next_download("https://a.test/thumb.png").unwrap().seq, 1);
        assert_eq!(replayer.next_download("https://a.test/art.png").unwrap().seq, 2);
    }

    #[test]
    fn exhausted_url_errors() {
        let cassette = make_cassette(vec![RecordedDownload::success(0, "https://a.test/x", b"x")]);
        let mut replayer = CassetteReplayer::new(&cassette);
        assert!(replayer.next_download("https://a.test/x").is_ok());
        let err = replayer.next_download("https://a.test/x").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
    }

    #[test]
    fn unknown_url_lists_recorded() {
        let cassette = make_cassette(vec![RecordedDownload::success(0, "https://a.test/x", b"x")]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let err = replayer.next_download("https://b.test/y").unwrap_err();
        assert!(err.contains("no download recorded"));
        assert!(err.contains("https://a.test/x"));
    }
}
