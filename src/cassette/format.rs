//! On-disk cassette layout.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session of downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When the session was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Downloads in the order they happened.
    #[serde(default)]
    pub downloads: Vec<RecordedDownload>,
}

/// One download and its outcome: either the fetched bytes or an error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedDownload {
    /// Position within the session.
    pub seq: u64,
    /// The requested URL.
    pub url: String,
    /// Base64-encoded body, for successful downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Error message, for failed downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordedDownload {
    /// A successful download of `body`.
    #[must_use]
    pub fn success(seq: u64, url: impl Into<String>, body: &[u8]) -> Self {
        Self {
            seq,
            url: url.into(),
            data: Some(base64::engine::general_purpose::STANDARD.encode(body)),
            error: None,
        }
    }

    /// A failed download.
    #[must_use]
    pub fn failure(seq: u64, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self { seq, url: url.into(), data: None, error: Some(message.into()) }
    }

    /// The recorded body, or the recorded error message.
    ///
    /// # Errors
    ///
    /// Returns the recorded error, or a description of why the entry is unusable.
    pub fn body(&self) -> Result<Vec<u8>, String> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| format!("Recorded download #{} of {} has no data", self.seq, self.url))?;
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| format!("Recorded download #{} of {} is not valid base64: {e}", self.seq, self.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_decodes() {
        let entry = RecordedDownload::success(0, "https://example.com/a.png", &[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(entry.body().unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn failure_body_is_error() {
        let entry = RecordedDownload::failure(3, "https://example.com/a.png", "connection reset");
        assert_eq!(entry.body().unwrap_err(), "connection reset");
    }

    #[test]
    fn empty_entry_is_error() {
        let entry = RecordedDownload { seq: 1, url: "u".into(), data: None, error: None };
        assert!(entry.body().unwrap_err().contains("no data"));
    }

    #[test]
    fn yaml_omits_missing_fields() {
        let cassette = Cassette {
            name: "t".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            downloads: vec![RecordedDownload::failure(0, "https://example.com/x", "boom")],
        };
        let yaml = serde_yaml::to_string(&cassette).unwrap();
        assert!(yaml.contains("error: boom"));
        assert!(!yaml.contains("data:"));

        let parsed: Cassette = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.downloads[0].url, "https://example.com/x");
    }
}
