//! Loading cassettes from disk.

use std::path::Path;

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Load a cassette file and create a replayer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    let cassette: Cassette = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
    Ok(CassetteReplayer::new(&cassette))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_valid_cassette() {
        let dir = std::env::temp_dir().join("socialcard_cassette_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.cassette.yaml");
        std::fs::write(
            &path,
            "name: test\n\
             recorded_at: \"2026-02-01T00:00:00Z\"\n\
             commit: abc\n\
             downloads:\n  \
               - seq: 0\n    \
                 url: https://example.com/a.png\n    \
                 data: aGVsbG8=\n",
        )
        .unwrap();

        let mut replayer = load_cassette(&path).unwrap();
        let entry = replayer.next_download("https://example.com/a.png").unwrap();
        assert_eq!(entry.body().unwrap(), b"hello");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_nonexistent_fails() {
        assert!(load_cassette(Path::new("/nonexistent/cassette.yaml")).is_err());
    }

    #[test]
    fn load_malformed_fails() {
        let path = std::env::temp_dir().join("socialcard_cassette_malformed.yaml");
        std::fs::write(&path, "downloads: [[[").unwrap();
        assert!(load_cassette(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
