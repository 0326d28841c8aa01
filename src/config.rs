//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Font file locations.
    #[serde(default)]
    pub fonts: FontsConfig,

    /// Icon directory and default thumbnail.
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Footer text.
    #[serde(default)]
    pub footer: FooterConfig,

    /// Where remote images are downloaded to.
    #[serde(default)]
    pub download: DownloadConfig,
}

/// Font file locations, relative to the working directory unless absolute.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Title face.
    pub title: PathBuf,
    /// Description face.
    pub description: PathBuf,
    /// Footer face.
    pub footer: PathBuf,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            title: PathBuf::from("assets/fonts/DejaVuSans-Bold.ttf"),
            description: PathBuf::from("assets/fonts/DejaVuSansMono.ttf"),
            footer: PathBuf::from("assets/fonts/DejaVuSans.ttf"),
        }
    }
}

/// Locations of bundled images.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding `<tag>.png` icons.
    pub icons_dir: PathBuf,
    /// Thumbnail used when none is given.
    pub default_thumbnail: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { icons_dir: PathBuf::from("icons"), default_thumbnail: PathBuf::from("assets/default.png") }
    }
}

/// Footer text drawn along the bottom of every card.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    /// The footer string.
    pub text: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self { text: "Read the full post on the blog".to_string() }
    }
}

/// Download settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Directory for downloaded images; the system temp dir when unset.
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Icon directory, preferring `SOCIALCARD_ICONS_DIR`.
    #[must_use]
    pub fn icons_dir(&self) -> PathBuf {
        std::env::var_os("SOCIALCARD_ICONS_DIR")
            .map_or_else(|| self.assets.icons_dir.clone(), PathBuf::from)
    }

    /// Download directory, preferring `SOCIALCARD_DOWNLOAD_DIR`, then the
    /// config file, then the system temp dir.
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        std::env::var_os("SOCIALCARD_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .or_else(|| self.download.dir.clone())
            .unwrap_or_else(std::env::temp_dir)
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `SOCIALCARD_CONFIG` environment variable
/// 3. `~/.config/socialcard/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("SOCIALCARD_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/socialcard/config.toml")
    } else {
        PathBuf::from("socialcard.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.fonts.title, PathBuf::from("assets/fonts/DejaVuSans-Bold.ttf"));
        assert_eq!(config.assets.icons_dir, PathBuf::from("icons"));
        assert_eq!(config.assets.default_thumbnail, PathBuf::from("assets/default.png"));
        assert!(!config.footer.text.is_empty());
        assert!(config.download.dir.is_none());
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.assets.icons_dir, PathBuf::from("icons"));
    }

    #[test]
    fn load_valid_toml() {
        let dir = std::env::temp_dir().join("socialcard_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[fonts]
title = "/fonts/title.ttf"

[assets]
icons_dir = "/srv/icons"

[footer]
text = "example.dev"

[download]
dir = "/var/tmp/cards"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.fonts.title, PathBuf::from("/fonts/title.ttf"));
        // Unset keys in a present section keep their defaults.
        assert_eq!(config.fonts.footer, PathBuf::from("assets/fonts/DejaVuSans.ttf"));
        assert_eq!(config.assets.icons_dir, PathBuf::from("/srv/icons"));
        assert_eq!(config.assets.default_thumbnail, PathBuf::from("assets/default.png"));
        assert_eq!(config.footer.text, "example.dev");
        assert_eq!(config.download.dir, Some(PathBuf::from("/var/tmp/cards")));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_invalid_toml() {
        let dir = std::env::temp_dir().join("socialcard_config_bad_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(Config::load(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
