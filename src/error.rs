//! Unified error type for socialcard.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a preview card.
#[derive(Debug, Error)]
pub enum CardError {
    /// A referenced file does not exist.
    #[error("{} not found", path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A drawing step ran before the canvas was created.
    #[error("Cannot {operation}: no canvas yet. Create one with create_template first")]
    Uninitialized {
        /// The drawing step that was attempted.
        operation: &'static str,
    },

    /// Decoding, resizing or encoding an image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A remote server refused a download.
    #[error("Download of {url} failed with status {status}")]
    Download {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// A font file could not be parsed.
    #[error("Font error: {0}")]
    Font(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A cassette could not serve a recorded download.
    #[error("Replay error: {0}")]
    Replay(String),
}
