//! File naming and saving the finished card.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::CardError;

/// Default output path when none is given.
pub const DEFAULT_OUTPUT: &str = "output.png";

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true;

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// Resolve the output path: use explicit path or [`DEFAULT_OUTPUT`].
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>) -> PathBuf {
    PathBuf::from(explicit.unwrap_or(DEFAULT_OUTPUT))
}

/// Encode the canvas as an opaque RGB PNG at `path`.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the PNG
/// cannot be written.
pub fn save_png(canvas: &RgbaImage, path: &Path) -> Result<(), CardError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let rgb = DynamicImage::ImageRgba8(canvas.clone()).to_rgb8();
    rgb.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
