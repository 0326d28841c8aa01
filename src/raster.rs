//! Raster geometry: loading, resizing, cropping, corner masks, and pasting.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageReader, Luma, RgbaImage};

use crate::error::CardError;
use crate::layout::Coordinates;
use crate::paths::check_path;

/// Open and decode an image, sniffing the format from its contents.
///
/// # Errors
///
/// Returns [`CardError::NotFound`] for a missing path, or the underlying
/// I/O or decoding error.
pub fn open_image(path: &Path) -> Result<DynamicImage, CardError> {
    check_path(path)?;
    Ok(ImageReader::open(path)?.with_guessed_format()?.decode()?)
}

/// Height an image of `width`×`height` has once scaled to `target_width`.
#[must_use]
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return 0;
    }
    let scaled = u64::from(target_width) * u64::from(height) / u64::from(width);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Resize to exactly `target_width` wide, preserving the aspect ratio.
#[must_use]
pub fn fit_width(img: &DynamicImage, target_width: u32) -> DynamicImage {
    let height = scaled_height(img.width(), img.height(), target_width);
    img.resize_exact(target_width, height, FilterType::Lanczos3)
}

/// Crop anything below `max_height`, keeping the top-left anchored.
#[must_use]
pub fn crop_to_height(img: DynamicImage, max_height: u32) -> DynamicImage {
    if img.height() <= max_height {
        return img;
    }
    img.crop_imm(0, 0, img.width(), max_height)
}

/// Alpha mask for a `width`×`height` image with rounded corners.
///
/// Every pixel is opaque except those inside a corner's `radius`×`radius`
/// square that fall outside that corner's quarter circle. A pixel counts as
/// inside when its center lies within the circle.
#[must_use]
pub fn rounded_corner_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let mut mask = GrayImage::from_pixel(width, height, Luma([255]));
    let radius = radius.min(width / 2).min(height / 2);
    if radius == 0 {
        return mask;
    }

    let r = f64::from(radius);
    for dy in 0..radius {
        for dx in 0..radius {
            // Distance from the pixel center to the circle center at (r, r).
            let cx = f64::from(dx) + 0.5 - r;
            let cy = f64::from(dy) + 0.5 - r;
            if cx * cx + cy * cy <= r * r {
                continue;
            }
            let right = width - 1 - dx;
            let bottom = height - 1 - dy;
            for (x, y) in [(dx, dy), (right, dy), (dx, bottom), (right, bottom)] {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
    }
    mask
}

/// Replace the alpha channel of `img` with a rounded-corner mask.
#[must_use]
pub fn round_corners(img: &DynamicImage, radius: u32) -> RgbaImage {
    let mut rgba = img.to_rgba8();
    let mask = rounded_corner_mask(rgba.width(), rgba.height(), radius);
    for (pixel, alpha) in rgba.pixels_mut().zip(mask.pixels()) {
        pixel.0[3] = alpha.0[0];
    }
    rgba
}

/// Paste `top` onto `canvas` at `at`.
///
/// Images carrying an alpha channel are blended; anything else overwrites
/// the destination pixels.
pub fn paste(canvas: &mut RgbaImage, top: &DynamicImage, at: Coordinates) {
    let rgba = top.to_rgba8();
    if top.color().has_alpha() {
        imageops::overlay(canvas, &rgba, i64::from(at.x), i64::from(at.y));
    } else {
        imageops::replace(canvas, &rgba, i64::from(at.x), i64::from(at.y));
    }
}
