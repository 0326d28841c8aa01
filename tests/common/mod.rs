//! Shared helpers for the binary tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

/// Absolute path to the crate root.
pub fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// A fresh scratch directory under the system temp dir.
pub fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("socialcard_it_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a solid-colour PNG.
pub fn write_png(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(color)).save(path).unwrap();
}

/// Encode a solid-colour PNG in memory.
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    RgbImage::from_pixel(width, height, Rgb(color)).write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Write a config file pointing at the bundled fonts, icons and default thumbnail.
pub fn write_config(dir: &Path) -> PathBuf {
    let root = root();
    let assets = root.join("assets");
    let fonts = assets.join("fonts");
    let contents = format!(
        "[fonts]\n\
         title = '{}'\n\
         description = '{}'\n\
         footer = '{}'\n\
         \n\
         [assets]\n\
         icons_dir = '{}'\n\
         default_thumbnail = '{}'\n",
        fonts.join("DejaVuSans-Bold.ttf").display(),
        fonts.join("DejaVuSansMono.ttf").display(),
        fonts.join("DejaVuSans.ttf").display(),
        root.join("icons").display(),
        assets.join("default.png").display(),
    );
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}
