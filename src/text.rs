//! Word wrapping, text sizing policies, and glyph rendering.
//!
//! Wrapping works on character counts rather than pixel widths: the wrap
//! widths below were picked to roughly fill each region at the chosen font
//! size.

use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::RgbaImage;

use crate::config::FontsConfig;
use crate::error::CardError;
use crate::layout::Rgb;
use crate::paths::check_path;

/// Titles longer than this wrap at [`TITLE_WIDE_WRAP`].
const TITLE_LONG_THRESHOLD: usize = 35;
const TITLE_WRAP: usize = 30;
const TITLE_WIDE_WRAP: usize = 35;
const TITLE_SINGLE_LINE_SIZE: f32 = 120.0;
const TITLE_MULTI_LINE_SIZE: f32 = 100.0;

/// Descriptions longer than this switch to the compact style.
const DESCRIPTION_LONG_THRESHOLD: usize = 200;

/// Pixels added between consecutive lines.
pub const LINE_SPACING: f32 = 5.0;

/// Wrap width and font size chosen for a block of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Maximum characters per line.
    pub wrap_width: usize,
    /// Font size in pixels.
    pub font_size: f32,
}

/// Wrap width for a title, based on its raw length.
#[must_use]
pub fn title_wrap_width(title: &str) -> usize {
    if title.chars().count() > TITLE_LONG_THRESHOLD {
        TITLE_WIDE_WRAP
    } else {
        TITLE_WRAP
    }
}

/// Font size for a title that wrapped into `line_count` lines.
#[must_use]
pub fn title_font_size(line_count: usize) -> f32 {
    if line_count == 1 {
        TITLE_SINGLE_LINE_SIZE
    } else {
        TITLE_MULTI_LINE_SIZE
    }
}

/// Two-tier style for descriptions: long text gets a wider wrap and a smaller font.
#[must_use]
pub fn description_style(description: &str) -> TextStyle {
    if description.chars().count() > DESCRIPTION_LONG_THRESHOLD {
        TextStyle { wrap_width: 35, font_size: 35.0 }
    } else {
        TextStyle { wrap_width: 25, font_size: 50.0 }
    }
}

/// Greedy word wrap to at most `width` characters per line.
///
/// Runs of whitespace collapse to a single space, whitespace never starts or
/// ends a line, hyphenated words may break after a hyphen, and words longer
/// than `width` are split across lines.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        for (index, piece) in hyphen_pieces(word).into_iter().enumerate() {
            // Pieces after the first continue the same word: no space before them.
            let glued = index > 0;
            let mut rest = piece;
            let mut rest_len = piece.chars().count();

            loop {
                let gap = usize::from(line_len > 0 && !glued);
                if line_len + gap + rest_len <= width {
                    if gap > 0 {
                        line.push(' ');
                    }
                    line.push_str(rest);
                    line_len += gap + rest_len;
                    break;
                }

                if rest_len <= width {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                    continue;
                }

                // Too long for any line: fill what is left of this one.
                let room = width.saturating_sub(line_len + gap);
                if room == 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                    continue;
                }
                let split = rest.char_indices().nth(room).map_or(rest.len(), |(i, _)| i);
                if gap > 0 {
                    line.push(' ');
                }
                line.push_str(&rest[..split]);
                lines.push(std::mem::take(&mut line));
                line_len = 0;
                rest = &rest[split..];
                rest_len -= room;
            }
        }
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}

/// Split `word` after each hyphen that sits between two alphanumerics.
fn hyphen_pieces(word: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = word.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let between_letters = prev.is_some_and(char::is_alphanumeric)
            && chars.peek().is_some_and(|&(_, next)| next.is_alphanumeric());
        if c == '-' && between_letters {
            pieces.push(&word[start..=i]);
            start = i + 1;
        }
        prev = Some(c);
    }
    pieces.push(&word[start..]);
    pieces
}

/// The three faces used on a card.
pub struct Fonts {
    /// Title face.
    pub title: FontVec,
    /// Description face.
    pub description: FontVec,
    /// Footer face.
    pub footer: FontVec,
}

impl Fonts {
    /// Load every configured font file.
    ///
    /// # Errors
    ///
    /// Returns an error if a font file is missing or cannot be parsed.
    pub fn load(config: &FontsConfig) -> Result<Self, CardError> {
        Ok(Self {
            title: load_font(&config.title)?,
            description: load_font(&config.description)?,
            footer: load_font(&config.footer)?,
        })
    }
}

/// Read and parse a single TrueType/OpenType font.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, or not a font.
pub fn load_font(path: &Path) -> Result<FontVec, CardError> {
    check_path(path)?;
    let data = std::fs::read(path)?;
    FontVec::try_from_vec(data)
        .map_err(|e| CardError::Font(format!("Failed to parse {}: {e}", path.display())))
}

/// Height of one line of text at `size`, from the top of the ascender to
/// the bottom of the descender.
#[must_use]
pub fn line_height(font: &FontVec, size: f32) -> f32 {
    font.as_scaled(PxScale::from(size)).height()
}

/// Horizontal extent of `text` at `size`, including kerning.
#[must_use]
pub fn text_width(font: &FontVec, size: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Draw a single line of text with its top-left corner at `(x, y)`.
///
/// Glyph coverage is blended over the existing pixels; anything falling
/// outside the canvas is clipped.
pub fn draw_text(
    canvas: &mut RgbaImage,
    font: &FontVec,
    size: f32,
    (x, y): (f32, f32),
    text: &str,
    color: Rgb,
) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let baseline = y + scaled.ascent();
    let (width, height) = canvas.dimensions();

    let mut caret = x;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        previous = Some(id);

        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x + gx as f32;
            let py = bounds.min.y + gy as f32;
            if px < 0.0 || py < 0.0 {
                return;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (px, py) = (px as u32, py as u32);
            if px >= width || py >= height {
                return;
            }
            blend(canvas.get_pixel_mut(px, py), color, coverage);
        });
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(pixel: &mut image::Rgba<u8>, color: Rgb, coverage: f32) {
    let coverage = coverage.clamp(0.0, 1.0);
    let mix = |under: u8, over: u8| -> u8 {
        (f32::from(under) * (1.0 - coverage) + f32::from(over) * coverage).round() as u8
    };
    let [r, g, b, a] = pixel.0;
    let alpha = (f32::from(a) + (255.0 - f32::from(a)) * coverage).round() as u8;
    pixel.0 = [mix(r, color.r), mix(g, color.g), mix(b, color.b), alpha];
}
