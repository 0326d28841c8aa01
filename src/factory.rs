//! The card compositor and its fixed drawing pipeline.
//!
//! A card is built in stages on a single canvas:
//! template → title → description → thumbnail → footer → (resize) → save.
//! Every drawing step needs the canvas from [`ImageFactory::create_template`];
//! there is no rollback, so a failed step leaves a partial canvas that the
//! caller should discard.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::config::Config;
use crate::download::Downloads;
use crate::error::CardError;
use crate::layout::{
    Coordinates, ART_POSITION, BG_COLOR, CANVAS_HEIGHT, CANVAS_WIDTH, CORNER_RADIUS,
    DESCRIPTION_COLOR, DESCRIPTION_POSITION, FIRST_ICON_POSITION, FOOTER_COLOR, FOOTER_FONT_SIZE,
    FOOTER_POSITION, ICON_SIZE, ICON_STEP, IMG_POSITION, RESIZED_HEIGHT, THUMBNAIL_MAX_HEIGHT,
    THUMBNAIL_WIDTH, TITLE_COLOR, TITLE_POSITION,
};
use crate::output::save_png;
use crate::ports::Downloader;
use crate::raster::{crop_to_height, fit_width, open_image, paste, round_corners};
use crate::text::{self, Fonts, LINE_SPACING};

/// Where a card is in its drawing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No canvas yet.
    Uninitialized,
    /// Background and artwork are in place.
    CanvasCreated,
    /// Title drawn.
    TitleDrawn,
    /// Description drawn.
    DescriptionDrawn,
    /// Thumbnail pasted.
    ImageComposited,
    /// Footer and tag icons drawn.
    FooterDrawn,
    /// Canvas scaled to its final size.
    Resized,
    /// Written to disk.
    Saved,
}

/// Non-font inputs the factory reads from disk.
#[derive(Debug, Clone)]
pub struct CardAssets {
    /// Text drawn in the footer.
    pub footer_text: String,
    /// Directory holding `<tag>.png` icons.
    pub icons_dir: PathBuf,
    /// Thumbnail used when none is given.
    pub default_thumbnail: PathBuf,
}

impl CardAssets {
    /// Assets as configured, honoring environment overrides.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            footer_text: config.footer.text.clone(),
            icons_dir: config.icons_dir(),
            default_thumbnail: config.assets.default_thumbnail.clone(),
        }
    }
}

/// Everything needed to produce one card.
#[derive(Debug, Clone)]
pub struct CardRequest {
    /// Headline text.
    pub title: String,
    /// Body text beside the thumbnail.
    pub description: String,
    /// Background artwork: a local path or `https://` URL.
    pub art: String,
    /// Thumbnail: a local path or `https://` URL; the default thumbnail when `None`.
    pub thumbnail: Option<String>,
    /// Tags whose icons go in the footer, rightmost first.
    pub tags: Vec<String>,
    /// Final width; the card is squashed to this width and 630px high.
    pub width: Option<u32>,
    /// Where the PNG is written.
    pub output: PathBuf,
}

/// Composes preview cards on a single owned canvas.
///
/// Drawing methods take `&mut self`; use one factory per concurrent card.
pub struct ImageFactory {
    canvas: Option<RgbaImage>,
    stage: Stage,
    fonts: Fonts,
    assets: CardAssets,
}

impl ImageFactory {
    /// Create a factory with no canvas.
    #[must_use]
    pub fn new(fonts: Fonts, assets: CardAssets) -> Self {
        Self { canvas: None, stage: Stage::Uninitialized, fonts, assets }
    }

    /// Create a factory from configuration, loading its fonts.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured font is missing or invalid.
    pub fn from_config(config: &Config) -> Result<Self, CardError> {
        Ok(Self::new(Fonts::load(&config.fonts)?, CardAssets::from_config(config)))
    }

    /// Current pipeline stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The canvas, once created.
    #[must_use]
    pub fn canvas(&self) -> Option<&RgbaImage> {
        self.canvas.as_ref()
    }

    /// Start a fresh canvas with the artwork at [`ART_POSITION`].
    ///
    /// The artwork is scaled to the art region's width, keeping its aspect
    /// ratio. Any previous canvas is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::NotFound`] if `art_path` does not exist, or the
    /// decoding error if it is not an image.
    pub fn create_template(&mut self, art_path: &Path) -> Result<(), CardError> {
        let art = open_image(art_path)?;
        let art = fit_width(&art, ART_POSITION.size.0);

        let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BG_COLOR.opaque());
        paste(&mut canvas, &art, ART_POSITION);

        tracing::debug!(art = %art_path.display(), width = art.width(), height = art.height(), "canvas created");
        self.canvas = Some(canvas);
        self.stage = Stage::CanvasCreated;
        Ok(())
    }

    /// Draw the wrapped title below [`TITLE_POSITION`].
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Uninitialized`] without a canvas.
    pub fn add_title(&mut self, title: &str) -> Result<(), CardError> {
        let canvas = ready(&mut self.canvas, "add a title")?;

        let lines = text::wrap(title, text::title_wrap_width(title));
        if lines.is_empty() {
            tracing::debug!("empty title, nothing to draw");
            self.stage = Stage::TitleDrawn;
            return Ok(());
        }

        let size = text::title_font_size(lines.len());
        let line_height = text::line_height(&self.fonts.title, size);
        #[allow(clippy::cast_precision_loss)]
        let overhead = 100.0 / lines.len() as f32;

        let x = TITLE_POSITION.x as f32;
        let mut y = TITLE_POSITION.y as f32 + overhead;
        let available = (ART_POSITION.x - TITLE_POSITION.x) as f32;
        for line in &lines {
            if text::text_width(&self.fonts.title, size, line) > available {
                tracing::warn!(line = line.as_str(), "title line runs into the artwork");
            }
            text::draw_text(canvas, &self.fonts.title, size, (x, y), line, TITLE_COLOR);
            y += line_height + LINE_SPACING;
        }

        tracing::debug!(lines = lines.len(), size, "title drawn");
        self.stage = Stage::TitleDrawn;
        Ok(())
    }

    /// Draw the wrapped description to the right of the thumbnail.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Uninitialized`] without a canvas.
    pub fn add_description(&mut self, description: &str) -> Result<(), CardError> {
        let canvas = ready(&mut self.canvas, "add a description")?;

        let style = text::description_style(description);
        let lines = text::wrap(description, style.wrap_width);
        let line_height = text::line_height(&self.fonts.description, style.font_size);

        let x = DESCRIPTION_POSITION.x as f32;
        let mut y = DESCRIPTION_POSITION.y as f32 + line_height + LINE_SPACING;
        let available = (CANVAS_WIDTH - DESCRIPTION_POSITION.x) as f32;
        for line in &lines {
            if text::text_width(&self.fonts.description, style.font_size, line) > available {
                tracing::warn!(line = line.as_str(), "description line runs off the canvas");
            }
            text::draw_text(canvas, &self.fonts.description, style.font_size, (x, y), line, DESCRIPTION_COLOR);
            y += line_height + LINE_SPACING;
        }

        tracing::debug!(lines = lines.len(), size = style.font_size, "description drawn");
        self.stage = Stage::DescriptionDrawn;
        Ok(())
    }

    /// Paste a thumbnail with rounded corners at [`IMG_POSITION`].
    ///
    /// The image is scaled to 1280px wide; anything taller than 16:9 is
    /// cropped from the bottom. Without `img_path` the configured default
    /// thumbnail is used.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Uninitialized`] without a canvas,
    /// [`CardError::NotFound`] for a missing file, or the decoding error.
    pub fn add_image(&mut self, img_path: Option<&Path>) -> Result<(), CardError> {
        if self.canvas.is_none() {
            return Err(CardError::Uninitialized { operation: "add an image" });
        }
        let path = img_path.unwrap_or(&self.assets.default_thumbnail);

        let img = open_image(path)?;
        let img = crop_to_height(fit_width(&img, THUMBNAIL_WIDTH), THUMBNAIL_MAX_HEIGHT);
        let rounded = DynamicImage::ImageRgba8(round_corners(&img, CORNER_RADIUS));

        let canvas = ready(&mut self.canvas, "add an image")?;
        paste(canvas, &rounded, IMG_POSITION);

        tracing::debug!(image = %path.display(), width = img.width(), height = img.height(), "thumbnail composited");
        self.stage = Stage::ImageComposited;
        Ok(())
    }

    /// Draw the footer text and an icon for each tag that has one.
    ///
    /// Icons are laid out right to left from [`FIRST_ICON_POSITION`]. Tags
    /// without an icon file are skipped and take no slot.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Uninitialized`] without a canvas, or the decoding
    /// error of an icon file that exists but is not an image.
    pub fn add_footer(&mut self, tags: &[String]) -> Result<(), CardError> {
        let canvas = ready(&mut self.canvas, "add a footer")?;

        let origin = (FOOTER_POSITION.x as f32, FOOTER_POSITION.y as f32);
        text::draw_text(canvas, &self.fonts.footer, FOOTER_FONT_SIZE, origin, &self.assets.footer_text, FOOTER_COLOR);

        let mut placed = 0u32;
        for tag in tags {
            let Some(icon_path) = icon_path(&self.assets.icons_dir, tag) else {
                tracing::debug!(tag, "skipping tag with unusable name");
                continue;
            };
            if !icon_path.exists() {
                tracing::debug!(tag, path = %icon_path.display(), "no icon for tag");
                continue;
            }
            let Some(x) = FIRST_ICON_POSITION.x.checked_sub(placed * ICON_STEP) else {
                tracing::warn!(tag, "no room left for tag icon");
                break;
            };

            let icon = open_image(&icon_path)?.resize_exact(ICON_SIZE, ICON_SIZE, FilterType::Lanczos3);
            paste(canvas, &icon, Coordinates::at(x, FIRST_ICON_POSITION.y));
            placed += 1;
        }

        tracing::debug!(icons = placed, "footer drawn");
        self.stage = Stage::FooterDrawn;
        Ok(())
    }

    /// Squash the canvas to `width`×630, ignoring its aspect ratio.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Uninitialized`] without a canvas, or
    /// [`CardError::InvalidArgument`] for a zero width.
    pub fn resize(&mut self, width: u32) -> Result<(), CardError> {
        let canvas = ready(&mut self.canvas, "resize")?;
        if width == 0 {
            return Err(CardError::InvalidArgument("resize width must be positive".to_string()));
        }
        *canvas = imageops::resize(canvas, width, RESIZED_HEIGHT, FilterType::Lanczos3);
        self.stage = Stage::Resized;
        Ok(())
    }

    /// Write the canvas to `path` as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Uninitialized`] without a canvas, or the I/O or
    /// encoding error.
    pub fn save(&mut self, path: &Path) -> Result<(), CardError> {
        let canvas = ready(&mut self.canvas, "save")?;
        save_png(canvas, path)?;
        tracing::debug!(path = %path.display(), "card saved");
        self.stage = Stage::Saved;
        Ok(())
    }

    /// Run the whole pipeline for `request` and return the output path.
    ///
    /// Remote art and thumbnails are fetched with `downloader` into
    /// `downloads`, and those files are removed before returning whether
    /// or not the card was produced.
    ///
    /// # Errors
    ///
    /// Returns the first download or drawing error; the canvas is then left
    /// unsaved.
    pub async fn generate(
        &mut self,
        downloader: &dyn Downloader,
        mut downloads: Downloads,
        request: &CardRequest,
    ) -> Result<PathBuf, CardError> {
        let result = self.compose(downloader, &mut downloads, request).await;
        tracing::debug!(downloaded = downloads.paths().len(), "pipeline finished");
        let removed = downloads.cleanup();
        if removed > 0 {
            tracing::debug!(removed, "cleaned up downloads");
        }
        result
    }

    async fn compose(
        &mut self,
        downloader: &dyn Downloader,
        downloads: &mut Downloads,
        request: &CardRequest,
    ) -> Result<PathBuf, CardError> {
        let art = downloads.resolve(downloader, &request.art).await?;
        let thumbnail = match &request.thumbnail {
            Some(source) => Some(downloads.resolve(downloader, source).await?),
            None => None,
        };

        self.canvas = None;
        self.stage = Stage::Uninitialized;

        self.create_template(&art)?;
        self.add_title(&request.title)?;
        self.add_description(&request.description)?;
        self.add_image(thumbnail.as_deref())?;
        self.add_footer(&request.tags)?;
        if let Some(width) = request.width {
            self.resize(width)?;
        }
        self.save(&request.output)?;
        Ok(request.output.clone())
    }
}

fn ready<'a>(
    canvas: &'a mut Option<RgbaImage>,
    operation: &'static str,
) -> Result<&'a mut RgbaImage, CardError> {
    canvas.as_mut().ok_or(CardError::Uninitialized { operation })
}

/// `<icons_dir>/<tag>.png`, or `None` for tags that could escape `icons_dir`.
fn icon_path(icons_dir: &Path, tag: &str) -> Option<PathBuf> {
    if tag.is_empty() || tag.contains(['/', '\\']) || tag.contains("..") {
        return None;
    }
    Some(icons_dir.join(format!("{tag}.png")))
}
