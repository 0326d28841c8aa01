//! Value types and the fixed card layout.

/// A placement on the canvas, optionally carrying target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinates {
    /// Horizontal offset from the left edge.
    pub x: u32,
    /// Vertical offset from the top edge.
    pub y: u32,
    /// Target `(width, height)`; `(0, 0)` when unused.
    pub size: (u32, u32),
}

impl Coordinates {
    /// A placement without target dimensions.
    #[must_use]
    pub const fn at(x: u32, y: u32) -> Self {
        Self { x, y, size: (0, 0) }
    }

    /// A placement with target dimensions.
    #[must_use]
    pub const fn sized(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, size: (width, height) }
    }
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Build a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The fully opaque RGBA pixel for this color.
    #[must_use]
    pub const fn opaque(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

/// Width of a full-size card.
pub const CANVAS_WIDTH: u32 = 2240;
/// Height of a full-size card.
pub const CANVAS_HEIGHT: u32 = 1260;
/// Canvas fill behind everything else.
pub const BG_COLOR: Rgb = Rgb::new(24, 26, 33);

/// Artwork is scaled to `size.0` wide; the height follows the aspect ratio.
pub const ART_POSITION: Coordinates = Coordinates::sized(1760, 40, 420, 0);

/// Top-left of the title block.
pub const TITLE_POSITION: Coordinates = Coordinates::at(80, 40);
/// Title text color.
pub const TITLE_COLOR: Rgb = Rgb::new(231, 237, 235);

/// Region the rounded thumbnail is pasted into.
pub const IMG_POSITION: Coordinates = Coordinates::sized(80, 400, THUMBNAIL_WIDTH, THUMBNAIL_MAX_HEIGHT);
/// Thumbnails are scaled to this width.
pub const THUMBNAIL_WIDTH: u32 = 1280;
/// 16:9 at [`THUMBNAIL_WIDTH`].
pub const THUMBNAIL_MAX_HEIGHT: u32 = 720;
/// Radius of the thumbnail's rounded corners.
pub const CORNER_RADIUS: u32 = 40;

/// Top-left of the description block, right of the thumbnail.
pub const DESCRIPTION_POSITION: Coordinates =
    Coordinates::at(IMG_POSITION.x + THUMBNAIL_WIDTH + 30, IMG_POSITION.y);
/// Description text color.
pub const DESCRIPTION_COLOR: Rgb = Rgb::new(255, 255, 255);

/// Top-left of the footer text.
pub const FOOTER_POSITION: Coordinates = Coordinates::at(80, 1160);
/// Footer font size in pixels.
pub const FOOTER_FONT_SIZE: f32 = 50.0;
/// Footer text color.
pub const FOOTER_COLOR: Rgb = Rgb::new(160, 166, 175);

/// Tag icons are scaled to this square size.
pub const ICON_SIZE: u32 = 100;
/// Horizontal distance between neighbouring tag icons.
pub const ICON_STEP: u32 = 120;
/// Rightmost tag icon; later icons move left by [`ICON_STEP`].
pub const FIRST_ICON_POSITION: Coordinates =
    Coordinates::sized(CANVAS_WIDTH - 80 - ICON_SIZE, 1145, ICON_SIZE, ICON_SIZE);

/// Height of a card after [`crate::factory::ImageFactory::resize`].
pub const RESIZED_HEIGHT: u32 = 630;
