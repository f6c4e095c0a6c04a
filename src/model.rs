use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Canvas constants
// ────────────────────────────────────────────────────────────────────────────

/// Logical canvas width in pixels. Export always renders this full extent.
pub const CANVAS_WIDTH: f32 = 800.0;
/// Logical canvas height in pixels.
pub const CANVAS_HEIGHT: f32 = 600.0;
/// Visual radius of a slot circle.
pub const SLOT_RADIUS: f32 = 30.0;
/// Lower bound for the ring radius, so small slot counts still form a
/// readable circle instead of collapsing onto the center.
pub const MIN_RING_RADIUS: f32 = 100.0;

/// Allowed slot counts.
pub const SLOT_COUNT_RANGE: std::ops::RangeInclusive<usize> = 3..=20;
/// Allowed ring spacing (radial offset on top of the computed radius).
pub const SPACING_RANGE: std::ops::RangeInclusive<f32> = 0.0..=200.0;

// ────────────────────────────────────────────────────────────────────────────
// Geometry primitives
// ────────────────────────────────────────────────────────────────────────────

/// A point in canvas space (pre-viewport coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// The fixed canvas center all slots are arranged around.
pub fn canvas_center() -> Point {
    Point::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Bitmap
// ────────────────────────────────────────────────────────────────────────────

/// A decoded RGBA bitmap.
///
/// Pixel data is deliberately excluded from serde: scene descriptions travel
/// as JSON and images are re-loaded from their sources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl Bitmap {
    /// Decode from raw encoded bytes (PNG, JPEG, …).
    pub fn decode(bytes: &[u8]) -> Result<Self, crate::error::EditError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| crate::error::EditError::Resource(format!("image decode: {e}")))?;
        let rgba = img.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }

    /// Encode as PNG bytes (used for embedding into export SVG).
    pub fn encode_png(&self) -> Result<Vec<u8>, crate::error::EditError> {
        let mut out = Vec::new();
        let enc = image::codecs::png::PngEncoder::new(&mut out);
        image::ImageEncoder::write_image(
            enc,
            &self.rgba,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| crate::error::EditError::Resource(format!("png encode: {e}")))?;
        Ok(out)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scene entities
// ────────────────────────────────────────────────────────────────────────────

/// One ring position. Identity is the index; images do not survive a slot
/// count change (the whole batch is recreated).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    #[serde(skip)]
    pub image: Option<Bitmap>,
}

/// A named, colored, sized edge style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionType {
    pub id: u32,
    /// `#rrggbb` hex color.
    pub color: String,
    /// Line width in pixels, 1..=10.
    pub thickness: f32,
    pub name: String,
}

/// A typed line between two slots. Stored directed (from/to) but rendered
/// undirected. May dangle: `from`/`to` can reference a dropped slot and
/// `type_id` a deleted type; the renderer skips those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: u32,
    pub from: usize,
    pub to: usize,
    pub type_id: u32,
}

/// On-canvas key listing each connection type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    pub visible: bool,
    /// Font size in px, 10..=30. Also the swatch edge length; row pitch is
    /// `font_size + 10`.
    pub font_size: f32,
    pub position: Point,
}

impl LegendConfig {
    pub const DEFAULT_FONT_SIZE: f32 = 14.0;
    pub const DEFAULT_POSITION: Point = Point { x: 550.0, y: 50.0 };
    /// Position slider bounds (canvas minus a margin).
    pub const MAX_X: f32 = 750.0;
    pub const MAX_Y: f32 = 550.0;

    /// Restore font size and position defaults, keeping visibility as-is.
    pub fn reset(&mut self) {
        self.font_size = Self::DEFAULT_FONT_SIZE;
        self.position = Self::DEFAULT_POSITION;
    }
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            visible: true,
            font_size: Self::DEFAULT_FONT_SIZE,
            position: Self::DEFAULT_POSITION,
        }
    }
}

/// Optional watermark image drawn centered at `position`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoOverlay {
    #[serde(skip)]
    pub image: Option<Bitmap>,
    pub position: Point,
    /// 0.1..=3.0
    pub scale: f32,
    /// 0.0..=1.0
    pub opacity: f32,
}

impl Default for LogoOverlay {
    fn default() -> Self {
        Self {
            image: None,
            position: Point::new(20.0, 20.0),
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

/// Styling shared by every slot circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingStyle {
    /// Outline width, 0.5..=5.0 in 0.5 steps.
    pub border_thickness: f32,
    /// `#rrggbb` outline color.
    pub border_color: String,
    /// Radial spacing added to the computed ring radius, 0..=200.
    pub spacing: f32,
}

impl Default for RingStyle {
    fn default() -> Self {
        Self {
            border_thickness: 1.0,
            border_color: "#333333".to_string(),
            spacing: 10.0,
        }
    }
}
