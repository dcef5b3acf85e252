use crate::foundation::error::{PlaybackError, PlaybackResult};

pub use kurbo::{Point, Rect, Size};

/// 0-based index of a frame pushed to a sink. Frame 0 is the initial `create()` render.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The index that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Logical grid the instructions address, and how it maps onto pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Number of grid columns.
    pub cols: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Extra cells added to each dimension around the grid.
    pub border: u32,
    /// Pixels per grid cell.
    pub scale: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            cols: 128,
            rows: 128,
            border: 3,
            scale: 3,
        }
    }
}

impl GridSpec {
    /// Reject grids that cannot map to a drawable surface.
    pub fn validate(&self) -> PlaybackResult<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(PlaybackError::validation("grid must have at least one cell"));
        }
        if self.scale == 0 {
            return Err(PlaybackError::validation("grid scale must be > 0"));
        }
        Ok(())
    }

    /// Surface size in pixels: `(cells + border) * scale` per dimension.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = self.cols.saturating_add(self.border).saturating_mul(self.scale);
        let h = self.rows.saturating_add(self.border).saturating_mul(self.scale);
        (w, h)
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque color from its channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Channels as an array, in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}
