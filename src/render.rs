//! Instruction rasterization.

mod rect;
mod surface;

pub use rect::{Palette, RectRenderer};
pub use surface::{MAX_SURFACE_SIDE, Surface, SurfaceDesc};

/// A copy of a surface's pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Straight-alpha RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}
