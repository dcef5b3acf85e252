use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{GridSpec, Rect, Rgba8};
use crate::foundation::error::{PlaybackError, PlaybackResult};
use crate::render::FrameRGBA;

/// Largest surface side accepted by [`Surface::acquire`].
pub const MAX_SURFACE_SIDE: u32 = 16_384;

/// Pixel dimensions of a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceDesc {
    /// Surface covering `grid` plus its border at the grid's scale.
    pub fn for_grid(grid: &GridSpec) -> Self {
        let (width, height) = grid.pixel_size();
        Self { width, height }
    }
}

impl Default for SurfaceDesc {
    fn default() -> Self {
        Self::for_grid(&GridSpec::default())
    }
}

/// Integer pixel bounds `[x0, x1) x [y0, y1)` clipped to a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelBounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelBounds {
    fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

/// RGBA8 drawing surface (straight alpha, row-major).
///
/// Drawing is opaque overwrite: no blending, no antialiasing. Geometry outside the surface is
/// clipped.
#[derive(Clone, Debug)]
pub struct Surface {
    image: image::RgbaImage,
}

impl Surface {
    /// Allocate a surface cleared to `clear`.
    pub fn acquire(desc: SurfaceDesc, clear: Rgba8) -> PlaybackResult<Self> {
        if desc.width == 0 || desc.height == 0 {
            return Err(PlaybackError::surface_unavailable(format!(
                "surface size {}x{} has no pixels",
                desc.width, desc.height
            )));
        }
        if desc.width > MAX_SURFACE_SIDE || desc.height > MAX_SURFACE_SIDE {
            return Err(PlaybackError::surface_unavailable(format!(
                "surface size {}x{} exceeds {MAX_SURFACE_SIDE}",
                desc.width, desc.height
            )));
        }
        let image =
            image::RgbaImage::from_pixel(desc.width, desc.height, image::Rgba(clear.to_array()));
        Ok(Self { image })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgba8::from(p.0))
    }

    /// Raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Paint every pixel inside `rect`.
    pub fn fill_rect(&mut self, rect: &Rect, color: Rgba8) {
        let b = self.clip(rect);
        if b.is_empty() {
            return;
        }
        let px = image::Rgba(color.to_array());
        for y in b.y0..b.y1 {
            for x in b.x0..b.x1 {
                self.image.put_pixel(x, y, px);
            }
        }
    }

    /// Paint a one-pixel ring along the inner edge of `rect`.
    ///
    /// A rectangle with zero extent on one axis strokes a one-pixel line; zero extent on both axes
    /// draws nothing.
    pub fn stroke_rect(&mut self, rect: &Rect, color: Rgba8) {
        let r = rect.abs();
        if r.width() == 0.0 && r.height() == 0.0 {
            return;
        }
        let ring = Rect::new(r.x0, r.y0, r.x1.max(r.x0 + 1.0), r.y1.max(r.y0 + 1.0));
        let (x0, y0, x1, y1) = (ring.x0, ring.y0, ring.x1, ring.y1);
        self.fill_rect(&Rect::new(x0, y0, x1, y0 + 1.0), color);
        self.fill_rect(&Rect::new(x0, y1 - 1.0, x1, y1), color);
        self.fill_rect(&Rect::new(x0, y0, x0 + 1.0, y1), color);
        self.fill_rect(&Rect::new(x1 - 1.0, y0, x1, y1), color);
    }

    /// Reset every pixel to `color`.
    pub fn clear(&mut self, color: Rgba8) {
        let px = image::Rgba(color.to_array());
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    /// Copy the current pixels out.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.image.as_raw().clone(),
        }
    }

    /// Encode the current pixels as PNG.
    pub fn save_png(&self, path: &Path) -> PlaybackResult<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn clip(&self, rect: &Rect) -> PixelBounds {
        let r = rect.abs();
        let clamp_x = |v: f64| v.round().clamp(0.0, f64::from(self.width())) as u32;
        let clamp_y = |v: f64| v.round().clamp(0.0, f64::from(self.height())) as u32;
        PixelBounds {
            x0: clamp_x(r.x0),
            y0: clamp_y(r.y0),
            x1: clamp_x(r.x1),
            y1: clamp_y(r.y1),
        }
    }
}
