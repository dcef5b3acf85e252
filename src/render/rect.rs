use crate::foundation::core::{Rect, Rgba8};
use crate::instruction::{DrawColor, DrawInstruction};
use crate::render::surface::Surface;

/// Colors used by [`RectRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Fill for [`DrawColor::Off`].
    pub off: Rgba8,
    /// Fill for [`DrawColor::On`].
    pub on: Rgba8,
    /// Outline color for every rectangle.
    pub stroke: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            off: Rgba8::BLACK,
            on: Rgba8::WHITE,
            stroke: Rgba8::BLACK,
        }
    }
}

/// Maps one instruction to a filled and a stroked rectangle.
///
/// "On" rectangles shrink by one cell on each axis before scaling, which insets them relative to
/// "off" rectangles of the same grid geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectRenderer {
    scale: u32,
    palette: Palette,
}

impl RectRenderer {
    /// Renderer at `scale` pixels per cell.
    pub fn new(scale: u32, palette: Palette) -> Self {
        Self { scale, palette }
    }

    /// Pixels per grid cell.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Fill color for `color`.
    pub fn fill_color(&self, color: DrawColor) -> Rgba8 {
        match color {
            DrawColor::Off => self.palette.off,
            DrawColor::On => self.palette.on,
        }
    }

    /// Pixel rectangle for `instr`, before normalization.
    ///
    /// Origin is `(origin_x * S, origin_y * S)`, size is `((w - color) * S, (h - color) * S)`.
    /// An "on" instruction with a zero dimension yields a negative extent.
    pub fn pixel_rect(&self, instr: &DrawInstruction) -> Rect {
        let s = i64::from(self.scale);
        let inset = i64::from(instr.color.as_u32());
        let x = i64::from(instr.origin_x) * s;
        let y = i64::from(instr.origin_y) * s;
        let w = (i64::from(instr.w) - inset) * s;
        let h = (i64::from(instr.h) - inset) * s;
        Rect::new(x as f64, y as f64, (x + w) as f64, (y + h) as f64)
    }

    /// Fill then stroke `instr` onto `surface`.
    ///
    /// Any instruction is drawable. The sentinel maps to a `-S x -S` rectangle at the origin, which
    /// clips to nothing.
    pub fn render(&self, instr: &DrawInstruction, surface: &mut Surface) {
        let rect = self.pixel_rect(instr);
        surface.fill_rect(&rect, self.fill_color(instr.color));
        surface.stroke_rect(&rect, self.palette.stroke);
    }
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self::new(3, Palette::default())
    }
}
