//! Draw instructions exchanged between generators and the player.

use crate::foundation::error::PlaybackError;

/// On/off color flag of an instruction. Serialized as `0` or `1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum DrawColor {
    /// Background ("off") cells.
    Off = 0,
    /// Room ("on") cells.
    On = 1,
}

impl DrawColor {
    /// Numeric value of the flag.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

impl From<DrawColor> for u8 {
    fn from(c: DrawColor) -> Self {
        c as u8
    }
}

impl TryFrom<u8> for DrawColor {
    type Error = PlaybackError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(PlaybackError::serde(format!(
                "draw color must be 0 or 1, got {other}"
            ))),
        }
    }
}

/// One rectangle request in grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DrawInstruction {
    /// Fill flag.
    pub color: DrawColor,
    /// Grid column of the upper-left corner.
    #[serde(alias = "originX")]
    pub origin_x: u32,
    /// Grid row of the upper-left corner.
    #[serde(alias = "originY")]
    pub origin_y: u32,
    /// Width in cells.
    pub w: u32,
    /// Height in cells.
    pub h: u32,
}

/// End-of-stream marker. Detection is structural: any equal instruction ends playback.
pub const SENTINEL: DrawInstruction = DrawInstruction {
    color: DrawColor::On,
    origin_x: 0,
    origin_y: 0,
    w: 0,
    h: 0,
};

impl DrawInstruction {
    /// Build an instruction from its fields.
    pub const fn new(color: DrawColor, origin_x: u32, origin_y: u32, w: u32, h: u32) -> Self {
        Self {
            color,
            origin_x,
            origin_y,
            w,
            h,
        }
    }

    /// Return `true` when this value equals [`SENTINEL`].
    pub fn is_sentinel(&self) -> bool {
        *self == SENTINEL
    }
}
