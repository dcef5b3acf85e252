//! Binary-space-partition room generator.
//!
//! The map is quartered level by level while a quad can still hold the largest room in each half.
//! A random subset of the final quads each receives one room. Playback draws the whole map as
//! background first, then one room per `next()` call.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::error::{PlaybackError, PlaybackResult};
use crate::generator::Generator;
use crate::instruction::{DrawColor, DrawInstruction, SENTINEL};
use crate::render::MAX_SURFACE_SIDE;

/// Cells added around the map by the background instruction.
const BACKGROUND_MARGIN: u32 = 3;

/// Largest accepted map side in cells.
pub const MAX_MAP_SIDE: u32 = MAX_SURFACE_SIDE;

/// Deepest accepted partition; `4^MAX_SPLIT_DEPTH` quads at most.
pub const MAX_SPLIT_DEPTH: u32 = 8;

/// Generation parameters.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BspParams {
    /// Map width in cells.
    pub map_width: u32,
    /// Map height in cells.
    pub map_height: u32,
    /// Smallest room side, inclusive.
    pub min_room: u32,
    /// Largest room side; also the split threshold.
    pub max_room: u32,
    /// Number of rooms to place.
    pub num_rooms: u32,
    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for BspParams {
    fn default() -> Self {
        Self {
            map_width: 128,
            map_height: 128,
            min_room: 9,
            max_room: 31,
            num_rooms: 8,
            seed: None,
        }
    }
}

impl BspParams {
    /// Reject parameter sets that cannot produce rooms.
    pub fn validate(&self) -> PlaybackResult<()> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(PlaybackError::validation("bsp map dimensions must be > 0"));
        }
        if self.map_width > MAX_MAP_SIDE || self.map_height > MAX_MAP_SIDE {
            return Err(PlaybackError::validation(format!(
                "bsp map {}x{} exceeds {MAX_MAP_SIDE} cells per side",
                self.map_width, self.map_height
            )));
        }
        if self.min_room == 0 || self.max_room == 0 {
            return Err(PlaybackError::validation("bsp min_room and max_room must be >= 1"));
        }
        if self.min_room > self.max_room {
            return Err(PlaybackError::validation(format!(
                "bsp min_room ({}) must be <= max_room ({})",
                self.min_room, self.max_room
            )));
        }
        let depth = self.split_depth();
        if depth > MAX_SPLIT_DEPTH {
            return Err(PlaybackError::validation(format!(
                "bsp max_room ({}) splits the map {depth} levels deep (limit {MAX_SPLIT_DEPTH})",
                self.max_room
            )));
        }
        Ok(())
    }

    /// Number of quartering levels [`map_quads`] performs.
    pub fn split_depth(&self) -> u32 {
        let (mut w, mut h) = (self.map_width, self.map_height);
        let mut depth = 0;
        while self.max_room > 0 && self.max_room <= w / 2 && self.max_room <= h / 2 {
            w /= 2;
            h /= 2;
            depth += 1;
        }
        depth
    }
}

/// Axis-aligned map region in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quad {
    /// Upper-left cell.
    pub origin: (u32, u32),
    /// Width and height in cells.
    pub dims: (u32, u32),
}

impl Quad {
    /// Four equal children, or none when a half could not hold `max_room`.
    fn split(&self, max_room: u32) -> Vec<Quad> {
        let half_w = self.dims.0 / 2;
        let half_h = self.dims.1 / 2;
        if max_room > half_w || max_room > half_h {
            return vec![];
        }
        let (x, y) = self.origin;
        let dims = (half_w, half_h);
        vec![
            Quad {
                origin: (x, y),
                dims,
            },
            Quad {
                origin: (x + half_w, y),
                dims,
            },
            Quad {
                origin: (x, y + half_h),
                dims,
            },
            Quad {
                origin: (x + half_w, y + half_h),
                dims,
            },
        ]
    }

    fn gen_room(&self, min_room: u32, rng: &mut StdRng) -> Room {
        let width = range_or_low(rng, min_room, self.dims.0);
        let height = range_or_low(rng, min_room, self.dims.1);
        let x = range_or_low(
            rng,
            self.origin.0,
            self.origin.0 + self.dims.0.saturating_sub(width),
        );
        let y = range_or_low(
            rng,
            self.origin.1,
            self.origin.1 + self.dims.1.saturating_sub(height),
        );
        Room {
            origin: (x, y),
            width,
            height,
        }
    }
}

/// A placed room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    /// Upper-left cell.
    pub origin: (u32, u32),
    /// Cells to the right.
    pub width: u32,
    /// Cells downward.
    pub height: u32,
}

impl Room {
    fn to_instruction(self) -> DrawInstruction {
        DrawInstruction::new(
            DrawColor::On,
            self.origin.0,
            self.origin.1,
            self.width,
            self.height,
        )
    }
}

/// Half-open `[low, high)` sample; an empty range yields `low`.
fn range_or_low(rng: &mut StdRng, low: u32, high: u32) -> u32 {
    if high <= low {
        return low;
    }
    rng.gen_range(low..high)
}

/// Quarter the map until a level produces no children; return the last non-empty level.
///
/// A map too small to split at all yields the whole map as the only quad.
pub fn map_quads(params: &BspParams) -> Vec<Quad> {
    let root = Quad {
        origin: (0, 0),
        dims: (params.map_width, params.map_height),
    };
    let mut quads = root.split(params.max_room);
    if quads.is_empty() {
        return vec![root];
    }
    loop {
        let next: Vec<Quad> = quads
            .iter()
            .flat_map(|q| q.split(params.max_room))
            .collect();
        if next.is_empty() || next.len() == quads.len() {
            break;
        }
        quads = next;
    }
    quads
}

/// Room generator driven by [`BspParams`].
pub struct BspGenerator {
    params: BspParams,
    rng: StdRng,
    rooms: Vec<Room>,
    created: bool,
}

impl BspGenerator {
    /// Validate `params` and seed the RNG.
    pub fn new(params: BspParams) -> PlaybackResult<Self> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            params,
            rng,
            rooms: Vec::new(),
            created: false,
        })
    }

    /// Rooms not yet emitted, in emission order reversed.
    pub fn pending_rooms(&self) -> &[Room] {
        &self.rooms
    }

    fn background(&self) -> PlaybackResult<DrawInstruction> {
        let w = self.params.map_width.checked_add(BACKGROUND_MARGIN);
        let h = self.params.map_height.checked_add(BACKGROUND_MARGIN);
        match (w, h) {
            (Some(w), Some(h)) => Ok(DrawInstruction::new(DrawColor::Off, 0, 0, w, h)),
            _ => Err(PlaybackError::validation("bsp map too large for its background")),
        }
    }
}

impl Generator for BspGenerator {
    #[tracing::instrument(skip(self), fields(seed = ?self.params.seed))]
    fn create(&mut self) -> PlaybackResult<DrawInstruction> {
        if self.created {
            return Err(PlaybackError::generator("create() called twice"));
        }
        self.created = true;

        let mut quads = map_quads(&self.params);
        let wanted = self.params.num_rooms as usize;
        if quads.len() < wanted {
            tracing::warn!(
                quads = quads.len(),
                wanted,
                "fewer quads than requested rooms; placing one room per quad"
            );
        }
        // Every remaining quad is a candidate, the last one included.
        while self.rooms.len() < wanted && !quads.is_empty() {
            let pick = self.rng.gen_range(0..quads.len());
            let quad = quads.swap_remove(pick);
            let room = quad.gen_room(self.params.min_room, &mut self.rng);
            self.rooms.push(room);
        }
        tracing::debug!(rooms = self.rooms.len(), "generated rooms");

        self.background()
    }

    fn next(&mut self) -> PlaybackResult<DrawInstruction> {
        if !self.created {
            return Err(PlaybackError::generator("next() called before create()"));
        }
        match self.rooms.pop() {
            Some(room) => Ok(room.to_instruction()),
            None => {
                tracing::debug!("rooms exhausted");
                Ok(SENTINEL)
            }
        }
    }
}
