//! Frame-paced playback of generated rectangle instructions onto a raster surface.
//!
//! A [`Generator`] hands out [`DrawInstruction`]s one at a time. A [`PlaybackSession`] renders the
//! first one immediately, then one per tick, waiting a fixed delay plus the next refresh boundary
//! between ticks, until the generator yields the [`SENTINEL`].
//!
//! - Build a generator ([`BspGenerator`] or [`ScriptGenerator`])
//! - Create a [`PlaybackSession`], optionally with a [`FrameSink`]
//! - `run().await` it, or drive [`PlaybackSession::tick`] yourself
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// File-based configuration.
pub mod config;
pub(crate) mod encode;
/// Instruction producers.
pub mod generator;
pub mod instruction;
/// Rasterization onto the drawing surface.
pub mod render;
pub(crate) mod session;

pub use crate::config::PlaybackConfig;
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::foundation::core::{FrameIndex, GridSpec, Point, Rect, Rgba8, Size};
pub use crate::foundation::error::{PlaybackError, PlaybackResult};
pub use crate::generator::Generator;
pub use crate::generator::bsp::{BspGenerator, BspParams};
pub use crate::generator::script::{Script, ScriptGenerator};
pub use crate::instruction::{DrawColor, DrawInstruction, SENTINEL};
pub use crate::render::{FrameRGBA, Palette, RectRenderer, Surface, SurfaceDesc};
pub use crate::session::pacer::{FramePacer, PacingOpts};
pub use crate::session::player::{
    NoSink, PlaybackSession, PlaybackStats, PlayerState, SessionOpts, StopReason, TickOutcome,
};
pub use crate::session::stop::{StopHandle, StopSignal, stop_channel};
