//! Instruction producers consumed by the player.

pub mod bsp;
pub mod script;

use crate::foundation::error::PlaybackResult;
use crate::instruction::DrawInstruction;

/// Source of draw instructions.
///
/// `create` is called exactly once, before any call to `next`. Once generation is exhausted `next`
/// returns [`crate::SENTINEL`]. An `Err` from either method ends the playback session.
pub trait Generator {
    /// Initialize generation state and return the first instruction.
    fn create(&mut self) -> PlaybackResult<DrawInstruction>;

    /// Advance generation and return the next instruction, or the sentinel.
    fn next(&mut self) -> PlaybackResult<DrawInstruction>;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn create(&mut self) -> PlaybackResult<DrawInstruction> {
        (**self).create()
    }

    fn next(&mut self) -> PlaybackResult<DrawInstruction> {
        (**self).next()
    }
}
