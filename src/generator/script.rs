//! Replays a fixed instruction list.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{PlaybackError, PlaybackResult};
use crate::generator::Generator;
use crate::instruction::DrawInstruction;

/// An ordered instruction list, serialized as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Script {
    /// Instructions in playback order.
    pub instructions: Vec<DrawInstruction>,
}

impl Script {
    /// Wrap an instruction list.
    pub fn new(instructions: Vec<DrawInstruction>) -> Self {
        Self { instructions }
    }

    /// Parse a script from JSON text. Logs a warning for each ambiguous sentinel.
    pub fn from_json_str(s: &str) -> PlaybackResult<Self> {
        let script: Script =
            serde_json::from_str(s).map_err(|e| PlaybackError::serde(e.to_string()))?;
        script.warn_ambiguous();
        Ok(script)
    }

    /// Read and parse a JSON script file.
    pub fn load(path: &Path) -> PlaybackResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> PlaybackResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlaybackError::serde(e.to_string()))
    }

    /// Fail on a sentinel-equal instruction anywhere but the last position.
    ///
    /// Playback would stop at such an instruction. Index 0 is exempt: the first instruction comes
    /// from `create()` and is never checked for termination.
    pub fn check_unambiguous(&self) -> PlaybackResult<()> {
        match self.ambiguous_indices().next() {
            Some(index) => Err(PlaybackError::AmbiguousSentinel { index }),
            None => Ok(()),
        }
    }

    fn ambiguous_indices(&self) -> impl Iterator<Item = usize> + '_ {
        let last = self.instructions.len().saturating_sub(1);
        self.instructions
            .iter()
            .enumerate()
            .filter(move |(i, instr)| *i > 0 && *i < last && instr.is_sentinel())
            .map(|(i, _)| i)
    }

    fn warn_ambiguous(&self) {
        for index in self.ambiguous_indices() {
            tracing::warn!(index, "script instruction equals the sentinel; playback stops here");
        }
    }
}

/// [`Generator`] over a [`Script`].
///
/// Running past the end of a script that lacks a sentinel is a generator error.
#[derive(Debug)]
pub struct ScriptGenerator {
    script: std::vec::IntoIter<DrawInstruction>,
    created: bool,
}

impl ScriptGenerator {
    /// Play `script` from its first instruction.
    pub fn new(script: Script) -> Self {
        Self {
            script: script.instructions.into_iter(),
            created: false,
        }
    }

    /// Instructions not yet handed out.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Generator for ScriptGenerator {
    fn create(&mut self) -> PlaybackResult<DrawInstruction> {
        if self.created {
            return Err(PlaybackError::generator("create() called twice"));
        }
        self.created = true;
        self.script
            .next()
            .ok_or_else(|| PlaybackError::generator("script is empty"))
    }

    fn next(&mut self) -> PlaybackResult<DrawInstruction> {
        if !self.created {
            return Err(PlaybackError::generator("next() called before create()"));
        }
        self.script
            .next()
            .ok_or_else(|| PlaybackError::generator("script ended without a terminal instruction"))
    }
}

impl From<Vec<DrawInstruction>> for ScriptGenerator {
    fn from(instructions: Vec<DrawInstruction>) -> Self {
        Self::new(Script::new(instructions))
    }
}
