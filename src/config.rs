//! File-based configuration.
//!
//! Every section is optional; missing fields take their defaults:
//!
//! ```json
//! {
//!   "grid": { "cols": 128, "rows": 128, "border": 3, "scale": 3 },
//!   "pacing": { "frame_delay_ms": 400, "refresh_hz": 60.0 },
//!   "palette": { "off": {"r":0,"g":0,"b":0,"a":255}, "on": {"r":255,"g":255,"b":255,"a":255} },
//!   "bsp": { "num_rooms": 8, "seed": 42 }
//! }
//! ```

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{GridSpec, Rgba8};
use crate::foundation::error::{PlaybackError, PlaybackResult};
use crate::generator::bsp::BspParams;
use crate::render::Palette;
use crate::session::pacer::PacingOpts;
use crate::session::player::SessionOpts;

/// Top-level configuration document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Grid and scale.
    pub grid: GridSpec,
    /// Frame pacing.
    pub pacing: PacingOpts,
    /// Fill and stroke colors.
    pub palette: Palette,
    /// Initial surface color.
    pub clear: Rgba8,
    /// Room generator parameters.
    pub bsp: BspParams,
}

impl PlaybackConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> PlaybackResult<Self> {
        let cfg: PlaybackConfig =
            serde_json::from_str(s).map_err(|e| PlaybackError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> PlaybackResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check every section.
    pub fn validate(&self) -> PlaybackResult<()> {
        self.grid.validate()?;
        self.pacing.refresh_period()?;
        self.bsp.validate()?;
        Ok(())
    }

    /// Options for a [`crate::PlaybackSession`].
    pub fn session_opts(&self) -> SessionOpts {
        SessionOpts {
            grid: self.grid,
            palette: self.palette,
            pacing: self.pacing,
            clear: self.clear,
        }
    }
}
