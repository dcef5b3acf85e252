/// Convenience result type used across the crate.
pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Top-level error taxonomy used by playback APIs.
///
/// Every variant is fatal for the session that produced it: a session that hits an error moves to
/// `Stopped` and never retries.
#[derive(thiserror::Error, Debug)]
pub enum PlaybackError {
    /// Invalid user-provided configuration or lifecycle misuse.
    #[error("validation error: {0}")]
    Validation(String),

    /// The generator could not produce an instruction.
    #[error("generator error: {0}")]
    Generator(String),

    /// The drawing surface could not be acquired.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A sentinel-equal instruction appears before the end of a script.
    ///
    /// The player cannot tell it apart from real termination; only explicit script checks raise
    /// this.
    #[error("instruction {index} is indistinguishable from the terminal sentinel")]
    AmbiguousSentinel {
        /// Position of the offending instruction in the script.
        index: usize,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlaybackError {
    /// Build a [`PlaybackError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlaybackError::Generator`] value.
    pub fn generator(msg: impl Into<String>) -> Self {
        Self::Generator(msg.into())
    }

    /// Build a [`PlaybackError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`PlaybackError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            PlaybackError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            PlaybackError::generator("x")
                .to_string()
                .contains("generator error:")
        );
        assert!(
            PlaybackError::surface_unavailable("x")
                .to_string()
                .contains("render surface unavailable:")
        );
        assert!(
            PlaybackError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn ambiguous_sentinel_names_index() {
        let err = PlaybackError::AmbiguousSentinel { index: 4 };
        assert!(err.to_string().contains("instruction 4"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = PlaybackError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
