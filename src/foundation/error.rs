/// Convenience result type used across the crate.
pub type ShatterResult<T> = Result<T, ShatterError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Callers of the transition controller see [`ShatterError::InvalidInput`],
/// [`ShatterError::Serde`] and, for background builds, [`ShatterError::Other`].
/// Fragment-level failures are recovered where they happen.
#[derive(thiserror::Error, Debug)]
pub enum ShatterError {
    /// Malformed top-level input (empty image, zero fragments, bad origin, bad config).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A partition cell collapsed to (near) zero area after clipping.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A cell footprint does not overlap the source image.
    #[error("extraction out of bounds: {0}")]
    ExtractionOutOfBounds(String),

    /// A background build was superseded by a newer trigger generation.
    #[error("build cancelled: generation {0}")]
    BuildCancelled(u64),

    /// Target surface or pixel buffer does not match what the compositor expects.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Background worker failure: the thread could not start or died before delivering.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShatterError {
    /// Build a [`ShatterError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`ShatterError::DegenerateGeometry`] value.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    /// Build a [`ShatterError::ExtractionOutOfBounds`] value.
    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        Self::ExtractionOutOfBounds(msg.into())
    }

    /// Build a [`ShatterError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ShatterError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for failures the engine recovers from by dropping a single fragment.
    pub fn is_fragment_local(&self) -> bool {
        matches!(
            self,
            Self::DegenerateGeometry(_) | Self::ExtractionOutOfBounds(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
