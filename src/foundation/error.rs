/// Convenience result type used across frostglass.
pub type FrostResult<T> = Result<T, FrostError>;

/// Error taxonomy for the capture/blur pipeline.
///
/// `CaptureUnavailable` and `ContainmentResolution` are absorbed at the tick boundary; the rest
/// surface to the caller.
#[derive(thiserror::Error, Debug)]
pub enum FrostError {
    /// Invalid user-provided configuration or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The root surface or the requested output has a non-positive dimension.
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// The containment chain hit a missing link or a node that cannot contain children.
    #[error("containment resolution failed: {0}")]
    ContainmentResolution(String),

    /// A blur call was made through a handle that was never initialized.
    #[error("blur facade used before initialization")]
    FacadeUninitialized,

    /// Internal invariant failures (buffer length mismatches and the like).
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrostError {
    /// Build a [`FrostError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FrostError::CaptureUnavailable`] value.
    pub fn capture_unavailable(msg: impl Into<String>) -> Self {
        Self::CaptureUnavailable(msg.into())
    }

    /// Build a [`FrostError::ContainmentResolution`] value.
    pub fn containment(msg: impl Into<String>) -> Self {
        Self::ContainmentResolution(msg.into())
    }

    /// Build a [`FrostError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Whether a refresh tick may swallow this error and try again next frame.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CaptureUnavailable(_) | Self::ContainmentResolution(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
