/// Convenience result type used across the crate.
pub type MezzResult<T> = Result<T, MezzError>;

/// Top-level error taxonomy used by generation APIs.
///
/// Non-fatal precision issues are not errors; they are reported through a
/// [`DiagnosticSink`](crate::DiagnosticSink) instead.
#[derive(thiserror::Error, Debug)]
pub enum MezzError {
    /// Bad frame rate, duration, resolution, channel count or similar input.
    ///
    /// Raised before any generation work starts.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A payload could not be encoded (for example a QR payload that does not fit).
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Failure while writing a single artifact (raster, audio file, manifest).
    #[error("io error: {0}")]
    Io(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MezzError {
    /// Build a [`MezzError::InvalidParameter`] value.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`MezzError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`MezzError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`MezzError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that only affect a single artifact.
    ///
    /// Batch generation keeps going after these unless asked to fail fast.
    pub fn is_per_artifact(&self) -> bool {
        matches!(self, Self::Encoding(_) | Self::Io(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
