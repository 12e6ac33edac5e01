/// Convenience result type used across the pipeline.
pub type DuotoneResult<T> = Result<T, DuotoneError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum DuotoneError {
    /// Source bytes could not be decoded into a raster image.
    #[error("decode error: {0}")]
    Decode(String),

    /// The decoded or constrained image has a zero-sized side.
    #[error("dimension error: {0}")]
    Dimension(String),

    /// The final buffer could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid user-provided configuration or buffer data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A newer invocation was started before this one delivered its output.
    #[error("invocation superseded by a newer request")]
    Superseded,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DuotoneError {
    /// Build a [`DuotoneError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`DuotoneError::Dimension`] value.
    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::Dimension(msg.into())
    }

    /// Build a [`DuotoneError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`DuotoneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DuotoneError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
