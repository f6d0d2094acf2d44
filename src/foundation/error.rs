/// Convenience result type used across the engine.
pub type BitmapResult<T> = Result<T, BitmapError>;

/// Top-level error taxonomy used by bitmap APIs.
#[derive(thiserror::Error, Debug)]
pub enum BitmapError {
    /// The operation is not defined for the bitmap's current backing (animated, mega, static).
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The texture pool could not satisfy a request.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// A source asset could not be decoded or encoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Caller-provided values are out of range or inconsistent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The bitmap has been disposed.
    #[error("disposed bitmap: {0}")]
    Disposed(String),

    /// A dimension or byte size exceeds what the engine can represent.
    #[error("too large: {0}")]
    TooLarge(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BitmapError {
    /// Build a [`BitmapError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`BitmapError::ResourceExhausted`] value.
    pub fn exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Build a [`BitmapError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BitmapError::InvalidArgument`] value.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`BitmapError::Disposed`] value.
    pub fn disposed(msg: impl Into<String>) -> Self {
        Self::Disposed(msg.into())
    }

    /// Build a [`BitmapError::TooLarge`] value.
    pub fn too_large(msg: impl Into<String>) -> Self {
        Self::TooLarge(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
