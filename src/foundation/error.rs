/// Convenience result type used across the mockup engines.
pub type MockupResult<T> = Result<T, MockupError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is a value-level, per-call error. None of them is process-fatal.
#[derive(thiserror::Error, Debug)]
pub enum MockupError {
    /// Input bytes could not be decoded into an image.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// An image could not be encoded to output bytes.
    #[error("image encode error: {0}")]
    ImageEncode(String),

    /// Malformed hex color or out-of-domain color parameters.
    #[error("invalid color spec: {0}")]
    InvalidColorSpec(String),

    /// Blend mode name outside `multiply | screen | overlay`.
    #[error("unsupported blend mode: {0}")]
    UnsupportedBlendMode(String),

    /// Invalid geometry, options, or buffer shapes.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MockupError {
    /// Build a [`MockupError::ImageDecode`] value.
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`MockupError::ImageEncode`] value.
    pub fn image_encode(msg: impl Into<String>) -> Self {
        Self::ImageEncode(msg.into())
    }

    /// Build a [`MockupError::InvalidColorSpec`] value.
    pub fn invalid_color_spec(msg: impl Into<String>) -> Self {
        Self::InvalidColorSpec(msg.into())
    }

    /// Build a [`MockupError::UnsupportedBlendMode`] value.
    pub fn unsupported_blend_mode(msg: impl Into<String>) -> Self {
        Self::UnsupportedBlendMode(msg.into())
    }

    /// Build a [`MockupError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
