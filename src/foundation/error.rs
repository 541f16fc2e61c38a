/// Convenience result type used across the crate.
pub type BoilerResult<T> = Result<T, BoilerError>;

/// Top-level error taxonomy.
///
/// Handlers are the only place these are turned into user-facing text.
#[derive(thiserror::Error, Debug)]
pub enum BoilerError {
    /// Invalid configuration or caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A template animation or insert bitmap could not be loaded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Writing the output animation failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// A platform collaborator (avatar source, reply sink) failed.
    #[error("platform error: {0}")]
    Platform(String),

    /// The generated output exceeds the attachment size cap.
    #[error("output too large: {bytes} bytes exceeds the {limit} byte limit")]
    TooLarge {
        /// Size of the generated file.
        bytes: u64,
        /// Configured cap.
        limit: u64,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoilerError {
    /// Build a [`BoilerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoilerError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BoilerError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`BoilerError::Platform`] value.
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
