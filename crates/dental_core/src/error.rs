//! Error types

use thiserror::Error;

/// The only message a user ever sees for a failed analysis
pub const ANALYSIS_FAILURE_MESSAGE: &str =
    "Terjadi kesalahan saat menganalisis gambar. Silakan coba lagi.";

/// A failed analysis attempt.
///
/// Network, authentication, quota and malformed-response failures all
/// collapse into this one kind. The cause is kept for logs only; `Display`
/// always yields [`ANALYSIS_FAILURE_MESSAGE`].
#[derive(Debug, Error)]
#[error("{}", ANALYSIS_FAILURE_MESSAGE)]
pub struct AnalysisFailure {
    cause: String,
}

impl AnalysisFailure {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    /// Underlying cause, for logging
    pub fn cause(&self) -> &str {
        &self.cause
    }

    /// Message to show the user
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILURE_MESSAGE
    }
}

/// Input rejected before any remote call is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("not an image MIME type: {0}")]
    NotAnImage(String),

    #[error("image data is empty")]
    EmptyImage,

    #[error("could not determine the image format")]
    UnknownFormat,
}
