//! The remote capability: prompt plus image in, free text out

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

/// Image as sent inline to a vision model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Standard base64, no `data:` prefix
    pub data: String,
    pub mime_type: String,
}

impl InlineImage {
    pub fn encode(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            data: general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
        }
    }
}

/// Any failure talking to a remote model
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} API error ({status}): {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("response contained no text ({0})")]
    EmptyResponse(String),
}

/// A model that can describe an image given a text prompt
#[async_trait]
pub trait VisionCapability: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Single attempt; no retries
    async fn generate(&self, prompt: &str, image: &InlineImage) -> Result<String, RemoteError>;
}
