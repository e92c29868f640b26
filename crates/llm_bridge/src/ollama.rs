//! Ollama HTTP API client for local vision models

use crate::capability::{InlineImage, RemoteError, VisionCapability};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for Ollama client
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL for Ollama API (default: http://localhost:11434)
    pub base_url: String,
    /// Vision model name (default: llava)
    pub model: String,
    /// Timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llava".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Ollama API client
pub struct OllamaClient {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: OllamaConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Send a chat request to Ollama
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, RemoteError> {
        let url = format!("{}/api/chat", self.config.base_url.trim_end_matches('/'));

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                service: "Ollama",
                status,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VisionCapability for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, prompt: &str, image: &InlineImage) -> Result<String, RemoteError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
                images: Some(vec![image.data.clone()]),
            }],
            stream: Some(false),
        };

        let response = self.chat(request).await?;
        if response.message.content.trim().is_empty() {
            return Err(RemoteError::EmptyResponse(format!(
                "model {} returned an empty message",
                response.model
            )));
        }
        Ok(response.message.content)
    }
}

/// Chat request to Ollama
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// A chat message; images are base64 without a data URL prefix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Chat response from Ollama
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub model: String,
    pub message: ChatMessage,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_config_default() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llava");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_chat_request_puts_images_on_message() {
        let request = ChatRequest {
            model: "llava".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Analisis gambar gigi ini".to_string(),
                images: Some(vec!["/9j/".to_string()]),
            }],
            stream: Some(false),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["images"][0], "/9j/");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_chat_response_without_images() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"model":"llava","message":{"role":"assistant","content":"Hasil"},"done":true}"#,
        )
        .unwrap();
        assert_eq!(response.message.content, "Hasil");
        assert!(response.message.images.is_none());
    }
}
