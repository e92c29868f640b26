//! Backend selection from the environment

use crate::capability::VisionCapability;
use crate::gemini::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL};
use crate::ollama::{OllamaClient, OllamaConfig};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("unknown backend '{0}' (expected 'gemini' or 'ollama')")]
    UnknownBackend(String),

    #[error("invalid DENTASCAN_TIMEOUT_SECS '{0}'")]
    InvalidTimeout(String),

    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Gemini,
    Ollama,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Backend::Gemini),
            "ollama" => Ok(Backend::Ollama),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Everything needed to construct a [`VisionCapability`]
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub backend: Backend,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let ollama = OllamaConfig::default();
        Self {
            backend: Backend::default(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_url: DEFAULT_GEMINI_URL.to_string(),
            ollama_url: ollama.base_url,
            ollama_model: ollama.model,
            timeout_secs: ollama.timeout_secs,
        }
    }
}

impl BackendConfig {
    /// Read `DENTASCAN_BACKEND`, `GEMINI_API_KEY`, `GEMINI_MODEL`,
    /// `GEMINI_URL`, `OLLAMA_URL`, `OLLAMA_MODEL`, `DENTASCAN_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = var("DENTASCAN_BACKEND") {
            config.backend = backend.parse()?;
        }
        config.gemini_api_key = var("GEMINI_API_KEY");
        if let Some(model) = var("GEMINI_MODEL") {
            config.gemini_model = model;
        }
        if let Some(url) = var("GEMINI_URL") {
            config.gemini_url = url;
        }
        if let Some(url) = var("OLLAMA_URL") {
            config.ollama_url = url;
        }
        if let Some(model) = var("OLLAMA_MODEL") {
            config.ollama_model = model;
        }
        if let Some(timeout) = var("DENTASCAN_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(timeout.clone()))?;
        }

        Ok(config)
    }

    /// Model name used by the selected backend
    pub fn model(&self) -> &str {
        match self.backend {
            Backend::Gemini => &self.gemini_model,
            Backend::Ollama => &self.ollama_model,
        }
    }

    /// Construct the selected capability; Gemini requires an API key
    pub fn build(&self) -> Result<Arc<dyn VisionCapability>, ConfigError> {
        match self.backend {
            Backend::Gemini => {
                let api_key = self.gemini_api_key.clone().ok_or(ConfigError::MissingApiKey)?;
                let client = GeminiClient::new(GeminiConfig {
                    api_key,
                    model: self.gemini_model.clone(),
                    base_url: self.gemini_url.clone(),
                    timeout_secs: self.timeout_secs,
                })?;
                Ok(Arc::new(client))
            }
            Backend::Ollama => {
                let client = OllamaClient::new(OllamaConfig {
                    base_url: self.ollama_url.clone(),
                    model: self.ollama_model.clone(),
                    timeout_secs: self.timeout_secs,
                })?;
                Ok(Arc::new(client))
            }
        }
    }
}
