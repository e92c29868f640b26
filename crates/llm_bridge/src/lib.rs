//! LLM bridge for dental photo analysis
//!
//! Wraps the remote vision models behind [`VisionCapability`] and drives a
//! single analysis through [`Analyzer`]. Google Gemini is the default
//! backend; a local Ollama vision model can stand in for it.
//!
//! Copyright (c) 2025 Michael A Wright

pub mod analyzer;
pub mod capability;
pub mod config;
pub mod gemini;
pub mod ollama;

pub use analyzer::Analyzer;
pub use capability::{InlineImage, RemoteError, VisionCapability};
pub use config::{Backend, BackendConfig, ConfigError};
pub use gemini::{GeminiClient, GeminiConfig};
pub use ollama::{OllamaClient, OllamaConfig};
