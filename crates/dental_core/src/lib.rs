//! Core types for dentascan
//!
//! This crate holds everything that does not talk to the network:
//! the analysis request, the prompt sent to the vision model, the
//! formatter that turns the model's free text into labelled sections,
//! and the session state machine driven by the UI.
//!
//! Copyright (c) 2025 Michael A Wright

pub mod error;
pub mod format;
pub mod prompt;
pub mod request;
pub mod session;
pub mod types;

pub use error::{AnalysisFailure, RequestError, ANALYSIS_FAILURE_MESSAGE};
pub use format::{format, parse};
pub use prompt::build_prompt;
pub use request::AnalysisRequest;
pub use session::{AnalysisState, SelectedImage, Session, SessionError};
pub use types::*;
