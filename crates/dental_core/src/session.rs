//! Analysis session state machine
//!
//! `Idle -> Analyzing -> Done | Failed`, back to `Idle` on reset.
//! Only one analysis can be in flight, and a request can only be started
//! once an image has been selected.

use crate::error::{AnalysisFailure, RequestError};
use crate::request::AnalysisRequest;
use crate::types::FormattedResult;
use thiserror::Error;

/// Photo picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Analyzing,
    Done(FormattedResult),
    /// Holds the user-facing message
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no image selected")]
    NoImage,

    #[error("an analysis is already in progress")]
    AlreadyAnalyzing,

    #[error("a result is shown; reset before analyzing again")]
    NotReset,

    #[error("invalid image: {0}")]
    InvalidImage(#[from] RequestError),
}

/// Draft input plus the current analysis state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    image: Option<SelectedImage>,
    complaint: String,
    state: AnalysisState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn complaint(&self) -> &str {
        &self.complaint
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, AnalysisState::Analyzing)
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        self.image.is_some() && matches!(self.state, AnalysisState::Idle)
    }

    /// Replace the selected image. Ignored while analyzing.
    pub fn select_image(&mut self, image: SelectedImage) -> bool {
        if self.is_analyzing() {
            return false;
        }
        self.image = Some(image);
        true
    }

    /// Update the complaint text. Ignored while analyzing.
    pub fn set_complaint(&mut self, complaint: impl Into<String>) -> bool {
        if self.is_analyzing() {
            return false;
        }
        self.complaint = complaint.into();
        true
    }

    /// Move to `Analyzing` and hand out the request to send
    pub fn begin(&mut self) -> Result<AnalysisRequest, SessionError> {
        match self.state {
            AnalysisState::Idle => {}
            AnalysisState::Analyzing => return Err(SessionError::AlreadyAnalyzing),
            AnalysisState::Done(_) | AnalysisState::Failed(_) => return Err(SessionError::NotReset),
        }
        let image = self.image.as_ref().ok_or(SessionError::NoImage)?;
        let request = AnalysisRequest::new(
            image.bytes.clone(),
            image.mime_type.clone(),
            Some(self.complaint.clone()),
        )?;

        self.state = AnalysisState::Analyzing;
        Ok(request)
    }

    /// Record the outcome of the in-flight analysis.
    ///
    /// Returns false, leaving the state untouched, when nothing is in flight.
    pub fn finish(&mut self, outcome: Result<FormattedResult, AnalysisFailure>) -> bool {
        if !self.is_analyzing() {
            return false;
        }
        self.state = match outcome {
            Ok(result) => AnalysisState::Done(result),
            Err(failure) => AnalysisState::Failed(failure.user_message().to_string()),
        };
        true
    }

    /// Clear the image, complaint and result. Ignored while analyzing.
    pub fn reset(&mut self) -> bool {
        if self.is_analyzing() {
            return false;
        }
        *self = Self::default();
        true
    }
}
