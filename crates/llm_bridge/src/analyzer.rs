//! Analysis orchestrator: prompt, remote call, formatting

use crate::capability::{InlineImage, VisionCapability};
use dental_core::{
    build_prompt, parse, AnalysisFailure, AnalysisRequest, AnalysisState, FormattedResult,
    Session, SessionError,
};
use std::sync::Arc;

/// Runs one analysis against an injected vision capability
#[derive(Clone)]
pub struct Analyzer {
    capability: Arc<dyn VisionCapability>,
}

impl Analyzer {
    pub fn new(capability: Arc<dyn VisionCapability>) -> Self {
        Self { capability }
    }

    pub fn backend(&self) -> &str {
        self.capability.name()
    }

    /// Analyze one photo. Single attempt; every failure becomes
    /// [`AnalysisFailure`].
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<FormattedResult, AnalysisFailure> {
        let prompt = build_prompt(request.complaint());
        let image = InlineImage::encode(request.image(), request.mime_type());

        tracing::info!(
            backend = self.capability.name(),
            mime_type = request.mime_type(),
            image_bytes = request.image().len(),
            has_complaint = request.complaint().is_some(),
            "analyzing dental photo"
        );
        tracing::debug!(prompt_len = prompt.len(), payload_len = image.data.len(), "prompt built");

        let text = self.capability.generate(&prompt, &image).await.map_err(|e| {
            tracing::warn!(backend = self.capability.name(), error = %e, "remote analysis failed");
            AnalysisFailure::new(e.to_string())
        })?;

        let result = parse(&text);
        if result.is_empty() {
            tracing::warn!(backend = self.capability.name(), "remote returned only whitespace");
            return Err(AnalysisFailure::new("response was blank after formatting"));
        }

        tracing::info!(sections = result.sections.len(), "analysis complete");
        Ok(result)
    }

    /// Drive `session` through a full `Analyzing -> Done | Failed` cycle
    pub async fn run<'s>(&self, session: &'s mut Session) -> Result<&'s AnalysisState, SessionError> {
        let request = session.begin()?;
        let outcome = self.analyze(&request).await;
        session.finish(outcome);
        Ok(session.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::RemoteError;
    use async_trait::async_trait;
    use dental_core::session::SelectedImage;
    use dental_core::{Category, ANALYSIS_FAILURE_MESSAGE};
    use std::sync::Mutex;

    /// Returns canned text and remembers what it was asked
    struct CannedCapability {
        text: String,
        seen: Mutex<Vec<(String, InlineImage)>>,
    }

    impl CannedCapability {
        fn new(text: &str) -> Arc<Self> {
            Arc::new(Self {
                text: text.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl VisionCapability for CannedCapability {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, prompt: &str, image: &InlineImage) -> Result<String, RemoteError> {
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), image.clone()));
            Ok(self.text.clone())
        }
    }

    struct FailingCapability;

    #[async_trait]
    impl VisionCapability for FailingCapability {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _prompt: &str, _image: &InlineImage) -> Result<String, RemoteError> {
            Err(RemoteError::Status {
                service: "Gemini",
                status: 503,
                body: "overloaded".to_string(),
            })
        }
    }

    fn session_with_photo() -> Session {
        let mut session = Session::new();
        session.select_image(SelectedImage {
            name: "gigi.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: b"\x89PNG".to_vec(),
        });
        session
    }

    #[tokio::test]
    async fn test_analyze_formats_response() {
        let capability = CannedCapability::new("## Hasil Analisis Gigi\nKondisi Gigi:\n* ada karies");
        let analyzer = Analyzer::new(capability.clone());

        let request =
            AnalysisRequest::new(b"\xff\xd8\xff".to_vec(), "image/jpeg", Some("ngilu".to_string()))
                .unwrap();
        let result = analyzer.analyze(&request).await.unwrap();

        assert_eq!(result.title.as_deref(), Some("Hasil Analisis Gigi"));
        assert!(result.section(Category::TeethCondition).is_some());
        assert!(result.to_markdown().contains("**karies**"));

        let seen = capability.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.contains("Pasien memiliki keluhan: \"ngilu\"."));
        assert_eq!(seen[0].1, InlineImage::encode(b"\xff\xd8\xff", "image/jpeg"));
    }

    #[tokio::test]
    async fn test_failing_capability_yields_fixed_message() {
        let analyzer = Analyzer::new(Arc::new(FailingCapability));
        let mut session = session_with_photo();

        let state = analyzer.run(&mut session).await.unwrap().clone();

        assert_eq!(state, AnalysisState::Failed(ANALYSIS_FAILURE_MESSAGE.to_string()));
        assert!(!session.is_analyzing());
    }

    #[tokio::test]
    async fn test_blank_response_is_a_failure() {
        let analyzer = Analyzer::new(CannedCapability::new("  \n\n "));
        let request = AnalysisRequest::new(vec![1], "image/png", None).unwrap();

        let failure = analyzer.analyze(&request).await.unwrap_err();
        assert_eq!(failure.to_string(), ANALYSIS_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_run_requires_image() {
        let capability = CannedCapability::new("Hasil");
        let analyzer = Analyzer::new(capability.clone());
        let mut session = Session::new();

        let err = analyzer.run(&mut session).await.unwrap_err();
        assert_eq!(err, SessionError::NoImage);
        assert!(capability.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_success_then_reset() {
        let analyzer = Analyzer::new(CannedCapability::new("Hasil\nSaran Perawatan:\n- rutin sikat gigi"));
        let mut session = session_with_photo();

        let state = analyzer.run(&mut session).await.unwrap();
        assert!(matches!(state, AnalysisState::Done(r) if r.sections.len() == 1));

        assert!(session.reset());
        assert_eq!(session.state(), &AnalysisState::Idle);
        assert!(session.image().is_none());
    }
}
