//! Client for the server's analysis endpoint

use base64::{engine::general_purpose, Engine as _};
use dental_core::{AnalysisFailure, AnalysisRequest, FormattedResult};
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

const ANALYZE_URL: &str = "/api/analyze";

#[derive(Serialize)]
struct AnalyzeBody<'a> {
    image: String,
    mime_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    complaint: Option<&'a str>,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    result: FormattedResult,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// POST the photo and complaint; one attempt, no retries
pub async fn analyze(request: &AnalysisRequest) -> Result<FormattedResult, AnalysisFailure> {
    let body = AnalyzeBody {
        image: general_purpose::STANDARD.encode(request.image()),
        mime_type: request.mime_type(),
        complaint: request.complaint(),
    };

    let response = Request::post(ANALYZE_URL)
        .json(&body)
        .map_err(|e| AnalysisFailure::new(format!("encode request: {e}")))?
        .send()
        .await
        .map_err(|e| AnalysisFailure::new(format!("send request: {e}")))?;

    if !response.ok() {
        let status = response.status();
        let detail = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error)
            .unwrap_or_default();
        return Err(AnalysisFailure::new(format!("HTTP {status}: {detail}")));
    }

    response
        .json::<AnalyzeResponse>()
        .await
        .map(|r| r.result)
        .map_err(|e| AnalysisFailure::new(format!("decode response: {e}")))
}
