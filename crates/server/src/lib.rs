//! dentascan REST API server
//!
//! Serves the built SPA and a single analysis endpoint. The browser posts
//! the photo here so the model API key never leaves the server.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use dental_core::{AnalysisFailure, AnalysisRequest, FormattedResult, RequestError};
use llm_bridge::Analyzer;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

/// Largest accepted request body (base64 photo plus JSON)
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            static_dir: PathBuf::from("dist"),
        }
    }
}

impl ServerConfig {
    /// Read `DENTASCAN_ADDR` and `DENTASCAN_STATIC_DIR`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("DENTASCAN_ADDR") {
            config.addr = addr;
        }
        if let Ok(dir) = std::env::var("DENTASCAN_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        config
    }
}

#[derive(Clone)]
struct AppState {
    analyzer: Analyzer,
}

/// Build the application router
pub fn router(analyzer: Analyzer, static_dir: PathBuf) -> Router {
    let state = Arc::new(AppState { analyzer });
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/analyze", post(analyze))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .fallback_service(spa)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(config: ServerConfig, analyzer: Analyzer) -> anyhow::Result<()> {
    let backend = analyzer.backend().to_string();
    let app = router(analyzer, config.static_dir.clone());

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!(
        addr = %config.addr,
        static_dir = %config.static_dir.display(),
        backend = %backend,
        "Server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let id = Uuid::new_v4();
    let request = body.into_request()?;

    let result = state
        .analyzer
        .analyze(&request)
        .instrument(tracing::info_span!("analysis", %id))
        .await?;

    let markdown = result.to_markdown();
    let paragraphs = result.paragraphs();
    Ok(Json(AnalyzeResponse {
        id: id.to_string(),
        result,
        markdown,
        paragraphs,
    }))
}

/// Photo upload; `image` is base64, optionally as a `data:` URL
#[derive(Debug, Deserialize)]
struct AnalyzeBody {
    image: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    complaint: Option<String>,
}

impl AnalyzeBody {
    fn into_request(self) -> Result<AnalysisRequest, ApiError> {
        let (url_mime, data) = split_data_url(&self.image);
        let bytes = general_purpose::STANDARD
            .decode(data.trim())
            .map_err(|e| ApiError::BadRequest(format!("image is not valid base64: {e}")))?;

        let request = match self.mime_type.or(url_mime) {
            Some(mime_type) => AnalysisRequest::new(bytes, mime_type, self.complaint),
            None => AnalysisRequest::sniffed(bytes, self.complaint),
        };
        Ok(request?)
    }
}

/// `data:image/png;base64,AAAA` -> (Some("image/png"), "AAAA")
fn split_data_url(image: &str) -> (Option<String>, &str) {
    let Some(rest) = image.strip_prefix("data:") else {
        return (None, image);
    };
    match rest.split_once(',') {
        Some((meta, data)) => {
            let mime = meta.split(';').next().filter(|m| !m.is_empty());
            (mime.map(str::to_string), data)
        }
        None => (None, image),
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    id: String,
    result: FormattedResult,
    markdown: String,
    paragraphs: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Analysis(AnalysisFailure),
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AnalysisFailure> for ApiError {
    fn from(failure: AnalysisFailure) -> Self {
        ApiError::Analysis(failure)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Analysis(failure) => {
                tracing::error!(cause = failure.cause(), "analysis failed");
                (StatusCode::BAD_GATEWAY, failure.user_message().to_string())
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use dental_core::ANALYSIS_FAILURE_MESSAGE;
    use llm_bridge::{InlineImage, RemoteError, VisionCapability};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct Canned(&'static str);

    #[async_trait]
    impl VisionCapability for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str, _image: &InlineImage) -> Result<String, RemoteError> {
            Ok(self.0.to_string())
        }
    }

    struct Unavailable;

    #[async_trait]
    impl VisionCapability for Unavailable {
        fn name(&self) -> &str {
            "unavailable"
        }

        async fn generate(&self, _prompt: &str, _image: &InlineImage) -> Result<String, RemoteError> {
            Err(RemoteError::EmptyResponse("no candidates".to_string()))
        }
    }

    fn app(capability: Arc<dyn VisionCapability>) -> Router {
        router(Analyzer::new(capability), PathBuf::from("does-not-exist"))
    }

    async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
        post_body(app, "application/json", body.to_string()).await
    }

    async fn post_body(app: Router, content_type: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app(Arc::new(Canned("")))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_returns_paragraphs() {
        let app = app(Arc::new(Canned(
            "Hasil\nKondisi Gigi:\n- baik\n\nSaran Perawatan:\n- rutin sikat gigi",
        )));
        let (status, body) = post_json(
            app,
            json!({"image": "/9j/", "mime_type": "image/jpeg", "complaint": "ngilu"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["paragraphs"],
            json!([
                "**Hasil**",
                "**Kondisi Gigi:**",
                "- baik",
                "**Saran Perawatan:**",
                "- rutin sikat gigi"
            ])
        );
        assert_eq!(
            body["markdown"],
            "**Hasil**\n\n**Kondisi Gigi:**\n\n- baik\n\n**Saran Perawatan:**\n\n- rutin sikat gigi"
        );
        assert_eq!(body["result"]["sections"][0]["category"], "teeth_condition");
        assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_remote_failure_is_bad_gateway() {
        let (status, body) =
            post_json(app(Arc::new(Unavailable)), json!({"image": "/9j/", "mime_type": "image/jpeg"})).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], ANALYSIS_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let (status, _) =
            post_json(app(Arc::new(Canned("Hasil"))), json!({"image": "%%%", "mime_type": "image/png"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) =
            post_json(app(Arc::new(Canned("Hasil"))), json!({"image": "/9j/", "mime_type": "text/plain"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("text/plain"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let (status, body) = post_json(app(Arc::new(Canned("Hasil"))), json!({"mime_type": "image/png"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("image"));

        let (status, body) =
            post_body(app(Arc::new(Canned("Hasil"))), "application/json", "{\"image\": ".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) =
            post_body(app(Arc::new(Canned("Hasil"))), "text/plain", json!({"image": "/9j/"}).to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_data_url_supplies_mime_type() {
        let (status, body) = post_json(
            app(Arc::new(Canned("Hasil"))),
            json!({"image": "data:image/jpeg;base64,/9j/"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["markdown"], "**Hasil**");
    }

    #[test]
    fn test_split_data_url() {
        assert_eq!(split_data_url("data:image/png;base64,AAAA"), (Some("image/png".to_string()), "AAAA"));
        assert_eq!(split_data_url("AAAA"), (None, "AAAA"));
        assert_eq!(split_data_url("data:,AAAA"), (None, "AAAA"));
    }
}
