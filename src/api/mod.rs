use crate::state::AnalysisResult;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

pub mod http;

pub use http::HttpAnalysisService;

/// Errors that can occur while talking to the analysis service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP client-level error (connection, timeout, etc.)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("Analysis service returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The body did not match the expected response shape.
    #[error("Malformed analysis response: {0}")]
    Decode(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// The single multipart part sent to the service.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Where requests go, for logging.
    fn endpoint(&self) -> &str;
    async fn analyze(&self, upload: UploadFile) -> Result<AnalysisResult, ApiError>;
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    annotated_image: String,
    summary: BTreeMap<String, u64>,
}

/// Parses a response body, decoding the annotated image from base64.
///
/// Fields other than `annotated_image` and `summary` are ignored; counts
/// must be non-negative integers.
pub fn decode_response(body: &[u8]) -> Result<AnalysisResult, ApiError> {
    let response: AnalyzeResponse =
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    let annotated_image = STANDARD
        .decode(response.annotated_image.trim())
        .map_err(|e| ApiError::Decode(format!("annotated_image is not base64: {}", e)))?;

    Ok(AnalysisResult {
        annotated_image: Arc::from(annotated_image),
        summary: response.summary,
    })
}
