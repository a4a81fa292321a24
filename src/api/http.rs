use crate::api::{decode_response, AnalysisService, ApiError, UploadFile};
use crate::config::AppConfig;
use crate::constants::UPLOAD_FIELD_NAME;
use crate::state::AnalysisResult;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// Analysis service reached over HTTP with a multipart upload.
#[derive(Clone)]
pub struct HttpAnalysisService {
    client: Client,
    endpoint: String,
}

impl HttpAnalysisService {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let endpoint = config.analyze_url();
        reqwest::Url::parse(&endpoint)
            .map_err(|e| ApiError::Config(format!("invalid endpoint {}: {}", endpoint, e)))?;

        Ok(Self { client, endpoint })
    }

    fn build_form(upload: UploadFile) -> Result<Form, ApiError> {
        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name)
            .mime_str(&upload.media_type)?;
        Ok(Form::new().part(UPLOAD_FIELD_NAME, part))
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn analyze(&self, upload: UploadFile) -> Result<AnalysisResult, ApiError> {
        tracing::info!(
            "POST {} ({}, {} bytes)",
            self.endpoint,
            upload.file_name,
            upload.bytes.len()
        );
        let form = Self::build_form(upload)?;
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        decode_response(&body)
    }
}
