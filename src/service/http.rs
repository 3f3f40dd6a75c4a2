use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnalysisService, HistoryStore, ServiceError, ServiceResult};
use crate::styles::StyleInfo;
use crate::types::{AnalysisResult, HistoryRecord, SubmissionPayload};

/// HTTP client for the analysis backend's REST API. Implements both
/// collaborator contracts against one base URL.
pub struct AnalysisApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

// Wire shapes
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    analyses: Vec<AnalysisResult>,
}

#[derive(Deserialize)]
struct HistoryResponse {
    history: Vec<HistoryRecord>,
}

#[derive(Deserialize)]
struct StylesResponse {
    styles: Vec<StyleInfo>,
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    name: &'a str,
}

impl AnalysisApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Configure from `TRENDLENS_ENDPOINT`, with an optional bearer token in
    /// `TRENDLENS_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("TRENDLENS_ENDPOINT").map_err(|_| {
            anyhow::anyhow!("No analysis backend configured. Set TRENDLENS_ENDPOINT")
        })?;
        let api_key = std::env::var("TRENDLENS_API_KEY").ok();
        Ok(Self::new(base_url, api_key))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request
    }

    /// Style catalog as the backend advertises it (`GET /api/styles`).
    pub async fn styles(&self) -> ServiceResult<Vec<StyleInfo>> {
        let response = self
            .request(reqwest::Method::GET, "/api/styles")
            .send()
            .await?;
        let body = read_checked(response).await?;
        let parsed: StylesResponse = serde_json::from_str(&body)?;
        Ok(parsed.styles)
    }
}

/// Read the body and turn a non-2xx status into a `ServiceError`, preferring
/// the backend's own `{"error": ...}` message when it sent one.
async fn read_checked(response: reqwest::Response) -> ServiceResult<String> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        return Err(ServiceError::new(parsed.error));
    }
    Err(ServiceError::new(format!("backend error {status}: {body}")))
}

#[async_trait]
impl AnalysisService for AnalysisApiClient {
    /// `POST /api/analyze`, multipart: one `images` part per attachment, one
    /// `styles` field per composite key, plus `context` and `name`.
    async fn analyze(&self, payload: &SubmissionPayload) -> ServiceResult<Vec<AnalysisResult>> {
        let mut form = Form::new();
        for attachment in &payload.attachments {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.id.clone())
                .mime_str(&attachment.mime_type)?;
            form = form.part("images", part);
        }
        for style in &payload.styles {
            form = form.text("styles", style.clone());
        }
        form = form
            .text("context", payload.context.clone())
            .text("name", payload.display_name.clone());

        debug!(
            images = payload.attachments.len(),
            styles = payload.styles.len(),
            "submitting analysis request"
        );
        let response = self
            .request(reqwest::Method::POST, "/api/analyze")
            .multipart(form)
            .send()
            .await?;
        let body = read_checked(response).await?;
        let parsed: AnalyzeResponse = serde_json::from_str(&body)?;
        Ok(parsed.analyses)
    }
}

#[async_trait]
impl HistoryStore for AnalysisApiClient {
    async fn list(&self) -> ServiceResult<Vec<HistoryRecord>> {
        let response = self
            .request(reqwest::Method::GET, "/api/history")
            .send()
            .await?;
        let body = read_checked(response).await?;
        let parsed: HistoryResponse = serde_json::from_str(&body)?;
        Ok(parsed.history)
    }

    async fn rename(&self, id: &str, name: &str) -> ServiceResult<()> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/api/history/{id}/name"))
            .json(&RenameRequest { name })
            .send()
            .await?;
        read_checked(response).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> ServiceResult<()> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/api/history/{id}"))
            .send()
            .await?;
        read_checked(response).await?;
        Ok(())
    }
}
