/// Collaborator contracts for the analysis backend.
///
/// The session core only ever talks to these two traits; `http` carries the
/// production implementation backed by the service's REST API. Errors are
/// deliberately flat: the core interprets nothing beyond success or failure
/// plus a human-readable message.
pub mod http;

pub use http::AnalysisApiClient;

use async_trait::async_trait;

use crate::types::{AnalysisResult, HistoryRecord, SubmissionPayload};

#[derive(Debug, Clone)]
pub struct ServiceError(String);

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ServiceError {}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::new(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::new(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Runs one analysis request. Single-shot: a failure is terminal for that
/// action and is never retried here.
#[async_trait]
pub trait AnalysisService {
    async fn analyze(&self, payload: &SubmissionPayload) -> ServiceResult<Vec<AnalysisResult>>;
}

/// The remote history store. `list` returns the authoritative record list;
/// `rename` and `delete` fail with a transport-or-not-found error.
#[async_trait]
pub trait HistoryStore {
    async fn list(&self) -> ServiceResult<Vec<HistoryRecord>>;
    async fn rename(&self, id: &str, name: &str) -> ServiceResult<()>;
    async fn delete(&self, id: &str) -> ServiceResult<()>;
}
