//! Seam to the analytics backend: the trait the rest of the client talks to, its HTTP
//! implementation, and normalization of the JSON the backend returns.

pub mod http;
pub mod wire;

use async_trait::async_trait;

use crate::analytics::{AnalyticsSummary, DailyRecord};
use crate::chat::{QueryReply, QueryRequest};

pub use http::HttpBackend;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },
    #[error("backend reported an error: {0}")]
    Reported(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Operations the client needs from the analytics service
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Answer a natural-language question
    async fn query(&self, request: &QueryRequest) -> Result<QueryReply, BackendError>;

    /// Per-day records for the last `days` days
    async fn analytics(&self, days: u32) -> Result<Vec<DailyRecord>, BackendError>;

    /// Precomputed aggregates
    async fn summary(&self) -> Result<AnalyticsSummary, BackendError>;
}
