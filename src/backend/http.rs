use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use super::{wire, AnalyticsBackend, BackendError};
use crate::analytics::{AnalyticsSummary, DailyRecord};
use crate::chat::{QueryReply, QueryRequest};

const USER_AGENT: &str = concat!("bi-assistant/", env!("CARGO_PKG_VERSION"));

/// Analytics backend reached over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend rooted at `base_url`; `timeout` of none waits indefinitely
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a JSON body, mapping non-2xx statuses to [`BackendError::Status`]
    async fn json_body(response: Response) -> Result<Value, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: error_detail(&body),
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

/// FastAPI puts the reason under `detail`; fall back to the raw body
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => match json.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl AnalyticsBackend for HttpBackend {
    async fn query(&self, request: &QueryRequest) -> Result<QueryReply, BackendError> {
        let response = self
            .client
            .post(self.url("/query"))
            .json(request)
            .send()
            .await?;

        let body = Self::json_body(response).await?;
        wire::parse_query_reply(body)
    }

    async fn analytics(&self, days: u32) -> Result<Vec<DailyRecord>, BackendError> {
        let response = self
            .client
            .get(self.url("/analytics"))
            .query(&[("days", days)])
            .send()
            .await?;

        let body = Self::json_body(response).await?;
        wire::parse_series(body)
    }

    async fn summary(&self) -> Result<AnalyticsSummary, BackendError> {
        let response = self
            .client
            .get(self.url("/analytics/summary"))
            .send()
            .await?;

        let body = Self::json_body(response).await?;
        wire::parse_summary(body)
    }
}
