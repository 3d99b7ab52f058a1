use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::backend::{AnalyticsBackend, BackendError};

/// One day (or one bucket) of site analytics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DailyRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub users: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub bounce_rate: f64,
    #[serde(alias = "session_duration", deserialize_with = "null_as_default")]
    pub avg_session_duration: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub page_views: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub unique_visitors: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub conversion_rate: f64,
}

/// SQL aggregates over an empty table come back as `null`; read those as zero
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DailyRecord {
    /// Short axis label, `MM-DD` when the date parses, the raw string otherwise
    pub fn short_date(&self) -> String {
        let raw = self.date.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return dt.format("%m-%d %H:%M").to_string();
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return dt.format("%m-%d %H:%M").to_string();
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date.format("%m-%d").to_string(),
            Err(_) => raw.to_string(),
        }
    }
}

/// Aggregates precomputed by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AnalyticsSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub average_page_views: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_unique_visitors: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_session_duration: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_bounce_rate: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_conversion_rate: f64,
    /// Any further aggregates the backend sends, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Series plus summary, loaded together and replaced together
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyticsSnapshot {
    pub series: Vec<DailyRecord>,
    pub summary: AnalyticsSummary,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to load analytics series: {0}")]
    Series(#[source] BackendError),
    #[error("failed to load analytics summary: {0}")]
    Summary(#[source] BackendError),
}

/// Fetch the series for the last `window_days` and the summary, concurrently.
///
/// Either call failing fails the whole load; no partial snapshot is returned. Records
/// are ordered oldest first regardless of the order the backend used.
pub async fn load(
    backend: &dyn AnalyticsBackend,
    window_days: u32,
) -> Result<AnalyticsSnapshot, LoadError> {
    tracing::info!(window_days, "loading analytics snapshot");

    let (mut series, summary) = tokio::try_join!(
        async {
            backend
                .analytics(window_days)
                .await
                .map_err(LoadError::Series)
        },
        async { backend.summary().await.map_err(LoadError::Summary) },
    )?;

    series.sort_by(|a, b| a.date.cmp(&b.date));
    tracing::info!(records = series.len(), "analytics snapshot loaded");

    Ok(AnalyticsSnapshot { series, summary })
}
