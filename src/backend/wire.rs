//! Normalization of backend response bodies.
//!
//! `/query` has been observed in two shapes: `{ response, charts }` and
//! `{ text, data, visualization, follow_up_questions }`. Both collapse into one
//! [`QueryReply`]:
//! - text is `text`, falling back to `response`; a body with neither is malformed
//! - charts are the `charts` list followed by the single `visualization`, if any
//! - follow-ups come from `follow_up_questions` (or `followUpQuestions`)
//! - `data` is accepted and ignored
//!
//! Every endpoint may report failure inside a 200 body through a non-empty `error`
//! field or `"success": false`; that is treated like a transport failure.

use serde::Deserialize;
use serde_json::Value;

use super::BackendError;
use crate::analytics::{AnalyticsSummary, DailyRecord};
use crate::chat::{ChartPayload, QueryReply};

/// Error carried inside an otherwise successful body, if any
pub fn reported_error(body: &Value) -> Option<String> {
    match body.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) if message.trim().is_empty() => {}
        Some(Value::String(message)) => return Some(message.clone()),
        Some(other) => return Some(other.to_string()),
    }

    if body.get("success") == Some(&Value::Bool(false)) {
        return Some("request was not successful".to_string());
    }
    None
}

fn check_reported(body: &Value) -> Result<(), BackendError> {
    match reported_error(body) {
        Some(message) => Err(BackendError::Reported(message)),
        None => Ok(()),
    }
}

/// Turn a `/query` body into a reply.
///
/// Optional fields that are missing, null or of the wrong shape become empty lists;
/// individual entries that are not chart objects or strings are skipped.
pub fn parse_query_reply(body: Value) -> Result<QueryReply, BackendError> {
    check_reported(&body)?;

    let text = ["text", "response"]
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_str))
        .ok_or_else(|| BackendError::Malformed("response has no text".to_string()))?
        .to_string();

    let mut charts: Vec<ChartPayload> = match body.get("charts") {
        Some(Value::Array(items)) => items.iter().filter_map(chart_from_value).collect(),
        _ => Vec::new(),
    };
    if let Some(chart) = body.get("visualization").and_then(chart_from_value) {
        charts.push(chart);
    }

    let follow_ups = ["follow_up_questions", "followUpQuestions"]
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(QueryReply {
        text,
        charts,
        follow_ups,
    })
}

fn chart_from_value(value: &Value) -> Option<ChartPayload> {
    if !value.is_object() {
        if !value.is_null() {
            tracing::debug!("skipping chart payload that is not an object");
        }
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

#[derive(Deserialize)]
struct SeriesBody {
    #[serde(default)]
    data: Option<Vec<DailyRecord>>,
}

#[derive(Deserialize)]
struct SummaryBody {
    #[serde(default)]
    summary: Option<AnalyticsSummary>,
}

/// Turn an `/analytics` body into records; a null `data` is an empty series
pub fn parse_series(body: Value) -> Result<Vec<DailyRecord>, BackendError> {
    check_reported(&body)?;
    let body: SeriesBody =
        serde_json::from_value(body).map_err(|err| BackendError::Malformed(err.to_string()))?;
    Ok(body.data.unwrap_or_default())
}

/// Turn an `/analytics/summary` body into a summary; a null `summary` is all zeros
pub fn parse_summary(body: Value) -> Result<AnalyticsSummary, BackendError> {
    check_reported(&body)?;
    let body: SummaryBody =
        serde_json::from_value(body).map_err(|err| BackendError::Malformed(err.to_string()))?;
    Ok(body.summary.unwrap_or_default())
}
