use serde::{Deserialize, Serialize};

use super::message::{ChartPayload, Message, MessageHistory};
use crate::backend::BackendError;
use crate::shared::{I18n, Language};

/// Body of `POST /query`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRequest {
    pub text: String,
    pub language: Language,
}

/// Normalized successful answer from the backend
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryReply {
    pub text: String,
    pub charts: Vec<ChartPayload>,
    pub follow_ups: Vec<String>,
}

/// Why a submission did not start a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    Empty,
    Busy,
}

/// Drives one conversation: owns the history and at most one outstanding query.
///
/// A submission is split in two so the user turn is visible before the answer arrives:
/// [`begin`](Self::begin) appends the user message and yields the request to send,
/// [`complete`](Self::complete) appends the assistant message for its outcome.
/// Submissions made while a query is outstanding are dropped, not queued.
#[derive(Debug, Default)]
pub struct QueryDispatcher {
    history: MessageHistory,
    /// Language of the outstanding query; `Some` means busy
    pending: Option<Language>,
}

impl QueryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Validate `raw_text`, append the user turn and mark the dispatcher busy
    pub fn begin(&mut self, raw_text: &str, language: Language) -> Result<QueryRequest, Rejected> {
        let text = raw_text.trim();
        if text.is_empty() {
            tracing::debug!("dropping empty query");
            return Err(Rejected::Empty);
        }
        if self.is_busy() {
            tracing::debug!("dropping query while another is outstanding");
            return Err(Rejected::Busy);
        }

        self.history.append(Message::user(text));
        self.pending = Some(language);
        tracing::info!(%language, chars = text.chars().count(), "dispatching query");

        Ok(QueryRequest {
            text: text.to_string(),
            language,
        })
    }

    /// Append the assistant turn for the outstanding query.
    ///
    /// Failures become a localized apology in the query's language; nothing is
    /// returned to the caller. An outcome with no outstanding query is ignored.
    pub fn complete(&mut self, outcome: Result<QueryReply, BackendError>, i18n: &I18n) {
        let Some(language) = self.pending.take() else {
            tracing::warn!("query outcome arrived with no outstanding query");
            return;
        };

        let message = match outcome {
            Ok(reply) => {
                tracing::info!(
                    charts = reply.charts.len(),
                    follow_ups = reply.follow_ups.len(),
                    "query answered"
                );
                Message::assistant(reply.text, reply.charts, reply.follow_ups)
            }
            Err(err) => {
                tracing::warn!("query failed: {err}");
                Message::assistant(i18n.t(language, "chat.error"), Vec::new(), Vec::new())
            }
        };
        self.history.append(message);
    }

    /// Full round trip against `backend`: user turn, request, assistant turn
    #[cfg(test)]
    pub async fn submit(
        &mut self,
        backend: &dyn crate::backend::AnalyticsBackend,
        raw_text: &str,
        language: Language,
        i18n: &I18n,
    ) {
        let Ok(request) = self.begin(raw_text, language) else {
            return;
        };
        let outcome = backend.query(&request).await;
        self.complete(outcome, i18n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::chat::Role;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_submission_leaves_history_unchanged() {
        let backend = FakeBackend::answering(QueryReply::default());
        let i18n = I18n::new();
        let mut dispatcher = QueryDispatcher::new();

        dispatcher.submit(&backend, "", Language::English, &i18n).await;
        dispatcher.submit(&backend, "   \n\t", Language::English, &i18n).await;

        assert!(dispatcher.history().is_empty());
        assert!(backend.queries().is_empty());
        assert!(!dispatcher.is_busy());
    }

    #[tokio::test]
    async fn test_successful_round_trip() {
        let backend = FakeBackend::answering(QueryReply {
            text: "42".to_string(),
            charts: vec![],
            follow_ups: vec!["more?".to_string()],
        });
        let i18n = I18n::new();
        let mut dispatcher = QueryDispatcher::new();

        dispatcher.submit(&backend, "abc", Language::English, &i18n).await;

        let messages = dispatcher.history().all();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user("abc"));
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].text, "42");
        assert!(messages[1].charts.is_empty());
        assert_eq!(messages[1].follow_ups, vec!["more?".to_string()]);

        assert_eq!(
            backend.queries(),
            vec![QueryRequest {
                text: "abc".to_string(),
                language: Language::English,
            }]
        );
        assert!(!dispatcher.is_busy());
    }

    #[tokio::test]
    async fn test_failure_appends_localized_error() {
        let backend = FakeBackend::failing("boom");
        let i18n = I18n::new();
        let mut dispatcher = QueryDispatcher::new();

        dispatcher.submit(&backend, "abc", Language::English, &i18n).await;

        let messages = dispatcher.history().all();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::user("abc"));
        assert_eq!(
            messages[1],
            Message::assistant(i18n.t(Language::English, "chat.error"), vec![], vec![])
        );
        assert_eq!(
            messages[1].text,
            "Sorry, there was an error processing your query."
        );
    }

    #[tokio::test]
    async fn test_failure_uses_query_language() {
        let backend = FakeBackend::failing("boom");
        let i18n = I18n::new();
        let mut dispatcher = QueryDispatcher::new();

        dispatcher
            .submit(&backend, "轉化率係幾多？", Language::Cantonese, &i18n)
            .await;

        assert_eq!(
            dispatcher.history().all()[1].text,
            "抱歉，處理您嘅查詢時出現錯誤。"
        );
        assert_eq!(backend.queries()[0].language, Language::Cantonese);
    }

    #[test]
    fn test_user_turn_visible_before_answer() {
        let mut dispatcher = QueryDispatcher::new();

        let request = dispatcher.begin("  revenue trend ", Language::Mandarin).unwrap();
        assert_eq!(request.text, "revenue trend");
        assert_eq!(dispatcher.history().len(), 1);
        assert_eq!(dispatcher.history().revision(), 1);
        assert!(dispatcher.is_busy());

        dispatcher.complete(
            Ok(QueryReply {
                text: "up".to_string(),
                ..Default::default()
            }),
            &I18n::new(),
        );
        assert_eq!(dispatcher.history().len(), 2);
        assert_eq!(dispatcher.history().revision(), 2);
    }

    #[test]
    fn test_submission_while_busy_is_dropped() {
        let mut dispatcher = QueryDispatcher::new();

        dispatcher.begin("first", Language::English).unwrap();
        assert_eq!(dispatcher.begin("second", Language::English), Err(Rejected::Busy));
        assert_eq!(dispatcher.begin("", Language::English), Err(Rejected::Empty));
        assert_eq!(dispatcher.history().len(), 1);

        dispatcher.complete(Err(BackendError::Reported("x".to_string())), &I18n::new());
        assert!(dispatcher.begin("second", Language::English).is_ok());
        assert_eq!(dispatcher.history().len(), 3);
    }

    #[test]
    fn test_stray_completion_is_ignored() {
        let mut dispatcher = QueryDispatcher::new();
        dispatcher.complete(Ok(QueryReply::default()), &I18n::new());
        assert!(dispatcher.history().is_empty());
    }

    #[test]
    fn test_request_wire_format() {
        let request = QueryRequest {
            text: "abc".to_string(),
            language: Language::Cantonese,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "text": "abc", "language": "yue" })
        );
    }
}
