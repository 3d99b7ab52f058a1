use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who produced a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Chart description produced by the backend.
///
/// Opaque to the chat core: it is stored and handed to the renderer exactly as received,
/// including any fields beyond `data` and `layout`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChartPayload {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub layout: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub text: String,
    pub role: Role,
    pub charts: Vec<ChartPayload>,
    pub follow_ups: Vec<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: Role::User,
            charts: Vec::new(),
            follow_ups: Vec::new(),
        }
    }

    pub fn assistant(
        text: impl Into<String>,
        charts: Vec<ChartPayload>,
        follow_ups: Vec<String>,
    ) -> Self {
        Self {
            text: text.into(),
            role: Role::Assistant,
            charts,
            follow_ups,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Append-only conversation log.
///
/// Entries are never edited, removed or reordered. `revision` increases with every
/// append so renderers can tell that something new arrived.
#[derive(Debug, Clone, Default)]
pub struct MessageHistory {
    messages: Vec<Message>,
    revision: u64,
}

impl MessageHistory {
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.revision += 1;
    }

    /// Read-only view in arrival order
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Most recent assistant turn, if any
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    /// Most recent assistant turn that carries at least one chart
    pub fn last_charts(&self) -> Option<&[ChartPayload]> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant && !m.charts.is_empty())
            .map(|m| m.charts.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_preserves_order_and_bumps_revision() {
        let mut history = MessageHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.revision(), 0);

        history.append(Message::user("first"));
        assert_eq!(history.revision(), 1);
        history.append(Message::assistant("second", vec![], vec![]));
        history.append(Message::user("third"));

        let texts: Vec<&str> = history.all().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.revision(), 3);
    }

    #[test]
    fn test_last_assistant_and_charts() {
        let mut history = MessageHistory::default();
        assert!(history.last_assistant().is_none());
        assert!(history.last_charts().is_none());

        let chart = ChartPayload {
            data: json!([{ "y": [1, 2, 3] }]),
            layout: json!({ "title": "Trend" }),
            ..Default::default()
        };
        history.append(Message::user("q1"));
        history.append(Message::assistant("a1", vec![chart.clone()], vec![]));
        history.append(Message::user("q2"));
        history.append(Message::assistant("a2", vec![], vec!["more?".to_string()]));

        assert_eq!(history.last_assistant().map(|m| m.text.as_str()), Some("a2"));
        assert_eq!(history.last_charts(), Some(&[chart][..]));
    }

    #[test]
    fn test_chart_payload_passes_unknown_fields_through() {
        let raw = json!({
            "data": [{ "type": "bar", "x": ["a"], "y": [1] }],
            "layout": { "title": { "text": "Bars" } },
            "config": { "responsive": true }
        });
        let payload: ChartPayload = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(payload.extra.get("config"), Some(&json!({ "responsive": true })));
        assert_eq!(serde_json::to_value(&payload).unwrap(), raw);
    }
}
