use crate::shared::Language;

const ENGLISH: &[&str] = &[
    "What was my bounce rate last month?",
    "How many users visited my site today?",
    "What's the average session duration?",
    "Show me the revenue trend",
    "What's the conversion rate?",
];

const MANDARIN: &[&str] = &[
    "上个月的跳出率是多少？",
    "今天有多少用户访问了我的网站？",
    "平均会话时长是多少？",
    "显示收入趋势",
    "转化率是多少？",
];

const CANTONESE: &[&str] = &[
    "上個月嘅跳出率係幾多？",
    "今日有幾多用戶訪問咗我嘅網站？",
    "平均會話時長係幾多？",
    "顯示收入趨勢",
    "轉化率係幾多？",
];

/// Static prompts offered to seed a conversation in `language`
pub fn predefined_questions(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => ENGLISH,
        Language::Mandarin => MANDARIN,
        Language::Cantonese => CANTONESE,
    }
}

/// Rotating pick over a list of suggestions.
///
/// Each `next` returns the following entry, wrapping around; a list that changed length
/// since the last pick restarts from the top.
#[derive(Debug, Clone, Default)]
pub struct SuggestionCursor {
    position: Option<usize>,
    len: usize,
}

impl SuggestionCursor {
    pub fn next<'a, S: AsRef<str>>(&mut self, suggestions: &'a [S]) -> Option<&'a str> {
        if suggestions.is_empty() {
            self.reset();
            return None;
        }

        let index = match self.position {
            Some(pos) if self.len == suggestions.len() => (pos + 1) % suggestions.len(),
            _ => 0,
        };
        self.position = Some(index);
        self.len = suggestions.len();
        Some(suggestions[index].as_ref())
    }

    pub fn reset(&mut self) {
        self.position = None;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_same_number_of_questions() {
        let expected = predefined_questions(Language::English).len();
        assert_eq!(expected, 5);
        for lang in Language::ALL {
            let questions = predefined_questions(lang);
            assert_eq!(questions.len(), expected);
            assert!(questions.iter().all(|q| !q.trim().is_empty()));
        }
    }

    #[test]
    fn test_questions_follow_language() {
        assert_eq!(predefined_questions(Language::Mandarin)[3], "显示收入趋势");
        assert_eq!(predefined_questions(Language::Cantonese)[3], "顯示收入趨勢");
    }

    #[test]
    fn test_cursor_wraps_around() {
        let mut cursor = SuggestionCursor::default();
        let items = ["a", "b", "c"];
        assert_eq!(cursor.next(&items), Some("a"));
        assert_eq!(cursor.next(&items), Some("b"));
        assert_eq!(cursor.next(&items), Some("c"));
        assert_eq!(cursor.next(&items), Some("a"));
    }

    #[test]
    fn test_cursor_restarts_when_list_changes() {
        let mut cursor = SuggestionCursor::default();
        assert_eq!(cursor.next(&["a", "b"]), Some("a"));
        assert_eq!(cursor.next(&["a", "b"]), Some("b"));

        let follow_ups = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        assert_eq!(cursor.next(&follow_ups), Some("x"));

        let empty: [&str; 0] = [];
        assert_eq!(cursor.next(&empty), None);
        assert_eq!(cursor.next(&follow_ups), Some("x"));
    }
}
