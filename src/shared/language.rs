use serde::{Deserialize, Serialize};

/// Languages the assistant can converse in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Mandarin,
    #[serde(rename = "yue")]
    Cantonese,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Mandarin, Language::Cantonese];

    /// Wire code sent to the backend
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Mandarin => "zh",
            Language::Cantonese => "yue",
        }
    }

    /// Name shown in the language switcher, always in the language itself
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Mandarin => "中文",
            Language::Cantonese => "粵語",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Next language in switcher order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            Language::English => Language::Mandarin,
            Language::Mandarin => Language::Cantonese,
            Language::Cantonese => Language::English,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a language selection, for callers that want a stricter contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Changed(Language),
    Unchanged,
    Rejected,
}

/// Current-language context shared by every consumer.
///
/// Owned by the application and handed out by reference; a `select` is visible to the
/// very next `current()` read.
#[derive(Debug, Clone, Default)]
pub struct LanguageContext {
    current: Language,
}

impl LanguageContext {
    pub fn new(initial: Language) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Language {
        self.current
    }

    /// Switch to `code` if it names a supported language.
    ///
    /// Unknown codes leave the current language untouched and are never an error.
    pub fn select(&mut self, code: &str) -> SelectOutcome {
        match Language::from_code(code) {
            Some(lang) if lang == self.current => SelectOutcome::Unchanged,
            Some(lang) => {
                tracing::info!(from = %self.current, to = %lang, "language changed");
                self.current = lang;
                SelectOutcome::Changed(lang)
            }
            None => {
                tracing::warn!(code, "ignoring unsupported language code");
                SelectOutcome::Rejected
            }
        }
    }

    pub fn select_next(&mut self) -> SelectOutcome {
        let next = self.current.next();
        self.select(next.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::from_code("EN"), None);
    }

    #[test]
    fn test_serializes_as_wire_code() {
        assert_eq!(serde_json::to_string(&Language::Cantonese).unwrap(), "\"yue\"");
        let lang: Language = serde_json::from_str("\"zh\"").unwrap();
        assert_eq!(lang, Language::Mandarin);
    }

    #[test]
    fn test_select_known_code() {
        let mut ctx = LanguageContext::default();
        assert_eq!(ctx.current(), Language::English);

        assert_eq!(ctx.select("yue"), SelectOutcome::Changed(Language::Cantonese));
        assert_eq!(ctx.current(), Language::Cantonese);

        assert_eq!(ctx.select("yue"), SelectOutcome::Unchanged);
        assert_eq!(ctx.current(), Language::Cantonese);
    }

    #[test]
    fn test_select_unknown_code_is_ignored() {
        let mut ctx = LanguageContext::new(Language::Mandarin);
        for code in ["fr", "", "zh-TW", "english", " en"] {
            assert_eq!(ctx.select(code), SelectOutcome::Rejected);
            assert_eq!(ctx.current(), Language::Mandarin);
        }
    }

    #[test]
    fn test_select_next_cycles_all_languages() {
        let mut ctx = LanguageContext::default();
        ctx.select_next();
        assert_eq!(ctx.current(), Language::Mandarin);
        ctx.select_next();
        assert_eq!(ctx.current(), Language::Cantonese);
        ctx.select_next();
        assert_eq!(ctx.current(), Language::English);
    }
}
