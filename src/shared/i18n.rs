use serde_json::{json, Value};
use std::collections::HashMap;

use super::language::Language;

/// Translation registry: one nested string tree per language, addressed by dotted keys
pub struct I18n {
    trees: HashMap<Language, Value>,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new()
    }
}

impl I18n {
    /// Registry with the built-in strings for every supported language
    pub fn new() -> Self {
        let trees = Language::ALL
            .into_iter()
            .map(|lang| (lang, builtin_tree(lang)))
            .collect();
        Self { trees }
    }

    #[cfg(test)]
    pub fn from_trees(trees: HashMap<Language, Value>) -> Self {
        Self { trees }
    }

    /// Resolve `key` (e.g. `dashboard.title`) for `language`.
    ///
    /// Any missing segment, or a terminal value that is not a string, yields the key
    /// itself so the gap stays visible on screen.
    pub fn t<'a>(&'a self, language: Language, key: &'a str) -> &'a str {
        let Some(mut node) = self.trees.get(&language) else {
            return key;
        };

        for segment in key.split('.') {
            match node.get(segment) {
                Some(child) => node = child,
                None => return key,
            }
        }

        node.as_str().unwrap_or(key)
    }

    /// Every dotted path that ends in a string leaf for `language`, sorted
    #[cfg(test)]
    pub fn key_paths(&self, language: Language) -> Vec<String> {
        let mut paths = Vec::new();
        if let Some(tree) = self.trees.get(&language) {
            collect_paths(tree, String::new(), &mut paths);
        }
        paths.sort();
        paths
    }
}

#[cfg(test)]
fn collect_paths(node: &Value, prefix: String, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (segment, child) in map {
                let path = if prefix.is_empty() {
                    segment.clone()
                } else {
                    format!("{prefix}.{segment}")
                };
                collect_paths(child, path, out);
            }
        }
        Value::String(_) => out.push(prefix),
        _ => {}
    }
}

fn builtin_tree(language: Language) -> Value {
    match language {
        Language::English => json!({
            "app": {
                "title": "Business Intelligence Assistant",
                "chatTab": "Chat",
                "dashboardTab": "Dashboard",
                "language": "Language"
            },
            "dashboard": {
                "title": "Analytics Dashboard",
                "totalUsers": "Total Users",
                "avgBounceRate": "Average Bounce Rate",
                "totalRevenue": "Total Revenue",
                "usersOverTime": "Users Over Time",
                "revenueOverTime": "Revenue Over Time",
                "bounceRateTrend": "Bounce Rate Trend",
                "sessionDuration": "Session Duration",
                "dailyUsers": "Daily Users",
                "dailyRevenue": "Daily Revenue",
                "dailyBounceRate": "Daily Bounce Rate (%)",
                "avgSessionDuration": "Average Session Duration (seconds)",
                "loading": "Loading...",
                "error": "Failed to fetch analytics data",
                "noData": "No data available",
                "summary": {
                    "avgPageViews": "Average Page Views",
                    "avgUniqueVisitors": "Average Unique Visitors",
                    "avgSessionDuration": "Average Session Duration",
                    "bounceRate": "Bounce Rate",
                    "conversionRate": "Conversion Rate",
                    "minutes": "min"
                }
            },
            "chat": {
                "predefinedQuestions": "Predefined Questions",
                "placeholder": "Ask about your business data...",
                "error": "Sorry, there was an error processing your query.",
                "loading": "Processing your query...",
                "followUps": "Follow-up questions",
                "you": "You",
                "assistant": "Assistant",
                "empty": "Ask a question to get started",
                "charts": "Charts",
                "chartUnavailable": "Chart cannot be drawn in the terminal"
            },
            "controls": {
                "send": "send",
                "switchView": "switch view",
                "language": "language",
                "predefined": "predefined",
                "followUp": "follow-up",
                "theme": "theme",
                "refresh": "refresh",
                "help": "help",
                "quit": "quit"
            },
            "help": {
                "title": "Help",
                "line1": "Type a question and press Enter to send it.",
                "line2": "Ctrl+P fills the input with a predefined question.",
                "line3": "Ctrl+F fills the input with a suggested follow-up.",
                "line4": "Ctrl+L switches between English, Mandarin and Cantonese.",
                "line5": "Tab switches between the chat and the dashboard.",
                "line6": "On the dashboard, r reloads the analytics snapshot."
            },
            "status": {
                "languageChanged": "Language switched",
                "themeChanged": "Theme changed",
                "busy": "Still waiting for the previous answer"
            }
        }),
        Language::Mandarin => json!({
            "app": {
                "title": "商业智能助手",
                "chatTab": "对话",
                "dashboardTab": "仪表板",
                "language": "语言"
            },
            "dashboard": {
                "title": "分析仪表板",
                "totalUsers": "总用户数",
                "avgBounceRate": "平均跳出率",
                "totalRevenue": "总收入",
                "usersOverTime": "用户趋势",
                "revenueOverTime": "收入趋势",
                "bounceRateTrend": "跳出率趋势",
                "sessionDuration": "会话时长",
                "dailyUsers": "每日用户",
                "dailyRevenue": "每日收入",
                "dailyBounceRate": "每日跳出率 (%)",
                "avgSessionDuration": "平均会话时长 (秒)",
                "loading": "加载中...",
                "error": "获取分析数据失败",
                "noData": "暂无数据",
                "summary": {
                    "avgPageViews": "平均页面浏览量",
                    "avgUniqueVisitors": "平均独立访客",
                    "avgSessionDuration": "平均会话时长",
                    "bounceRate": "跳出率",
                    "conversionRate": "转化率",
                    "minutes": "分钟"
                }
            },
            "chat": {
                "predefinedQuestions": "预设问题",
                "placeholder": "询问您的业务数据...",
                "error": "抱歉，处理您的查询时出现错误。",
                "loading": "正在处理您的查询...",
                "followUps": "后续问题",
                "you": "您",
                "assistant": "助手",
                "empty": "提出一个问题开始对话",
                "charts": "图表",
                "chartUnavailable": "无法在终端中绘制此图表"
            },
            "controls": {
                "send": "发送",
                "switchView": "切换视图",
                "language": "语言",
                "predefined": "预设问题",
                "followUp": "后续问题",
                "theme": "主题",
                "refresh": "刷新",
                "help": "帮助",
                "quit": "退出"
            },
            "help": {
                "title": "帮助",
                "line1": "输入问题后按 Enter 发送。",
                "line2": "Ctrl+P 将预设问题填入输入框。",
                "line3": "Ctrl+F 将建议的后续问题填入输入框。",
                "line4": "Ctrl+L 在英语、普通话和粤语之间切换。",
                "line5": "Tab 在对话和仪表板之间切换。",
                "line6": "在仪表板上按 r 重新加载分析数据。"
            },
            "status": {
                "languageChanged": "语言已切换",
                "themeChanged": "主题已更改",
                "busy": "仍在等待上一个回答"
            }
        }),
        Language::Cantonese => json!({
            "app": {
                "title": "商業智能助手",
                "chatTab": "對話",
                "dashboardTab": "儀表板",
                "language": "語言"
            },
            "dashboard": {
                "title": "分析儀表板",
                "totalUsers": "總用戶數",
                "avgBounceRate": "平均跳出率",
                "totalRevenue": "總收入",
                "usersOverTime": "用戶趨勢",
                "revenueOverTime": "收入趨勢",
                "bounceRateTrend": "跳出率趨勢",
                "sessionDuration": "會話時長",
                "dailyUsers": "每日用戶",
                "dailyRevenue": "每日收入",
                "dailyBounceRate": "每日跳出率 (%)",
                "avgSessionDuration": "平均會話時長 (秒)",
                "loading": "載入緊...",
                "error": "攞唔到分析數據",
                "noData": "暫時冇數據",
                "summary": {
                    "avgPageViews": "平均頁面瀏覽量",
                    "avgUniqueVisitors": "平均獨立訪客",
                    "avgSessionDuration": "平均會話時長",
                    "bounceRate": "跳出率",
                    "conversionRate": "轉化率",
                    "minutes": "分鐘"
                }
            },
            "chat": {
                "predefinedQuestions": "預設問題",
                "placeholder": "查詢您嘅業務數據...",
                "error": "抱歉，處理您嘅查詢時出現錯誤。",
                "loading": "正在處理您嘅查詢...",
                "followUps": "跟進問題",
                "you": "你",
                "assistant": "助手",
                "empty": "問個問題開始傾偈",
                "charts": "圖表",
                "chartUnavailable": "呢個圖表喺終端度畫唔到"
            },
            "controls": {
                "send": "發送",
                "switchView": "切換畫面",
                "language": "語言",
                "predefined": "預設問題",
                "followUp": "跟進問題",
                "theme": "主題",
                "refresh": "重新整理",
                "help": "幫助",
                "quit": "離開"
            },
            "help": {
                "title": "幫助",
                "line1": "輸入問題之後撳 Enter 發送。",
                "line2": "Ctrl+P 將預設問題填入輸入框。",
                "line3": "Ctrl+F 將建議嘅跟進問題填入輸入框。",
                "line4": "Ctrl+L 喺英文、普通話同粵語之間切換。",
                "line5": "Tab 喺對話同儀表板之間切換。",
                "line6": "喺儀表板撳 r 重新載入分析數據。"
            },
            "status": {
                "languageChanged": "語言已切換",
                "themeChanged": "主題已更改",
                "busy": "仲等緊上一個回覆"
            }
        }),
    }
}
