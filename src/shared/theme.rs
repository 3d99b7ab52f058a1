use ratatui::style::{Color, Modifier, Style};

use super::config::ThemeMode;

/// Color palette for the assistant TUI
#[derive(Debug, Clone)]
pub struct ModernTheme {
    // Primary colors
    pub primary: Color,
    pub accent: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // Conversation colors
    pub user_bubble: Color,
    pub assistant_bubble: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_disabled: Color,

    // Interactive colors
    pub selected: Color,
    pub border: Color,
    pub border_focused: Color,

    /// Line colors for chart series, used in order
    pub series: [Color; 4],
}

impl Default for ModernTheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl ModernTheme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
            ThemeMode::Ocean => Self::ocean(),
        }
    }

    /// Dark theme with indigo accents
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(99, 102, 241), // Indigo-500
            accent: Color::Rgb(168, 85, 247),  // Purple-500

            success: Color::Rgb(34, 197, 94),  // Green-500
            warning: Color::Rgb(251, 191, 36), // Amber-500
            danger: Color::Rgb(239, 68, 68),   // Red-500
            info: Color::Rgb(59, 130, 246),    // Blue-500

            user_bubble: Color::Rgb(96, 165, 250),      // Blue-400
            assistant_bubble: Color::Rgb(229, 231, 235), // Gray-200

            text_primary: Color::Rgb(243, 244, 246), // Gray-100
            text_secondary: Color::Rgb(156, 163, 175), // Gray-400
            text_disabled: Color::Rgb(107, 114, 128), // Gray-500

            selected: Color::Rgb(99, 102, 241),
            border: Color::Rgb(75, 85, 99), // Gray-600
            border_focused: Color::Rgb(99, 102, 241),

            series: [
                Color::Rgb(75, 192, 192),
                Color::Rgb(255, 99, 132),
                Color::Rgb(251, 191, 36),
                Color::Rgb(168, 85, 247),
            ],
        }
    }

    /// Light theme variant
    pub fn light() -> Self {
        Self {
            primary: Color::Rgb(99, 102, 241),
            accent: Color::Rgb(147, 51, 234),

            success: Color::Rgb(22, 163, 74),
            warning: Color::Rgb(217, 119, 6),
            danger: Color::Rgb(220, 38, 38),
            info: Color::Rgb(37, 99, 235),

            user_bubble: Color::Rgb(29, 78, 216),
            assistant_bubble: Color::Rgb(31, 41, 55),

            text_primary: Color::Rgb(17, 24, 39),
            text_secondary: Color::Rgb(75, 85, 99),
            text_disabled: Color::Rgb(156, 163, 175),

            selected: Color::Rgb(99, 102, 241),
            border: Color::Rgb(209, 213, 219),
            border_focused: Color::Rgb(99, 102, 241),

            series: [
                Color::Rgb(13, 148, 136),
                Color::Rgb(225, 29, 72),
                Color::Rgb(202, 138, 4),
                Color::Rgb(124, 58, 237),
            ],
        }
    }

    /// Ocean blue theme with cool tones
    pub fn ocean() -> Self {
        Self {
            primary: Color::Rgb(14, 165, 233), // Sky-500
            accent: Color::Rgb(20, 184, 166),  // Teal-500

            success: Color::Rgb(16, 185, 129), // Emerald-500
            warning: Color::Rgb(245, 158, 11), // Amber-500
            danger: Color::Rgb(239, 68, 68),
            info: Color::Rgb(59, 130, 246),

            user_bubble: Color::Rgb(56, 189, 248),       // Sky-400
            assistant_bubble: Color::Rgb(226, 232, 240), // Slate-200

            text_primary: Color::Rgb(248, 250, 252), // Slate-50
            text_secondary: Color::Rgb(148, 163, 184), // Slate-400
            text_disabled: Color::Rgb(100, 116, 139), // Slate-500

            selected: Color::Rgb(14, 165, 233),
            border: Color::Rgb(71, 85, 105), // Slate-600
            border_focused: Color::Rgb(14, 165, 233),

            series: [
                Color::Rgb(45, 212, 191),
                Color::Rgb(251, 113, 133),
                Color::Rgb(250, 204, 21),
                Color::Rgb(129, 140, 248),
            ],
        }
    }

    /// Color for the `index`th series in a chart
    pub fn series_color(&self, index: usize) -> Color {
        self.series[index % self.series.len()]
    }
}

/// Icons used across the UI
pub struct ModernIcons;

impl ModernIcons {
    pub const USER: &'static str = "▶";
    pub const ASSISTANT: &'static str = "◆";
    pub const CHART: &'static str = "▲";
    pub const SUGGESTION: &'static str = "→";
    pub const LANGUAGE: &'static str = "◎";
    pub const CHAT: &'static str = "◉";
    pub const DASHBOARD: &'static str = "⬢";
    pub const BULLET: &'static str = "•";
    pub const ERROR: &'static str = "✗";
}

/// Pre-defined styles for common UI elements
impl ModernTheme {
    /// Style for headers and titles
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for secondary text
    pub fn secondary_text_style(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn success_style(&self) -> Style {
        Style::default()
            .fg(self.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning_style(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    pub fn danger_style(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Style for selected items
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.text_primary)
            .bg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for numbers and metrics
    pub fn metric_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for dimmed/disabled elements
    pub fn dimmed_style(&self) -> Style {
        Style::default().fg(self.text_disabled)
    }

    pub fn user_style(&self) -> Style {
        Style::default()
            .fg(self.user_bubble)
            .add_modifier(Modifier::BOLD)
    }

    pub fn assistant_style(&self) -> Style {
        Style::default().fg(self.assistant_bubble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_mode_picks_palette() {
        assert_eq!(ModernTheme::for_mode(ThemeMode::Dark).border, Color::Rgb(75, 85, 99));
        assert_eq!(
            ModernTheme::for_mode(ThemeMode::Light).text_primary,
            Color::Rgb(17, 24, 39)
        );
        assert_eq!(
            ModernTheme::for_mode(ThemeMode::Ocean).primary,
            Color::Rgb(14, 165, 233)
        );
    }

    #[test]
    fn test_series_color_wraps() {
        let theme = ModernTheme::dark();
        assert_eq!(theme.series_color(0), theme.series_color(4));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn test_user_and_assistant_styles_differ() {
        for theme in [ModernTheme::dark(), ModernTheme::light(), ModernTheme::ocean()] {
            assert_ne!(theme.user_style(), theme.assistant_style());
        }
    }
}
