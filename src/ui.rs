use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, Paragraph, Tabs, Widget, Wrap},
    Frame,
};

use crate::{
    analytics::{
        metrics::{format_count, format_currency, format_percent},
        AnalyticsSnapshot, DailyRecord, DashboardState, SeriesMetrics,
    },
    app::{App, StatusType, View},
    chat::{predefined_questions, ChartPayload, Message, Role},
    shared::theme::{ModernIcons, ModernTheme},
    widgets::{
        display_width, icon_span, metric_card, modern_block, plot_view, tail_to_width,
        truncate_to_width, LineChartCard, ModernCard, PlotSeries,
    },
};

/// Draw the main UI
pub fn draw(f: &mut Frame, app: &App) {
    let theme = &app.theme;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.size());

    draw_header(f, chunks[0], app, theme);
    match app.view {
        View::Chat => draw_chat(f, chunks[1], app, theme),
        View::Dashboard => draw_dashboard(f, chunks[1], app, theme),
    }
    draw_footer(f, chunks[2], app, theme);

    if app.config.show_help {
        draw_help_overlay(f, f.size(), app, theme);
    }
}

/// Tabs on the left, language and status on the right
fn draw_header(f: &mut Frame, area: Rect, app: &App, theme: &ModernTheme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(48)])
        .split(area);

    let tab_titles = vec![
        format!("{} {}", ModernIcons::CHAT, app.t("app.chatTab")),
        format!("{} {}", ModernIcons::DASHBOARD, app.t("app.dashboardTab")),
    ];

    let tabs = Tabs::new(tab_titles)
        .block(modern_block(Some(app.t("app.title")), theme, false))
        .style(theme.secondary_text_style())
        .highlight_style(theme.selected_style())
        .select(app.view.index());

    f.render_widget(tabs, chunks[0]);

    let mut spans = vec![
        icon_span(ModernIcons::LANGUAGE, Style::default().fg(theme.primary)),
        Span::styled(
            format!(" {}", app.current_language().display_name()),
            theme.header_style(),
        ),
    ];

    if app.is_waiting() {
        spans.push(Span::styled(
            format!(" {}", app.spinner.current()),
            theme.warning_style(),
        ));
    }

    if let Some(ref status) = app.status_message {
        let (icon, style) = match status.message_type {
            StatusType::Info => ("ℹ", theme.info_style()),
            StatusType::Success => ("✓", theme.success_style()),
            StatusType::Warning => ("⚠", theme.warning_style()),
            StatusType::Error => (ModernIcons::ERROR, theme.danger_style()),
        };
        spans.push(Span::styled(" │ ", theme.border_style()));
        spans.push(Span::styled(format!("{icon} {}", status.text), style));
    }

    ModernCard::new(Text::from(Line::from(spans)), theme)
        .title(app.t("app.language"))
        .render(chunks[1], f.buffer_mut());
}

fn draw_chat(f: &mut Frame, area: Rect, app: &App, theme: &ModernTheme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(columns[0]);

    draw_transcript(f, left[0], app, theme);
    draw_input(f, left[1], app, theme);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(9)])
        .split(columns[1]);

    draw_chart_panel(f, right[0], app, theme);
    draw_suggestions(f, right[1], app, theme);
}

/// Conversation, pinned to the newest message
fn draw_transcript(f: &mut Frame, area: Rect, app: &App, theme: &ModernTheme) {
    let history = app.dispatcher.history();
    let title = format!("{} · {}", app.t("app.chatTab"), history.len());
    let block = modern_block(Some(&title), theme, false);
    let inner = block.inner(area);
    block.render(area, f.buffer_mut());

    let mut lines: Vec<Line> = Vec::new();

    if history.is_empty() && !app.dispatcher.is_busy() {
        lines.push(Line::from(Span::styled(
            app.t("chat.empty"),
            theme.dimmed_style(),
        )));
    }

    for message in history.all() {
        push_message_lines(&mut lines, message, app, theme);
    }

    if app.dispatcher.is_busy() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", app.spinner.current()), theme.warning_style()),
            Span::styled(app.t("chat.loading"), theme.dimmed_style()),
        ]));
    }

    let height = wrapped_height(&lines, inner.width);
    let scroll = height.saturating_sub(inner.height as usize);

    Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(u16::MAX as usize) as u16, 0))
        .render(inner, f.buffer_mut());
}

fn push_message_lines<'a>(
    lines: &mut Vec<Line<'a>>,
    message: &'a Message,
    app: &'a App,
    theme: &ModernTheme,
) {
    let (icon, label, style) = match message.role {
        Role::User => (ModernIcons::USER, app.t("chat.you"), theme.user_style()),
        Role::Assistant => (
            ModernIcons::ASSISTANT,
            app.t("chat.assistant"),
            theme.header_style().fg(theme.accent),
        ),
    };
    lines.push(Line::from(vec![
        icon_span(icon, style),
        Span::styled(format!(" {label}"), style),
    ]));

    let body_style = if message.is_user() {
        theme.user_style().remove_modifier(Modifier::BOLD)
    } else {
        theme.assistant_style()
    };
    for text_line in message.text.lines() {
        lines.push(Line::from(Span::styled(format!("  {text_line}"), body_style)));
    }

    if !message.charts.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            icon_span(ModernIcons::CHART, theme.info_style()),
            Span::styled(
                format!(" {} × {}", app.t("chat.charts"), message.charts.len()),
                theme.info_style(),
            ),
        ]));
    }

    if !message.follow_ups.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", app.t("chat.followUps")),
            theme.secondary_text_style(),
        )));
        for follow_up in &message.follow_ups {
            lines.push(Line::from(vec![
                Span::styled(format!("   {} ", ModernIcons::SUGGESTION), theme.info_style()),
                Span::styled(follow_up.as_str(), theme.secondary_text_style()),
            ]));
        }
    }

    lines.push(Line::from(""));
}

/// Rows the lines occupy once wrapped to `width` columns
fn wrapped_height(lines: &[Line], width: u16) -> usize {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|line| {
            let columns: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
            columns.max(1).div_ceil(width)
        })
        .sum()
}

fn draw_input(f: &mut Frame, area: Rect, app: &App, theme: &ModernTheme) {
    let busy = app.dispatcher.is_busy();
    let block = modern_block(Some(app.t("controls.send")), theme, !busy);
    let inner = block.inner(area);
    block.render(area, f.buffer_mut());

    let content = if busy {
        Span::styled(app.t("chat.loading"), theme.dimmed_style())
    } else if app.input.is_empty() {
        Span::styled(app.t("chat.placeholder"), theme.dimmed_style())
    } else {
        let visible = tail_to_width(&app.input, inner.width.saturating_sub(1) as usize);
        Span::styled(visible, Style::default().fg(theme.text_primary))
    };
    Paragraph::new(Line::from(content)).render(inner, f.buffer_mut());

    if !busy && !app.config.show_help && inner.width > 0 {
        let visible = tail_to_width(&app.input, inner.width.saturating_sub(1) as usize);
        let offset = display_width(visible) as u16;
        f.set_cursor(inner.x + offset.min(inner.width - 1), inner.y);
    }
}

/// Charts of the most recent assistant answer that carried any
fn draw_chart_panel(f: &mut Frame, area: Rect, app: &App, theme: &ModernTheme) {
    let Some(charts) = app.dispatcher.history().last_charts() else {
        let note = Text::from(Span::styled(app.t("dashboard.noData"), theme.dimmed_style()));
        ModernCard::new(note, theme)
            .title(app.t("chat.charts"))
            .render(area, f.buffer_mut());
        return;
    };

    let constraints: Vec<Constraint> = charts
        .iter()
        .map(|_| Constraint::Ratio(1, charts.len() as u32))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (index, (chart, slot)) in charts.iter().zip(slots.iter()).enumerate() {
        draw_chart(f, *slot, chart, index, app, theme);
    }
}

fn draw_chart(
    f: &mut Frame,
    area: Rect,
    chart: &ChartPayload,
    index: usize,
    app: &App,
    theme: &ModernTheme,
) {
    let view = plot_view(chart);
    let title = view
        .title
        .clone()
        .unwrap_or_else(|| format!("{} {}", app.t("chat.charts"), index + 1));

    if view.is_drawable() {
        LineChartCard::new(&title, &view.series, theme)
            .empty_note(app.t("dashboard.noData"))
            .render(area, f.buffer_mut());
    } else {
        let note = Text::from(vec![Line::from(vec![
            icon_span(ModernIcons::CHART, theme.dimmed_style()),
            Span::styled(format!(" {}", app.t("chat.chartUnavailable")), theme.dimmed_style()),
        ])]);
        ModernCard::new(note, theme)
            .title(&title)
            .render(area, f.buffer_mut());
    }
}

/// Follow-ups of the latest answer, else the predefined questions
fn draw_suggestions(f: &mut Frame, area: Rect, app: &App, theme: &ModernTheme) {
    let width = area.width.saturating_sub(6) as usize;

    let follow_ups = app
        .dispatcher
        .history()
        .last_assistant()
        .map(|m| m.follow_ups.as_slice())
        .unwrap_or_default();

    let (title, hint, items): (&str, &str, Vec<&str>) = if follow_ups.is_empty() {
        (
            app.t("chat.predefinedQuestions"),
            "Ctrl+P",
            predefined_questions(app.current_language()).to_vec(),
        )
    } else {
        (
            app.t("chat.followUps"),
            "Ctrl+F",
            follow_ups.iter().map(String::as_str).collect(),
        )
    };

    let mut lines: Vec<Line> = items
        .iter()
        .map(|item| {
            Line::from(vec![
                Span::styled(format!("{} ", ModernIcons::BULLET), theme.info_style()),
                Span::styled(truncate_to_width(item, width), theme.secondary_text_style()),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(hint, key_style(theme))));

    ModernCard::new(Text::from(lines), theme)
        .title(title)
        .render(area, f.buffer_mut());
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App, theme: &ModernTheme) {
    match app.dashboard.state() {
        DashboardState::Unmounted | DashboardState::Loading => {
            let content = Text::from(Line::from(vec![
                Span::styled(format!("{} ", app.spinner.current()), theme.warning_style()),
                Span::styled(app.t("dashboard.loading"), theme.secondary_text_style()),
            ]));
            ModernCard::new(content, theme)
                .title(app.t("dashboard.title"))
                .render(area, f.buffer_mut());
        }
        DashboardState::Failed(detail) => {
            let content = Text::from(vec![
                Line::from(vec![
                    icon_span(ModernIcons::ERROR, theme.danger_style()),
                    Span::styled(format!(" {}", app.t("dashboard.error")), theme.danger_style()),
                ]),
                Line::from(Span::styled(detail.as_str(), theme.dimmed_style())),
            ]);
            ModernCard::new(content, theme)
                .title(app.t("dashboard.title"))
                .render(area, f.buffer_mut());
        }
        DashboardState::Ready(snapshot) => draw_snapshot(f, area, snapshot, app, theme),
    }
}

fn draw_snapshot(
    f: &mut Frame,
    area: Rect,
    snapshot: &AnalyticsSnapshot,
    app: &App,
    theme: &ModernTheme,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Client-reduced totals
            Constraint::Length(3), // Backend summary
            Constraint::Min(0),    // Charts
        ])
        .split(area);

    let metrics = SeriesMetrics::from_series(&snapshot.series);
    let totals = [
        (app.t("dashboard.totalUsers"), format_count(metrics.total_users)),
        (
            app.t("dashboard.avgBounceRate"),
            format_percent(metrics.average_bounce_rate),
        ),
        (
            app.t("dashboard.totalRevenue"),
            format_currency(metrics.total_revenue),
        ),
    ];
    draw_card_row(f, rows[0], &totals, theme);

    let summary = &snapshot.summary;
    let summary_cards = [
        (
            app.t("dashboard.summary.avgPageViews"),
            format!("{:.1}", summary.average_page_views),
        ),
        (
            app.t("dashboard.summary.avgUniqueVisitors"),
            format!("{:.1}", summary.average_unique_visitors),
        ),
        (
            app.t("dashboard.summary.avgSessionDuration"),
            format!(
                "{:.1} {}",
                summary.average_session_duration,
                app.t("dashboard.summary.minutes")
            ),
        ),
        (
            app.t("dashboard.summary.bounceRate"),
            format_percent(summary.average_bounce_rate),
        ),
        (
            app.t("dashboard.summary.conversionRate"),
            format_percent(summary.average_conversion_rate),
        ),
    ];
    draw_card_row(f, rows[1], &summary_cards, theme);

    let grid = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(grid[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(grid[1]);

    let series = &snapshot.series;
    let charts = [
        (
            top[0],
            app.t("dashboard.usersOverTime"),
            daily_series(app.t("dashboard.dailyUsers"), series, |r| r.users as f64),
        ),
        (
            top[1],
            app.t("dashboard.revenueOverTime"),
            daily_series(app.t("dashboard.dailyRevenue"), series, |r| r.revenue),
        ),
        (
            bottom[0],
            app.t("dashboard.bounceRateTrend"),
            daily_series(app.t("dashboard.dailyBounceRate"), series, |r| {
                r.bounce_rate * 100.0
            }),
        ),
        (
            bottom[1],
            app.t("dashboard.sessionDuration"),
            daily_series(app.t("dashboard.avgSessionDuration"), series, |r| {
                r.avg_session_duration
            }),
        ),
    ];

    for (slot, title, plot) in &charts {
        let plot = std::slice::from_ref(plot);
        LineChartCard::new(title, plot, theme)
            .empty_note(app.t("dashboard.noData"))
            .render(*slot, f.buffer_mut());
    }
}

fn draw_card_row(f: &mut Frame, area: Rect, cards: &[(&str, String)], theme: &ModernTheme) {
    let constraints: Vec<Constraint> = cards
        .iter()
        .map(|_| Constraint::Ratio(1, cards.len() as u32))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for ((label, value), slot) in cards.iter().zip(slots.iter()) {
        metric_card(label, value.clone(), theme).render(*slot, f.buffer_mut());
    }
}

/// One metric over the series, indexed by day and labeled with short dates
fn daily_series(
    name: &str,
    series: &[DailyRecord],
    value: impl Fn(&DailyRecord) -> f64,
) -> PlotSeries {
    PlotSeries {
        name: name.to_string(),
        points: series
            .iter()
            .enumerate()
            .map(|(i, record)| (i as f64, value(record)))
            .collect(),
        x_labels: series.iter().map(DailyRecord::short_date).collect(),
    }
}

fn key_style(theme: &ModernTheme) -> Style {
    Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD)
}

/// Key bindings for the current view
fn draw_footer(f: &mut Frame, area: Rect, app: &App, theme: &ModernTheme) {
    let bindings: Vec<(&str, &str)> = match app.view {
        View::Chat => vec![
            ("Enter", app.t("controls.send")),
            ("Ctrl+P", app.t("controls.predefined")),
            ("Ctrl+F", app.t("controls.followUp")),
            ("Ctrl+L", app.t("controls.language")),
            ("Ctrl+T", app.t("controls.theme")),
            ("Tab", app.t("controls.switchView")),
            ("F1", app.t("controls.help")),
            ("Esc", app.t("controls.quit")),
        ],
        View::Dashboard => vec![
            ("r", app.t("controls.refresh")),
            ("t", app.t("controls.theme")),
            ("Ctrl+L", app.t("controls.language")),
            ("Tab", app.t("controls.switchView")),
            ("F1", app.t("controls.help")),
            ("q/Esc", app.t("controls.quit")),
        ],
    };

    let mut spans = Vec::new();
    for (i, (key, label)) in bindings.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", theme.secondary_text_style()));
        }
        spans.push(Span::styled(key, key_style(theme)));
        spans.push(Span::styled(format!(" {label}"), theme.secondary_text_style()));
    }
    spans.push(Span::styled(
        format!("  ({})", app.config.theme_display()),
        theme.info_style(),
    ));

    ModernCard::new(Text::from(Line::from(spans)), theme).render(area, f.buffer_mut());
}

/// Draw help overlay with explanations
fn draw_help_overlay(f: &mut Frame, area: Rect, app: &App, theme: &ModernTheme) {
    // Centered popup, never larger than the terminal
    let width = area.width * 2 / 3;
    let height = (area.height / 2).max(10).min(area.height);
    let popup_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
    .intersection(area);

    // Clear the background
    f.render_widget(Clear, popup_area);

    let mut lines = Vec::new();
    for key in [
        "help.line1",
        "help.line2",
        "help.line3",
        "help.line4",
        "help.line5",
        "help.line6",
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", ModernIcons::BULLET), theme.info_style()),
            Span::styled(app.t(key), theme.secondary_text_style()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("F1/Esc", key_style(theme)),
        Span::styled(format!(" {}", app.t("controls.help")), theme.dimmed_style()),
    ]));

    ModernCard::new(Text::from(lines), theme)
        .title(app.t("help.title"))
        .focused(true)
        .render(popup_area, f.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::shared::Config;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app() -> App {
        App::new(Config::default(), Arc::new(FakeBackend::default()))
    }

    fn render(app: &App, width: u16, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
    }

    #[test]
    fn test_help_overlay_fits_short_terminals() {
        let mut app = app();
        app.config.show_help = true;

        for height in 1..=24 {
            render(&app, 80, height);
        }
        for width in [10, 40] {
            render(&app, width, 12);
        }
    }

    #[test]
    fn test_help_overlay_shows_localized_title() {
        let mut app = app();
        app.config.show_help = true;

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let out = format!("{:?}", terminal.backend().buffer());
        assert!(out.contains("Help"));
    }

    #[test]
    fn test_views_render_without_help() {
        let mut app = app();
        render(&app, 80, 12);

        app.view = View::Dashboard;
        render(&app, 80, 12);
        render(&app, 120, 40);
    }
}
