use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::chat::ChartPayload;
use crate::shared::theme::ModernTheme;

/// Card widget: bordered block with wrapped text content
pub struct ModernCard<'a> {
    title: Option<&'a str>,
    content: Text<'a>,
    theme: &'a ModernTheme,
    focused: bool,
}

impl<'a> ModernCard<'a> {
    pub fn new(content: Text<'a>, theme: &'a ModernTheme) -> Self {
        Self {
            title: None,
            content,
            theme,
            focused: false,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl<'a> Widget for ModernCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = modern_block(self.title, self.theme, self.focused);
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.content)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// Single headline number with its label, as on the dashboard summary row
pub fn metric_card<'a>(label: &'a str, value: String, theme: &'a ModernTheme) -> ModernCard<'a> {
    let content = Text::from(vec![Line::from(vec![metric_span(value, theme)])]);
    ModernCard::new(content, theme).title(label)
}

/// One line series extracted from a chart payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    /// Category labels for x when the payload's x values were not numeric
    pub x_labels: Vec<String>,
}

/// What the terminal can draw of a chart payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotView {
    pub title: Option<String>,
    pub series: Vec<PlotSeries>,
}

impl PlotView {
    pub fn is_drawable(&self) -> bool {
        self.series.iter().any(|s| !s.points.is_empty())
    }
}

/// Read the Plotly-style traces of `payload` without modifying it.
///
/// A trace is drawable when it has a numeric `y` array. Numeric `x` values are used as
/// given; otherwise points are indexed and the x values kept as labels.
pub fn plot_view(payload: &ChartPayload) -> PlotView {
    let title = match payload.layout.get("title") {
        Some(Value::String(title)) => Some(title.clone()),
        Some(other) => other.get("text").and_then(Value::as_str).map(str::to_string),
        None => None,
    };

    let traces: Vec<&Value> = match &payload.data {
        Value::Array(items) => items.iter().collect(),
        trace @ Value::Object(_) => vec![trace],
        _ => Vec::new(),
    };

    let series = traces
        .into_iter()
        .enumerate()
        .filter_map(|(index, trace)| plot_series(index, trace))
        .collect();

    PlotView { title, series }
}

fn plot_series(index: usize, trace: &Value) -> Option<PlotSeries> {
    let ys = trace.get("y")?.as_array()?;
    let xs = trace.get("x").and_then(Value::as_array);
    let numeric_xs: Option<Vec<f64>> = xs
        .and_then(|xs| xs.iter().map(Value::as_f64).collect())
        .filter(|xs: &Vec<f64>| xs.len() >= ys.len());

    // Pair by position first so a null y leaves a gap instead of shifting later points
    let points: Vec<(f64, f64)> = ys
        .iter()
        .enumerate()
        .filter_map(|(i, y)| {
            let x = numeric_xs.as_ref().map_or(i as f64, |xs| xs[i]);
            y.as_f64().map(|y| (x, y))
        })
        .collect();
    if points.is_empty() {
        return None;
    }

    let x_labels = match (&numeric_xs, xs) {
        (None, Some(xs)) => xs
            .iter()
            .map(|x| match x {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };

    let name = trace
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("trace {}", index + 1));

    Some(PlotSeries {
        name,
        points,
        x_labels,
    })
}

/// Line chart over one or more series, with min/max axis labels
pub struct LineChartCard<'a> {
    title: &'a str,
    series: &'a [PlotSeries],
    theme: &'a ModernTheme,
    empty_note: &'a str,
}

impl<'a> LineChartCard<'a> {
    pub fn new(title: &'a str, series: &'a [PlotSeries], theme: &'a ModernTheme) -> Self {
        Self {
            title,
            series,
            theme,
            empty_note: "",
        }
    }

    pub fn empty_note(mut self, note: &'a str) -> Self {
        self.empty_note = note;
        self
    }
}

impl<'a> Widget for LineChartCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let all_points = || self.series.iter().flat_map(|s| s.points.iter());
        if all_points().next().is_none() {
            let note = Text::from(Span::styled(self.empty_note, self.theme.dimmed_style()));
            ModernCard::new(note, self.theme)
                .title(self.title)
                .render(area, buf);
            return;
        }

        let (x_min, x_max) = padded_bounds(all_points().map(|(x, _)| *x));
        let (y_min, y_max) = padded_bounds(all_points().map(|(_, y)| *y));

        let x_labels = match self.series.iter().find(|s| !s.x_labels.is_empty()) {
            Some(series) => vec![
                Span::raw(series.x_labels.first().cloned().unwrap_or_default()),
                Span::raw(series.x_labels.last().cloned().unwrap_or_default()),
            ],
            None => vec![Span::raw(format_axis(x_min)), Span::raw(format_axis(x_max))],
        };

        let datasets = self
            .series
            .iter()
            .enumerate()
            .map(|(i, series)| {
                Dataset::default()
                    .name(series.name.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.theme.series_color(i)))
                    .data(&series.points)
            })
            .collect();

        Chart::new(datasets)
            .block(modern_block(Some(self.title), self.theme, false))
            .x_axis(
                Axis::default()
                    .style(self.theme.secondary_text_style())
                    .bounds([x_min, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(self.theme.secondary_text_style())
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::raw(format_axis(y_min)),
                        Span::raw(format_axis(y_max)),
                    ]),
            )
            .render(area, buf);
    }
}

/// Min and max of `values`, widened when they coincide so the axis has extent
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    (min, max)
}

/// Compact axis label
pub fn format_axis(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Create a bordered block
pub fn modern_block<'a>(title: Option<&'a str>, theme: &'a ModernTheme, focused: bool) -> Block<'a> {
    let border_style = if focused {
        theme.border_focused_style()
    } else {
        theme.border_style()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    if let Some(title) = title {
        block = block.title(Span::styled(format!(" {title} "), theme.header_style()));
    }

    block
}

/// Create an icon span with styling
pub fn icon_span<'a>(icon: &'a str, style: Style) -> Span<'a> {
    Span::styled(icon, style)
}

/// Create a metric span with styling
pub fn metric_span<'a>(text: String, theme: &'a ModernTheme) -> Span<'a> {
    Span::styled(text, theme.metric_style())
}

/// Cut `text` to at most `max_width` terminal columns, adding an ellipsis when cut.
///
/// Works on grapheme clusters so wide CJK characters are never split.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.width();
        if used + width > max_width - 1 {
            break;
        }
        out.push_str(grapheme);
        used += width;
    }
    out.push('…');
    out
}

/// Display width of `text` in terminal columns
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Keep the end of `text` that fits in `max_width` columns, so the caret stays visible
pub fn tail_to_width(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (index, grapheme) in text.grapheme_indices(true).rev() {
        let width = grapheme.width();
        if used + width > max_width {
            break;
        }
        used += width;
        start = index;
    }
    &text[start..]
}
