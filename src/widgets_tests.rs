//! Tests for chart payload interpretation and widget rendering

#[cfg(test)]
mod tests {
    use crate::{chat::ChartPayload, shared::theme::*, widgets::*};
    use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
    use serde_json::json;

    fn payload(data: serde_json::Value, layout: serde_json::Value) -> ChartPayload {
        ChartPayload {
            data,
            layout,
            ..Default::default()
        }
    }

    fn rendered(widget: impl Widget, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        format!("{buf:?}")
    }

    #[test]
    fn test_plot_view_reads_title_and_traces() {
        let chart = payload(
            json!([
                { "x": ["2024-01-01", "2024-01-02"], "y": [10, 20], "name": "users" },
                { "x": [1, 2], "y": [3.5, 4.5] }
            ]),
            json!({ "title": { "text": "Users" } }),
        );

        let view = plot_view(&chart);

        assert_eq!(view.title.as_deref(), Some("Users"));
        assert_eq!(view.series.len(), 2);
        assert_eq!(view.series[0].name, "users");
        assert_eq!(view.series[0].points, vec![(0.0, 10.0), (1.0, 20.0)]);
        assert_eq!(view.series[0].x_labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(view.series[1].name, "trace 2");
        assert_eq!(view.series[1].points, vec![(1.0, 3.5), (2.0, 4.5)]);
        assert!(view.series[1].x_labels.is_empty());
        assert!(view.is_drawable());
    }

    #[test]
    fn test_plot_view_null_y_keeps_x_alignment() {
        let chart = payload(
            json!([
                { "x": [10, 20, 30, 40], "y": [1, null, 3, 4] },
                { "x": ["Mon", "Tue", "Wed"], "y": [5, null, 7] }
            ]),
            json!({}),
        );
        let view = plot_view(&chart);

        assert_eq!(view.series[0].points, vec![(10.0, 1.0), (30.0, 3.0), (40.0, 4.0)]);
        assert_eq!(view.series[1].points, vec![(0.0, 5.0), (2.0, 7.0)]);
        assert_eq!(view.series[1].x_labels, vec!["Mon", "Tue", "Wed"]);
    }

    #[test]
    fn test_plot_view_plain_string_title() {
        let chart = payload(json!({ "y": [1, 2, 3] }), json!({ "title": "Revenue" }));
        let view = plot_view(&chart);

        assert_eq!(view.title.as_deref(), Some("Revenue"));
        assert_eq!(view.series[0].points.len(), 3);
    }

    #[test]
    fn test_plot_view_skips_non_numeric_traces() {
        let chart = payload(
            json!([{ "type": "pie", "labels": ["a", "b"], "values": [1, 2] }]),
            json!({}),
        );
        let view = plot_view(&chart);

        assert_eq!(view.title, None);
        assert!(view.series.is_empty());
        assert!(!view.is_drawable());
    }

    #[test]
    fn test_plot_view_leaves_payload_untouched() {
        let chart = payload(json!([{ "y": [1] }]), json!({ "title": "t" }));
        let before = chart.clone();
        let _ = plot_view(&chart);
        assert_eq!(chart, before);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // Wide characters take two columns each
        assert_eq!(truncate_to_width("收入趋势分析", 5), "收入…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_tail_to_width_keeps_end() {
        assert_eq!(tail_to_width("hello world", 5), "world");
        assert_eq!(tail_to_width("hi", 5), "hi");
        assert_eq!(tail_to_width("用户数", 4), "户数");
        assert_eq!(display_width("用户数"), 6);
    }

    #[test]
    fn test_format_axis() {
        assert_eq!(format_axis(12.0), "12");
        assert_eq!(format_axis(0.25), "0.25");
        assert_eq!(format_axis(1500.0), "1.5K");
        assert_eq!(format_axis(2_500_000.0), "2.5M");
    }

    #[test]
    fn test_line_chart_renders_title() {
        let theme = ModernTheme::dark();
        let series = vec![PlotSeries {
            name: "users".to_string(),
            points: vec![(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)],
            x_labels: vec![],
        }];

        let out = rendered(LineChartCard::new("Users", &series, &theme), 40, 12);
        assert!(out.contains("Users"));
    }

    #[test]
    fn test_line_chart_without_points_shows_note() {
        let theme = ModernTheme::dark();
        let out = rendered(
            LineChartCard::new("Revenue", &[], &theme).empty_note("No data available"),
            40,
            6,
        );
        assert!(out.contains("No data available"));
    }

    #[test]
    fn test_metric_card_renders_label_and_value() {
        let theme = ModernTheme::light();
        let out = rendered(metric_card("Total Users", "1,234".to_string(), &theme), 30, 3);
        assert!(out.contains("Total Users"));
        assert!(out.contains("1,234"));
    }
}
