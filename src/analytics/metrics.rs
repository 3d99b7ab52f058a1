use super::snapshot::DailyRecord;

/// Totals and averages reduced on the client from a series
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesMetrics {
    pub total_users: u64,
    pub total_revenue: f64,
    pub average_bounce_rate: f64,
    pub average_session_duration: f64,
}

impl SeriesMetrics {
    pub fn from_series(series: &[DailyRecord]) -> Self {
        Self {
            total_users: series.iter().map(|r| r.users).sum(),
            total_revenue: sum(series, |r| r.revenue),
            average_bounce_rate: mean(series, |r| r.bounce_rate),
            average_session_duration: mean(series, |r| r.avg_session_duration),
        }
    }
}

#[cfg(test)]
impl super::snapshot::AnalyticsSummary {
    /// Summary computed locally with the same semantics the backend uses
    pub fn from_series(series: &[DailyRecord]) -> Self {
        Self {
            average_page_views: mean(series, |r| r.page_views as f64),
            average_unique_visitors: mean(series, |r| r.unique_visitors as f64),
            average_session_duration: mean(series, |r| r.avg_session_duration),
            average_bounce_rate: mean(series, |r| r.bounce_rate),
            average_conversion_rate: mean(series, |r| r.conversion_rate),
            extra: serde_json::Map::new(),
        }
    }
}

/// Sum of `field` over every record
pub fn sum(series: &[DailyRecord], field: impl Fn(&DailyRecord) -> f64) -> f64 {
    series.iter().map(field).sum()
}

/// Arithmetic mean of `field`; an empty series averages to zero
pub fn mean(series: &[DailyRecord], field: impl Fn(&DailyRecord) -> f64) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    sum(series, field) / series.len() as f64
}

/// Format an integer with thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a ratio (0.0-1.0) as a percentage with one decimal
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format a currency amount, whole dollars with separators
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    if rounded < 0.0 {
        format!("-${}", format_count(rounded.abs() as u64))
    } else {
        format!("${}", format_count(rounded as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsSummary;

    const EPSILON: f64 = 1e-9;

    fn revenue(values: &[f64]) -> Vec<DailyRecord> {
        values
            .iter()
            .map(|&revenue| DailyRecord {
                revenue,
                ..Default::default()
            })
            .collect()
    }

    fn bounce(values: &[f64]) -> Vec<DailyRecord> {
        values
            .iter()
            .map(|&bounce_rate| DailyRecord {
                bounce_rate,
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_total_revenue() {
        let metrics = SeriesMetrics::from_series(&revenue(&[10.0, 20.0, 30.0]));
        assert!((metrics.total_revenue - 60.0).abs() < EPSILON);
    }

    #[test]
    fn test_average_bounce_rate() {
        let metrics = SeriesMetrics::from_series(&bounce(&[0.2, 0.4]));
        assert!((metrics.average_bounce_rate - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_empty_series_is_zero_not_nan() {
        let metrics = SeriesMetrics::from_series(&[]);
        assert_eq!(metrics, SeriesMetrics::default());
        assert_eq!(mean(&[], |r| r.bounce_rate), 0.0);

        let summary = AnalyticsSummary::from_series(&[]);
        assert_eq!(summary.average_bounce_rate, 0.0);
        assert!(!summary.average_page_views.is_nan());
    }

    #[test]
    fn test_client_summary_agrees_with_series_metrics() {
        let series = vec![
            DailyRecord {
                users: 100,
                page_views: 1000,
                unique_visitors: 600,
                bounce_rate: 0.2,
                avg_session_duration: 3.0,
                conversion_rate: 0.01,
                ..Default::default()
            },
            DailyRecord {
                users: 300,
                page_views: 3000,
                unique_visitors: 1400,
                bounce_rate: 0.4,
                avg_session_duration: 5.0,
                conversion_rate: 0.03,
                ..Default::default()
            },
        ];

        let metrics = SeriesMetrics::from_series(&series);
        let summary = AnalyticsSummary::from_series(&series);

        assert_eq!(metrics.total_users, 400);
        assert!((summary.average_page_views - 2000.0).abs() < EPSILON);
        assert!((summary.average_unique_visitors - 1000.0).abs() < EPSILON);
        assert!((summary.average_conversion_rate - 0.02).abs() < EPSILON);
        assert!((summary.average_bounce_rate - metrics.average_bounce_rate).abs() < EPSILON);
        assert!(
            (summary.average_session_duration - metrics.average_session_duration).abs() < EPSILON
        );
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_percent(0.3456), "34.6%");
        assert_eq!(format_currency(60.0), "$60");
        assert_eq!(format_currency(12345.6), "$12,346");
        assert_eq!(format_currency(-1500.0), "-$1,500");
    }
}
