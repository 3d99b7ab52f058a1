//! Analytics snapshot: the time series and summary behind the dashboard view

pub mod metrics;
pub mod mount;
pub mod snapshot;

pub use metrics::SeriesMetrics;
pub use mount::{DashboardState, SnapshotMount};
pub use snapshot::{load, AnalyticsSnapshot, AnalyticsSummary, DailyRecord, LoadError};
