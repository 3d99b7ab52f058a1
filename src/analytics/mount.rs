use super::snapshot::{AnalyticsSnapshot, LoadError};

/// What the dashboard currently shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashboardState {
    #[default]
    Unmounted,
    Loading,
    Ready(AnalyticsSnapshot),
    Failed(String),
}

/// Lifecycle of the dashboard's snapshot.
///
/// Each mount (or refetch) gets a fresh generation. A load result is only applied when
/// its generation is still current, so a result arriving after unmount is dropped.
#[derive(Debug, Default)]
pub struct SnapshotMount {
    generation: u64,
    state: DashboardState,
}

impl SnapshotMount {
    /// Start a new load; returns the generation the result must carry
    pub fn mount(&mut self) -> u64 {
        self.generation += 1;
        self.state = DashboardState::Loading;
        self.generation
    }

    pub fn unmount(&mut self) {
        self.generation += 1;
        self.state = DashboardState::Unmounted;
    }

    pub fn is_mounted(&self) -> bool {
        self.state != DashboardState::Unmounted
    }

    pub fn is_loading(&self) -> bool {
        self.state == DashboardState::Loading
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Apply a finished load; returns false when the result was stale and discarded
    pub fn accept(&mut self, generation: u64, result: Result<AnalyticsSnapshot, LoadError>) -> bool {
        if generation != self.generation || self.state == DashboardState::Unmounted {
            tracing::debug!(generation, current = self.generation, "discarding stale snapshot");
            return false;
        }

        self.state = match result {
            Ok(snapshot) => DashboardState::Ready(snapshot),
            Err(err) => {
                tracing::warn!("analytics snapshot failed: {err}");
                DashboardState::Failed(err.to_string())
            }
        };
        true
    }
}
