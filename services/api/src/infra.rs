use cohort_insight::analytics::AnalyticsFacade;
use cohort_insight::config::{DataConfig, GradingCeilings};
use cohort_insight::dataset::SnapshotStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: Arc<SnapshotStore>,
}

/// Shared handles for the analytics routes.
#[derive(Clone)]
pub(crate) struct AnalyticsState {
    pub(crate) store: Arc<SnapshotStore>,
    pub(crate) ceilings: GradingCeilings,
    pub(crate) data: DataConfig,
}

impl AnalyticsState {
    /// Facade bound to the snapshot current at call time.
    pub(crate) fn facade(&self) -> AnalyticsFacade {
        AnalyticsFacade::new(self.store.current(), self.ceilings)
    }
}
