use crate::cli::ServeArgs;
use crate::infra::{AnalyticsState, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cohort_insight::config::AppConfig;
use cohort_insight::dataset::{DatasetSnapshot, SnapshotStore};
use cohort_insight::error::AppError;
use cohort_insight::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let store = Arc::new(SnapshotStore::new(DatasetSnapshot::load(&config.data)));

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        store: store.clone(),
    };
    let analytics_state = AnalyticsState {
        store,
        ceilings: config.grading,
        data: config.data.clone(),
    };

    let app = with_service_routes(analytics_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "cohort analytics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
