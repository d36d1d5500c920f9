use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredRegions};
use crate::routes::with_estimate_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use care_cost::config::AppConfig;
use care_cost::error::AppError;
use care_cost::estimation::{CareCostEngine, EstimateService};
use care_cost::telemetry;
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
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let regions = Arc::new(ConfiguredRegions::load(
        config.estimator.regional_table.as_deref(),
    )?);
    let estimate_service = Arc::new(EstimateService::new(
        Arc::new(CareCostEngine::standard()),
        regions,
    ));

    let app = with_estimate_routes(estimate_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "care cost estimator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
