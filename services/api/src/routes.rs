use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use care_cost::estimation::{estimate_router, EstimateService};
use care_cost::regional::RegionalMultiplierSource;

pub(crate) fn with_estimate_routes<S>(service: Arc<EstimateService<S>>) -> axum::Router
where
    S: RegionalMultiplierSource + 'static,
{
    let tables = Arc::clone(&service);
    estimate_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/care-cost/tables",
            axum::routing::get(move || cost_tables_endpoint(Arc::clone(&tables))),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Published base costs, sources and tier schedules.
pub(crate) async fn cost_tables_endpoint<S>(service: Arc<EstimateService<S>>) -> impl IntoResponse
where
    S: RegionalMultiplierSource + 'static,
{
    Json(json!({
        "model_version": care_cost::estimation::MODEL_VERSION,
        "tables": service.engine().tables(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use care_cost::estimation::CareCostEngine;
    use care_cost::regional::NationalAverage;
    use serde_json::Value;
    use tower::ServiceExt;

    fn service() -> Arc<EstimateService<NationalAverage>> {
        Arc::new(EstimateService::new(
            Arc::new(CareCostEngine::standard()),
            Arc::new(NationalAverage),
        ))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = with_estimate_routes(service())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn tables_endpoint_lists_base_costs() {
        let response = with_estimate_routes(service())
            .oneshot(
                Request::get("/api/v1/care-cost/tables")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["model_version"], "3.0.0");
        assert_eq!(
            body["tables"]["base_costs"][0]["rate"]["monthly"],
            5900.0
        );
    }

    #[tokio::test]
    async fn estimate_route_is_mounted() {
        let response = with_estimate_routes(service())
            .oneshot(
                Request::post("/api/v1/care-cost/estimate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"assessment": {"recommendation": "memory_care"}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["estimate"]["breakdown"]["total"], 7400.0);
    }

    #[tokio::test]
    async fn readiness_tracks_flag() {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder().handle();
        let state = AppState {
            readiness: Arc::new(std::sync::atomic::AtomicBool::new(false)),
            metrics: Arc::new(handle),
        };

        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state
            .readiness
            .store(true, std::sync::atomic::Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
