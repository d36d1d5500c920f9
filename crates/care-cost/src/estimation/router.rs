use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::service::{EstimateRequest, EstimateService, EstimateServiceError};
use crate::regional::RegionalMultiplierSource;

/// Router exposing the estimation engine over HTTP.
pub fn estimate_router<S>(service: Arc<EstimateService<S>>) -> Router
where
    S: RegionalMultiplierSource + 'static,
{
    Router::new()
        .route("/api/v1/care-cost/estimate", post(estimate_handler::<S>))
        .with_state(service)
}

pub(crate) async fn estimate_handler<S>(
    State(service): State<Arc<EstimateService<S>>>,
    axum::Json(request): axum::Json<EstimateRequest>,
) -> Response
where
    S: RegionalMultiplierSource + 'static,
{
    match service.estimate(&request) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(EstimateServiceError::Estimation(error)) if error.is_caller_error() => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            tracing::error!(error = %other, "care cost estimate failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
