use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::{json, Value};

use crate::estimation::context::{AssessmentOutcome, ClinicalContext, NormalizedAnswers};
use crate::estimation::{CareCostEngine, EstimateService};
use crate::regional::{Location, RegionalMultiplierSource};

/// Context with the given flags and counts; everything else defaulted.
pub(super) fn context(flags: &[&str], adls: u32) -> ClinicalContext {
    context_with(
        flags,
        NormalizedAnswers {
            badls_count: adls,
            ..NormalizedAnswers::default()
        },
    )
}

pub(super) fn context_with(flags: &[&str], answers: NormalizedAnswers) -> ClinicalContext {
    ClinicalContext::new(flags.iter().copied(), answers)
}

pub(super) fn outcome(recommendation: &str, flags: &[&str], answers: Value) -> AssessmentOutcome {
    serde_json::from_value(json!({
        "flags": flags,
        "answers": answers,
        "recommendation": recommendation,
        "score": 42.0,
    }))
    .expect("outcome deserializes")
}

pub(super) fn adls(count: usize) -> Value {
    let all = ["bathing", "dressing", "toileting", "transferring", "eating", "continence"];
    json!(all.iter().take(count).collect::<Vec<_>>())
}

pub(super) fn engine() -> CareCostEngine {
    CareCostEngine::standard()
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {expected}, got {actual}"
    );
}

/// Fixed multiplier regardless of location, recording nothing.
pub(super) struct FixedRegion(pub(super) f64);

impl RegionalMultiplierSource for FixedRegion {
    fn multiplier_for(&self, _location: &Location) -> f64 {
        self.0
    }
}

pub(super) fn build_service(multiplier: f64) -> Arc<EstimateService<FixedRegion>> {
    Arc::new(EstimateService::new(
        Arc::new(engine()),
        Arc::new(FixedRegion(multiplier)),
    ))
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}
