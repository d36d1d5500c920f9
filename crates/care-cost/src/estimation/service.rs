use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::context::AssessmentOutcome;
use super::domain::{CareCostEstimate, CareType};
use super::{CareCostEngine, Comparison, EstimationError};
use crate::regional::{Location, RegionalMultiplierSource};

/// Inbound estimate request. An explicit multiplier takes precedence over the location lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub assessment: AssessmentOutcome,
    #[serde(default)]
    pub regional_multiplier: Option<f64>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub care_type: Option<CareType>,
    /// Extra care types to price side by side with the primary estimate.
    #[serde(default)]
    pub compare: Vec<CareType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResponse {
    pub estimate: CareCostEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
}

#[derive(Debug, thiserror::Error)]
pub enum EstimateServiceError {
    #[error(transparent)]
    Estimation(#[from] EstimationError),
}

/// Resolves the regional multiplier and hands the request to the engine.
pub struct EstimateService<S> {
    engine: Arc<CareCostEngine>,
    regions: Arc<S>,
}

impl<S> EstimateService<S>
where
    S: RegionalMultiplierSource + 'static,
{
    pub fn new(engine: Arc<CareCostEngine>, regions: Arc<S>) -> Self {
        Self { engine, regions }
    }

    pub fn engine(&self) -> &CareCostEngine {
        &self.engine
    }

    pub fn regional_multiplier(&self, request: &EstimateRequest) -> f64 {
        match (request.regional_multiplier, request.location.as_ref()) {
            (Some(multiplier), _) => multiplier,
            (None, Some(location)) => self.regions.multiplier_for(location),
            (None, None) => crate::regional::NATIONAL_AVERAGE,
        }
    }

    pub fn estimate(
        &self,
        request: &EstimateRequest,
    ) -> Result<EstimateResponse, EstimateServiceError> {
        let multiplier = self.regional_multiplier(request);
        debug!(multiplier, care_type = ?request.care_type, "estimating care cost");

        let estimate = match request.care_type {
            Some(care_type) => self
                .engine
                .estimate_as(&request.assessment, multiplier, care_type)?,
            None => self.engine.estimate(&request.assessment, multiplier)?,
        };

        let comparison = if request.compare.is_empty() {
            None
        } else {
            Some(
                self.engine
                    .compare(&request.assessment, multiplier, &request.compare)?,
            )
        };

        Ok(EstimateResponse {
            estimate,
            comparison,
        })
    }
}
