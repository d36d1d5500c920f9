//! Tier-based care cost estimation.
//!
//! The engine normalizes an assessment outcome, places the individual in a
//! care setting and tier, prices the placement against the national cost
//! tables scaled by a regional multiplier, adds capped secondary services,
//! and wraps the total in a confidence-scored range.

pub mod add_ons;
pub mod context;
pub mod domain;
pub mod escalation;
pub mod explanations;
pub mod pricing;
pub mod ranges;
pub mod recommendations;
pub mod router;
pub mod rules;
pub mod service;
pub mod tiers;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

pub use context::{AssessmentOutcome, ClinicalContext, NormalizedAnswers};
pub use domain::{
    AddOn, AddOnKind, CareCostEstimate, CareType, Confidence, CostBreakdown, CostRange, LineItem,
    LineItemKind, Tier,
};
pub use escalation::{EscalationStep, Placement};
pub use pricing::CostTables;
pub use router::estimate_router;
pub use service::{EstimateRequest, EstimateService, EstimateServiceError};

pub const MODEL_VERSION: &str = "3.0.0";
pub const CALCULATION_METHOD: &str = "tier_based";

const NO_CARE_EXPLANATION: &str =
    "No paid care services are needed based on the current assessment.";

/// Failures that stop an estimate. Everything else resolves to a defined default.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimationError {
    #[error("regional multiplier must be a positive finite number, got {0}")]
    InvalidRegionalMultiplier(f64),
    #[error("no base cost configured for {0}")]
    MissingBaseCost(CareType),
    #[error("no tier increment configured for {care_type} {tier}")]
    MissingTierIncrement { care_type: CareType, tier: Tier },
}

impl EstimationError {
    /// Caller contract violation rather than a broken configuration.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, EstimationError::InvalidRegionalMultiplier(_))
    }
}

/// Several care options priced against the same assessment and multiplier.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Comparison {
    pub estimates: Vec<CareCostEstimate>,
    pub table: String,
}

/// Orchestrates one estimate end to end. Holds only the read-only cost
/// tables, so a single engine can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct CareCostEngine {
    tables: Arc<CostTables>,
}

impl Default for CareCostEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl CareCostEngine {
    pub fn new(tables: Arc<CostTables>) -> Self {
        Self { tables }
    }

    pub fn standard() -> Self {
        Self::new(CostTables::standard())
    }

    pub fn tables(&self) -> &CostTables {
        &self.tables
    }

    /// Estimate using the assessment's own care classification, with escalation.
    pub fn estimate(
        &self,
        outcome: &AssessmentOutcome,
        regional_multiplier: f64,
    ) -> Result<CareCostEstimate, EstimationError> {
        let context = ClinicalContext::from_outcome(outcome);
        self.estimate_context(
            &context,
            outcome.recommended_care_type(),
            None,
            regional_multiplier,
        )
    }

    /// Estimate a specific care type. The forced type is priced as is; escalation does not run.
    pub fn estimate_as(
        &self,
        outcome: &AssessmentOutcome,
        regional_multiplier: f64,
        care_type: CareType,
    ) -> Result<CareCostEstimate, EstimationError> {
        let context = ClinicalContext::from_outcome(outcome);
        self.estimate_context(
            &context,
            outcome.recommended_care_type(),
            Some(care_type),
            regional_multiplier,
        )
    }

    pub fn compare(
        &self,
        outcome: &AssessmentOutcome,
        regional_multiplier: f64,
        care_types: &[CareType],
    ) -> Result<Comparison, EstimationError> {
        let context = ClinicalContext::from_outcome(outcome);
        let recommended = outcome.recommended_care_type();

        let estimates = care_types
            .iter()
            .map(|care_type| {
                self.estimate_context(&context, recommended, Some(*care_type), regional_multiplier)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Comparison {
            table: explanations::comparison_table(&estimates),
            estimates,
        })
    }

    /// Core pipeline over an already normalized context.
    pub fn estimate_context(
        &self,
        context: &ClinicalContext,
        recommended: CareType,
        care_type_override: Option<CareType>,
        regional_multiplier: f64,
    ) -> Result<CareCostEstimate, EstimationError> {
        if !regional_multiplier.is_finite() || regional_multiplier <= 0.0 {
            return Err(EstimationError::InvalidRegionalMultiplier(regional_multiplier));
        }

        let incoming = care_type_override.unwrap_or(recommended);
        let estimate = match incoming {
            CareType::NoCareNeeded => no_care_estimate(recommended, regional_multiplier),
            CareType::InHomeCare => self.in_home_estimate(context, recommended, regional_multiplier)?,
            CareType::AssistedLiving | CareType::MemoryCare | CareType::MemoryCareHighAcuity => {
                let placement = match care_type_override {
                    Some(care_type) => Placement {
                        care_type,
                        tier: tiers::assign_tier(care_type, context),
                        steps: Vec::new(),
                    },
                    None => escalation::resolve(context, incoming),
                };
                self.facility_estimate(context, recommended, placement, regional_multiplier)?
            }
        };

        info!(
            care_type = %estimate.care_type,
            recommended = %estimate.recommended_care_type,
            tier = estimate.tier.value(),
            total = estimate.breakdown.total,
            confidence = estimate.range.confidence.label(),
            escalated = estimate.escalated(),
            "care cost estimate completed"
        );
        Ok(estimate)
    }

    fn facility_estimate(
        &self,
        context: &ClinicalContext,
        recommended: CareType,
        placement: Placement,
        regional_multiplier: f64,
    ) -> Result<CareCostEstimate, EstimationError> {
        let pricing = pricing::price_facility(
            &self.tables,
            placement.care_type,
            placement.tier,
            regional_multiplier,
        )?;
        let add_on_set = add_ons::calculate_add_ons(context, pricing.regional_base);
        let breakdown = pricing::assemble_breakdown(
            &pricing,
            add_on_set.add_ons,
            add_on_set.cap,
            regional_multiplier,
        );
        let range = ranges::calculate_range(breakdown.total, context, placement.care_type);

        Ok(CareCostEstimate {
            care_type: placement.care_type,
            recommended_care_type: recommended,
            tier: placement.tier,
            tier_label: pricing.tier_label,
            tier_description: pricing.tier_description,
            explanation: explanations::quick_summary(placement.care_type, &range),
            recommendations: recommendations::for_placement(placement.care_type, placement.tier),
            escalation_path: placement.steps,
            hours_per_day: None,
            breakdown,
            range,
            regional_multiplier,
            model_version: MODEL_VERSION.to_string(),
            calculation_method: CALCULATION_METHOD.to_string(),
        })
    }

    fn in_home_estimate(
        &self,
        context: &ClinicalContext,
        recommended: CareType,
        regional_multiplier: f64,
    ) -> Result<CareCostEstimate, EstimationError> {
        let hours_per_day = context.answers().hours_per_day;
        let pricing = pricing::price_in_home(&self.tables, hours_per_day, regional_multiplier)?;
        let breakdown =
            pricing::assemble_breakdown(&pricing, Vec::new(), 0.0, regional_multiplier);
        let range = ranges::calculate_range(breakdown.total, context, CareType::InHomeCare);

        Ok(CareCostEstimate {
            care_type: CareType::InHomeCare,
            recommended_care_type: recommended,
            tier: Tier::ZERO,
            tier_label: pricing.tier_label,
            tier_description: pricing.tier_description,
            explanation: explanations::quick_summary(CareType::InHomeCare, &range),
            recommendations: recommendations::for_placement(CareType::InHomeCare, Tier::ZERO),
            escalation_path: Vec::new(),
            hours_per_day: Some(hours_per_day),
            breakdown,
            range,
            regional_multiplier,
            model_version: MODEL_VERSION.to_string(),
            calculation_method: CALCULATION_METHOD.to_string(),
        })
    }
}

fn no_care_estimate(recommended: CareType, regional_multiplier: f64) -> CareCostEstimate {
    CareCostEstimate {
        care_type: CareType::NoCareNeeded,
        recommended_care_type: recommended,
        tier: Tier::ZERO,
        tier_label: "No Care Needed".to_string(),
        tier_description: NO_CARE_EXPLANATION.to_string(),
        breakdown: CostBreakdown::zero(),
        range: ranges::zero_range(NO_CARE_EXPLANATION),
        explanation: NO_CARE_EXPLANATION.to_string(),
        recommendations: recommendations::for_placement(CareType::NoCareNeeded, Tier::ZERO),
        escalation_path: Vec::new(),
        hours_per_day: None,
        regional_multiplier,
        model_version: MODEL_VERSION.to_string(),
        calculation_method: CALCULATION_METHOD.to_string(),
    }
}
