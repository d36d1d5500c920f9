use super::context::{flags, ClinicalContext};
use super::domain::{CareType, Confidence, CostRange};
use super::rules::{Cascade, Condition, Facts, Rule};

/// Classification result of an uncertainty rule plus the sentence it contributes.
#[derive(Clone, Copy)]
pub struct Widening {
    pub confidence: Confidence,
    pub factor: fn(&Facts<'_>) -> String,
}

impl std::fmt::Debug for Widening {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widening")
            .field("confidence", &self.confidence)
            .finish_non_exhaustive()
    }
}

const fn widening(confidence: Confidence, factor: fn(&Facts<'_>) -> String) -> Widening {
    Widening { confidence, factor }
}

/// High-uncertainty rows first, then moderate; anything else is high confidence.
pub const UNCERTAINTY_RULES: Cascade<Option<Widening>> = Cascade {
    rules: &[
        Rule {
            id: "severe_behavioral_concerns",
            when: Condition::All(&[
                Condition::Flag(flags::BEHAVIORAL_CONCERNS),
                Condition::BehaviorsAtLeast(3),
            ]),
            then: Some(widening(Confidence::Low, |facts| {
                format!(
                    "Significant behavioral needs ({} behaviors) require intensive support",
                    facts.context.behavior_count()
                )
            })),
        },
        Rule {
            id: "high_acuity_memory_care",
            when: Condition::CareTypeIs(CareType::MemoryCareHighAcuity),
            then: Some(widening(Confidence::Low, |_| {
                "High-acuity memory care has wide market variation".to_string()
            })),
        },
        Rule {
            id: "two_person_transfer_with_extensive_adls",
            when: Condition::All(&[
                Condition::Flag(flags::TRANSFER_ASSISTANCE_2PERSON),
                Condition::AdlAtLeast(3),
            ]),
            then: Some(widening(Confidence::Low, |facts| {
                format!(
                    "2-person transfers with help on {} daily activities require specialized staffing",
                    facts.context.adl_count()
                )
            })),
        },
        Rule {
            id: "in_home_continuous_supervision",
            when: Condition::All(&[
                Condition::CareTypeIs(CareType::InHomeCare),
                Condition::Flag(flags::CONTINUOUS_SUPERVISION),
            ]),
            then: Some(widening(Confidence::Low, |_| {
                "24/7 in-home care has wide market variation".to_string()
            })),
        },
        Rule {
            id: "memory_care_with_behaviors",
            when: Condition::All(&[
                Condition::MemoryCareType,
                Condition::Flag(flags::BEHAVIORAL_CONCERNS),
            ]),
            then: Some(widening(Confidence::Medium, |_| {
                "Behavioral needs may vary and require flexible support".to_string()
            })),
        },
        Rule {
            id: "falls_with_mobility_dependence",
            when: Condition::All(&[
                Condition::Flag(flags::FALLS_MULTIPLE),
                Condition::Flag(flags::HIGH_MOBILITY_DEPENDENCE),
            ]),
            then: Some(widening(Confidence::Medium, |_| {
                "Fall risk with mobility dependence requires enhanced monitoring".to_string()
            })),
        },
        Rule {
            id: "chronic_instability",
            when: Condition::All(&[
                Condition::ChronicAtLeast(3),
                Condition::Flag(flags::FALLS_MULTIPLE),
            ]),
            then: Some(widening(Confidence::Medium, |facts| {
                format!(
                    "{} chronic conditions with repeated falls may require additional oversight",
                    facts.context.chronic_count()
                )
            })),
        },
    ],
    default: None,
};

const STABLE_NEEDS: &str = "Care needs are stable and predictable";

/// Confidence level and the reasons behind it. Only rows of the winning
/// level contribute reasons, and only rows that hold.
pub fn classify(context: &ClinicalContext, care_type: CareType) -> (Confidence, Vec<String>) {
    let facts = Facts::new(context, care_type);

    let Some(winner) = UNCERTAINTY_RULES.evaluate(&facts) else {
        return (Confidence::High, vec![STABLE_NEEDS.to_string()]);
    };

    let factors = UNCERTAINTY_RULES
        .matching(&facts)
        .filter_map(|rule| rule.then)
        .filter(|widening| widening.confidence == winner.confidence)
        .map(|widening| (widening.factor)(&facts))
        .collect();

    (winner.confidence, factors)
}

/// Low/likely/high range around `total`. Values are rounded to cents here and nowhere earlier.
pub fn calculate_range(total: f64, context: &ClinicalContext, care_type: CareType) -> CostRange {
    let (confidence, widening_factors) = classify(context, care_type);
    let pct = confidence.range_pct();

    CostRange {
        low: round_cents(total * (1.0 - pct)),
        likely: round_cents(total),
        high: round_cents(total * (1.0 + pct)),
        confidence,
        range_pct: pct,
        explanation: range_explanation(confidence, &widening_factors),
        widening_factors,
    }
}

/// Range for settings that cost nothing.
pub fn zero_range(explanation: &str) -> CostRange {
    CostRange {
        low: 0.0,
        likely: 0.0,
        high: 0.0,
        confidence: Confidence::High,
        range_pct: Confidence::High.range_pct(),
        explanation: explanation.to_string(),
        widening_factors: Vec::new(),
    }
}

pub fn range_explanation(confidence: Confidence, factors: &[String]) -> String {
    match confidence {
        Confidence::High => "Cost range is narrow (±7%) because care needs are stable and predictable. \
             Most communities will fall within this range."
            .to_string(),
        Confidence::Medium => format!(
            "Cost range is moderate (±12%) because {}. \
             Different communities may price these needs differently.",
            factors.join(" and ").to_lowercase()
        ),
        Confidence::Low => format!(
            "Cost range is wide (±20%) because {}. \
             Significant market variation exists for these complex care needs.",
            factors.join("; ").to_lowercase()
        ),
    }
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
