use serde::{Deserialize, Serialize};
use tracing::debug;

use super::context::{flags, ClinicalContext};
use super::domain::{CareType, Tier};
use super::rules::{Cascade, Condition, Facts, Rule};
use super::tiers::{assisted_living_tier, memory_care_tier};

/// Assisted-living overflow into memory care.
pub const MEMORY_CARE_OVERFLOW: Cascade<bool> = Cascade {
    rules: &[
        Rule {
            id: "diagnosed_memory_condition_with_complexity",
            when: Condition::All(&[
                Condition::Flag(flags::MEMORY_CARE_DX),
                Condition::Any(&[
                    Condition::AdlAtLeast(2),
                    Condition::Flag(flags::BEHAVIORAL_CONCERNS),
                    Condition::Flag(flags::CONTINUOUS_SUPERVISION),
                ]),
            ]),
            then: true,
        },
        Rule {
            id: "severe_cognitive_risk_with_safety_concerns",
            when: Condition::All(&[
                Condition::Flag(flags::SEVERE_COGNITIVE_RISK),
                Condition::Any(&[
                    Condition::Flag(flags::BEHAVIORAL_CONCERNS),
                    Condition::Flag(flags::CONTINUOUS_SUPERVISION),
                    Condition::NotSafeAlone,
                ]),
            ]),
            then: true,
        },
        Rule {
            id: "multiple_behaviors",
            when: Condition::BehaviorsAtLeast(3),
            then: true,
        },
    ],
    default: false,
};

/// Skilled-nursing indicators that, together with memory-care tier 4, call for high acuity.
pub const HIGH_ACUITY_TRIGGERS: Cascade<bool> = Cascade {
    rules: &[
        Rule {
            id: "mechanical_lift_required",
            when: Condition::Flag(flags::TRANSFER_LIFT_REQUIRED),
            then: true,
        },
        Rule {
            id: "complete_incontinence",
            when: Condition::IncontinenceComplete,
            then: true,
        },
        Rule {
            id: "supervision_with_behaviors",
            when: Condition::All(&[
                Condition::Flag(flags::CONTINUOUS_SUPERVISION),
                Condition::BehaviorsAtLeast(2),
            ]),
            then: true,
        },
    ],
    default: false,
};

/// Audit record of one escalation hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationStep {
    pub from: CareType,
    pub to: CareType,
    pub rule: String,
}

/// Final care setting and tier after escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub care_type: CareType,
    pub tier: Tier,
    pub steps: Vec<EscalationStep>,
}

/// Resolve the care setting for an incoming classification. Runs once per
/// estimate and only moves up the ladder.
pub fn resolve(context: &ClinicalContext, incoming: CareType) -> Placement {
    let mut steps = Vec::new();
    let mut care_type = incoming;

    if care_type == CareType::AssistedLiving {
        let facts = Facts::new(context, care_type);
        match MEMORY_CARE_OVERFLOW.first_match(&facts) {
            Some(rule) => {
                debug!(rule = rule.id, "assisted living overflows into memory care");
                steps.push(EscalationStep {
                    from: CareType::AssistedLiving,
                    to: CareType::MemoryCare,
                    rule: rule.id.to_string(),
                });
                care_type = CareType::MemoryCare;
            }
            None => {
                return Placement {
                    care_type,
                    tier: assisted_living_tier(context),
                    steps,
                };
            }
        }
    }

    match care_type {
        CareType::MemoryCare => {
            let tier = memory_care_tier(context);
            if tier == Tier::FOUR {
                let facts = Facts::new(context, care_type);
                if let Some(rule) = HIGH_ACUITY_TRIGGERS.first_match(&facts) {
                    debug!(rule = rule.id, "memory care escalates to high acuity");
                    steps.push(EscalationStep {
                        from: CareType::MemoryCare,
                        to: CareType::MemoryCareHighAcuity,
                        rule: rule.id.to_string(),
                    });
                    care_type = CareType::MemoryCareHighAcuity;
                }
            }
            Placement {
                care_type,
                tier,
                steps,
            }
        }
        CareType::MemoryCareHighAcuity => Placement {
            care_type,
            tier: memory_care_tier(context),
            steps,
        },
        CareType::AssistedLiving | CareType::InHomeCare | CareType::NoCareNeeded => Placement {
            care_type,
            tier: Tier::ZERO,
            steps,
        },
    }
}
