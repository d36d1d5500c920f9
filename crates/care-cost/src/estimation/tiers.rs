//! Tier tables for assisted living and memory care.
//!
//! Each table is a highest-tier-first cascade. Assisted-living tier 4 is the
//! only counting rule (two of five conditions); every other row is an any-of.

use tracing::debug;

use super::context::{flags, ClinicalContext};
use super::domain::{CareType, Tier};
use super::rules::{Cascade, Condition, Facts, Rule};

pub const ASSISTED_LIVING_TIERS: Cascade<Tier> = Cascade {
    rules: &[
        Rule {
            id: "al_tier_4_multiple_high_intensity_needs",
            when: Condition::AtLeast {
                count: 2,
                of: &[
                    Condition::Flag(flags::SEVERE_COGNITIVE_RISK),
                    Condition::Flag(flags::HIGH_MOBILITY_DEPENDENCE),
                    Condition::Flag(flags::BEHAVIORAL_CONCERNS),
                    Condition::AdlAtLeast(3),
                    Condition::Flag(flags::CONTINUOUS_SUPERVISION),
                ],
            },
            then: Tier::FOUR,
        },
        Rule {
            id: "al_tier_3_memory_behavior_or_extensive_adls",
            when: Condition::Any(&[
                Condition::Flag(flags::SEVERE_COGNITIVE_RISK),
                Condition::All(&[
                    Condition::Flag(flags::MODERATE_COGNITIVE_DECLINE),
                    Condition::AdlAtLeast(2),
                ]),
                Condition::Flag(flags::BEHAVIORAL_CONCERNS),
                Condition::AdlAtLeast(3),
                Condition::Flag(flags::HIGH_DEPENDENCE),
            ]),
            then: Tier::THREE,
        },
        Rule {
            id: "al_tier_2_mobility_or_moderate_adls",
            when: Condition::Any(&[
                Condition::Flag(flags::HIGH_MOBILITY_DEPENDENCE),
                Condition::Flag(flags::TRANSFER_ASSISTANCE_1PERSON),
                Condition::AdlAtLeast(2),
                Condition::Flag(flags::INCONTINENCE_MANAGEMENT),
                Condition::Flag(flags::FALLS_MULTIPLE),
            ]),
            then: Tier::TWO,
        },
        Rule {
            id: "al_tier_1_medication_or_mild_adls",
            when: Condition::Any(&[
                Condition::MedsNeedManagement,
                Condition::AdlExactly(1),
                Condition::IadlAtLeast(4),
                Condition::Flag(flags::MILD_COGNITIVE_DECLINE),
            ]),
            then: Tier::ONE,
        },
    ],
    default: Tier::ZERO,
};

pub const MEMORY_CARE_TIERS: Cascade<Tier> = Cascade {
    rules: &[
        Rule {
            id: "mc_tier_4_severe_behaviors_or_hands_on_care",
            when: Condition::Any(&[
                Condition::All(&[
                    Condition::Flag(flags::BEHAVIORAL_CONCERNS),
                    Condition::BehaviorsAtLeast(3),
                ]),
                Condition::All(&[
                    Condition::Flag(flags::CONTINUOUS_SUPERVISION),
                    Condition::Flag(flags::HIGH_DEPENDENCE),
                ]),
                Condition::AdlAtLeast(4),
                Condition::Flag(flags::TRANSFER_LIFT_REQUIRED),
            ]),
            then: Tier::FOUR,
        },
        Rule {
            id: "mc_tier_3_behaviors_or_complex_adls",
            when: Condition::Any(&[
                Condition::Flag(flags::BEHAVIORAL_CONCERNS),
                Condition::AdlAtLeast(3),
                Condition::Flag(flags::TRANSFER_ASSISTANCE_2PERSON),
                Condition::Flag(flags::HIGH_DEPENDENCE),
            ]),
            then: Tier::THREE,
        },
        Rule {
            id: "mc_tier_2_moderate_adls_or_mobility",
            when: Condition::Any(&[
                Condition::AdlAtLeast(2),
                Condition::Flag(flags::HIGH_MOBILITY_DEPENDENCE),
                Condition::Flag(flags::INCONTINENCE_MANAGEMENT),
            ]),
            then: Tier::TWO,
        },
        Rule {
            id: "mc_tier_1_mild_adls_or_mobility",
            when: Condition::Any(&[
                Condition::AdlExactly(1),
                Condition::Flag(flags::TRANSFER_ASSISTANCE_1PERSON),
                Condition::Flag(flags::MODERATE_MOBILITY),
            ]),
            then: Tier::ONE,
        },
    ],
    default: Tier::ZERO,
};

pub fn assisted_living_tier(context: &ClinicalContext) -> Tier {
    evaluate(&ASSISTED_LIVING_TIERS, context, CareType::AssistedLiving)
}

pub fn memory_care_tier(context: &ClinicalContext) -> Tier {
    evaluate(&MEMORY_CARE_TIERS, context, CareType::MemoryCare)
}

/// Tier for a care type. High-acuity memory care reuses the memory-care
/// table; settings without a tier table sit at tier 0.
pub fn assign_tier(care_type: CareType, context: &ClinicalContext) -> Tier {
    match care_type {
        CareType::AssistedLiving => assisted_living_tier(context),
        CareType::MemoryCare | CareType::MemoryCareHighAcuity => memory_care_tier(context),
        CareType::InHomeCare | CareType::NoCareNeeded => Tier::ZERO,
    }
}

fn evaluate(table: &Cascade<Tier>, context: &ClinicalContext, care_type: CareType) -> Tier {
    let facts = Facts::new(context, care_type);
    match table.first_match(&facts) {
        Some(rule) => {
            debug!(care_type = %care_type, rule = rule.id, tier = rule.then.value(), "tier rule matched");
            rule.then
        }
        None => table.default,
    }
}
