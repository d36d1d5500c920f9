use super::common::*;

use crate::estimation::context::{flags, MedsComplexity, NormalizedAnswers};
use crate::estimation::domain::{CareType, Tier};
use crate::estimation::tiers::{assign_tier, assisted_living_tier, memory_care_tier};

fn al(flag_list: &[&str], adl_count: u32) -> Tier {
    assisted_living_tier(&context(flag_list, adl_count))
}

fn mc(flag_list: &[&str], adl_count: u32) -> Tier {
    memory_care_tier(&context(flag_list, adl_count))
}

#[test]
fn empty_context_is_tier_zero_in_both_tables() {
    assert_eq!(al(&[], 0), Tier::ZERO);
    assert_eq!(mc(&[], 0), Tier::ZERO);
}

// Assisted living, tier 4: two of five.

#[test]
fn al_tier_four_severe_cognitive_risk_and_mobility_dependence() {
    assert_eq!(
        al(&[flags::SEVERE_COGNITIVE_RISK, flags::HIGH_MOBILITY_DEPENDENCE], 0),
        Tier::FOUR
    );
}

#[test]
fn al_tier_four_behaviors_and_three_adls() {
    assert_eq!(al(&[flags::BEHAVIORAL_CONCERNS], 3), Tier::FOUR);
}

#[test]
fn al_tier_four_supervision_and_severe_cognitive_risk() {
    assert_eq!(
        al(&[flags::CONTINUOUS_SUPERVISION, flags::SEVERE_COGNITIVE_RISK], 0),
        Tier::FOUR
    );
}

#[test]
fn al_tier_four_supervision_and_mobility_dependence() {
    assert_eq!(
        al(&[flags::CONTINUOUS_SUPERVISION, flags::HIGH_MOBILITY_DEPENDENCE], 0),
        Tier::FOUR
    );
}

#[test]
fn al_tier_four_needs_two_conditions() {
    assert_ne!(al(&[flags::SEVERE_COGNITIVE_RISK], 0), Tier::FOUR);
    assert_ne!(al(&[flags::HIGH_MOBILITY_DEPENDENCE], 0), Tier::FOUR);
    assert_ne!(al(&[flags::BEHAVIORAL_CONCERNS], 0), Tier::FOUR);
    assert_ne!(al(&[], 3), Tier::FOUR);
    assert_eq!(al(&[flags::CONTINUOUS_SUPERVISION], 0), Tier::ZERO);
}

// Assisted living, tier 3.

#[test]
fn al_tier_three_severe_cognitive_risk() {
    assert_eq!(al(&[flags::SEVERE_COGNITIVE_RISK], 0), Tier::THREE);
}

#[test]
fn al_tier_three_moderate_decline_with_two_adls() {
    assert_eq!(al(&[flags::MODERATE_COGNITIVE_DECLINE], 2), Tier::THREE);
    assert_eq!(al(&[flags::MODERATE_COGNITIVE_DECLINE], 0), Tier::ZERO);
}

#[test]
fn al_tier_three_behavioral_concerns() {
    assert_eq!(al(&[flags::BEHAVIORAL_CONCERNS], 0), Tier::THREE);
}

#[test]
fn al_tier_three_three_adls() {
    assert_eq!(al(&[], 3), Tier::THREE);
}

#[test]
fn al_tier_three_high_dependence() {
    assert_eq!(al(&[flags::HIGH_DEPENDENCE], 0), Tier::THREE);
}

// Assisted living, tier 2.

#[test]
fn al_tier_two_high_mobility_dependence() {
    assert_eq!(al(&[flags::HIGH_MOBILITY_DEPENDENCE], 0), Tier::TWO);
}

#[test]
fn al_tier_two_one_person_transfer() {
    assert_eq!(al(&[flags::TRANSFER_ASSISTANCE_1PERSON], 0), Tier::TWO);
}

#[test]
fn al_tier_two_two_adls() {
    assert_eq!(al(&[], 2), Tier::TWO);
}

#[test]
fn al_tier_two_incontinence_management() {
    assert_eq!(al(&[flags::INCONTINENCE_MANAGEMENT], 0), Tier::TWO);
}

#[test]
fn al_tier_two_multiple_falls() {
    assert_eq!(al(&[flags::FALLS_MULTIPLE], 0), Tier::TWO);
}

// Assisted living, tier 1.

#[test]
fn al_tier_one_medication_management() {
    for (meds, expected) in [
        (MedsComplexity::Moderate, Tier::ONE),
        (MedsComplexity::Complex, Tier::ONE),
        (MedsComplexity::Simple, Tier::ZERO),
        (MedsComplexity::None, Tier::ZERO),
    ] {
        let ctx = context_with(
            &[],
            NormalizedAnswers {
                meds_complexity: Some(meds),
                ..NormalizedAnswers::default()
            },
        );
        assert_eq!(assisted_living_tier(&ctx), expected, "{meds:?}");
    }
}

#[test]
fn al_tier_one_exactly_one_adl() {
    assert_eq!(al(&[], 1), Tier::ONE);
}

#[test]
fn al_tier_one_four_iadls() {
    let ctx = context_with(
        &[],
        NormalizedAnswers {
            iadls_count: 4,
            ..NormalizedAnswers::default()
        },
    );
    assert_eq!(assisted_living_tier(&ctx), Tier::ONE);

    let ctx = context_with(
        &[],
        NormalizedAnswers {
            iadls_count: 3,
            ..NormalizedAnswers::default()
        },
    );
    assert_eq!(assisted_living_tier(&ctx), Tier::ZERO);
}

#[test]
fn al_tier_one_mild_cognitive_decline() {
    assert_eq!(al(&[flags::MILD_COGNITIVE_DECLINE], 0), Tier::ONE);
}

// Memory care, tier 4.

#[test]
fn mc_tier_four_behavioral_concerns_with_three_behaviors() {
    let ctx = context_with(
        &[flags::BEHAVIORAL_CONCERNS],
        NormalizedAnswers {
            behaviors_count: 3,
            ..NormalizedAnswers::default()
        },
    );
    assert_eq!(memory_care_tier(&ctx), Tier::FOUR);
}

#[test]
fn mc_tier_four_supervision_with_high_dependence() {
    assert_eq!(
        mc(&[flags::CONTINUOUS_SUPERVISION, flags::HIGH_DEPENDENCE], 0),
        Tier::FOUR
    );
}

#[test]
fn mc_tier_four_four_adls() {
    assert_eq!(mc(&[], 4), Tier::FOUR);
}

#[test]
fn mc_tier_four_mechanical_lift() {
    assert_eq!(mc(&[flags::TRANSFER_LIFT_REQUIRED], 0), Tier::FOUR);
}

// Memory care, tier 3.

#[test]
fn mc_tier_three_behavioral_concerns() {
    assert_eq!(mc(&[flags::BEHAVIORAL_CONCERNS], 0), Tier::THREE);
}

#[test]
fn mc_tier_three_three_adls() {
    assert_eq!(mc(&[], 3), Tier::THREE);
}

#[test]
fn mc_tier_three_two_person_transfer() {
    assert_eq!(mc(&[flags::TRANSFER_ASSISTANCE_2PERSON], 0), Tier::THREE);
}

#[test]
fn mc_tier_three_high_dependence() {
    assert_eq!(mc(&[flags::HIGH_DEPENDENCE], 0), Tier::THREE);
}

// Memory care, tier 2.

#[test]
fn mc_tier_two_two_adls() {
    assert_eq!(mc(&[], 2), Tier::TWO);
}

#[test]
fn mc_tier_two_high_mobility_dependence() {
    assert_eq!(mc(&[flags::HIGH_MOBILITY_DEPENDENCE], 0), Tier::TWO);
}

#[test]
fn mc_tier_two_incontinence_management() {
    assert_eq!(mc(&[flags::INCONTINENCE_MANAGEMENT], 0), Tier::TWO);
}

// Memory care, tier 1.

#[test]
fn mc_tier_one_exactly_one_adl() {
    assert_eq!(mc(&[], 1), Tier::ONE);
}

#[test]
fn mc_tier_one_one_person_transfer() {
    assert_eq!(mc(&[flags::TRANSFER_ASSISTANCE_1PERSON], 0), Tier::ONE);
}

#[test]
fn mc_tier_one_moderate_mobility() {
    assert_eq!(mc(&[flags::MODERATE_MOBILITY], 0), Tier::ONE);
}

#[test]
fn settings_without_tier_tables_sit_at_zero() {
    let ctx = context(&[flags::TRANSFER_LIFT_REQUIRED, flags::BEHAVIORAL_CONCERNS], 5);

    assert_eq!(assign_tier(CareType::InHomeCare, &ctx), Tier::ZERO);
    assert_eq!(assign_tier(CareType::NoCareNeeded, &ctx), Tier::ZERO);
    assert_eq!(assign_tier(CareType::MemoryCareHighAcuity, &ctx), Tier::FOUR);
}

#[test]
fn tier_assignment_is_repeatable() {
    let ctx = context(&[flags::FALLS_MULTIPLE, flags::MILD_COGNITIVE_DECLINE], 1);

    let first = assisted_living_tier(&ctx);
    for _ in 0..10 {
        assert_eq!(assisted_living_tier(&ctx), first);
    }
}
