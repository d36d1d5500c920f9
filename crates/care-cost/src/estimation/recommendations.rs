use super::domain::{CareType, Tier};

/// Next steps for the family, keyed on the final placement.
pub fn for_placement(care_type: CareType, tier: Tier) -> Vec<String> {
    let mut steps: Vec<&str> = match care_type {
        CareType::AssistedLiving => vec![
            "Tour assisted living communities and ask how they price each level of care",
            "Confirm which services are bundled into the base rate",
        ],
        CareType::MemoryCare => vec![
            "Focus on communities with secured memory care neighborhoods",
            "Ask about dementia-specific staff training and staffing ratios",
        ],
        CareType::MemoryCareHighAcuity => vec![
            "Look for memory care communities with 24/7 licensed nursing on site",
            "Ask whether mechanical lifts and two-person transfers are supported",
            "Discuss a care plan review before move-in to confirm pricing",
        ],
        CareType::InHomeCare => vec![
            "Interview home care agencies and compare hourly rates and minimum shifts",
            "Reassess hours monthly as needs change",
        ],
        CareType::NoCareNeeded => vec![
            "Revisit the assessment if health or daily needs change",
            "Explore community programs that support independent living",
        ],
    };

    if care_type.has_tier_pricing() && tier >= Tier::THREE {
        steps.push("Request a written care level assessment from each community before committing");
    }

    steps.into_iter().map(str::to_string).collect()
}
