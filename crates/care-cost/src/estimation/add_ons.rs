use tracing::debug;

use super::context::{flags, ClinicalContext};
use super::domain::{AddOn, AddOnKind, CareType};
use super::rules::{Cascade, Condition, Facts, Rule};

/// Absolute ceiling on the combined add-ons.
pub const MAX_ADDON_ABSOLUTE: f64 = 800.0;
/// Combined add-ons never exceed this share of the regional base.
pub const MAX_ADDON_PCT: f64 = 0.15;

/// Paths that make chronic conditions a cost driver.
pub const CHRONIC_COMPLEXITY: Cascade<bool> = Cascade {
    rules: &[
        Rule {
            id: "multiple_conditions_with_medication_complexity",
            when: Condition::All(&[Condition::ChronicAtLeast(3), Condition::MedsNeedManagement]),
            then: true,
        },
        Rule {
            id: "conditions_with_repeated_falls",
            when: Condition::All(&[
                Condition::ChronicAtLeast(2),
                Condition::Flag(flags::FALLS_MULTIPLE),
            ]),
            then: true,
        },
        Rule {
            id: "high_impact_condition_affecting_function",
            when: Condition::All(&[Condition::HighImpactAtLeast(1), Condition::AdlAtLeast(1)]),
            then: true,
        },
        Rule {
            id: "multiple_high_impact_conditions",
            when: Condition::HighImpactAtLeast(2),
            then: true,
        },
    ],
    default: false,
};

const INCONTINENCE_NOT_IN_TIER: Condition = Condition::All(&[
    Condition::Flag(flags::INCONTINENCE_MANAGEMENT),
    Condition::Not(&Condition::AdlAtLeast(2)),
]);

/// Add-on definition: gate, fraction of the shared cap, and its own dollar ceiling.
struct AddOnSpec {
    kind: AddOnKind,
    label: &'static str,
    description: &'static str,
    share_of_cap: f64,
    ceiling: f64,
}

const FALL_MONITORING: AddOnSpec = AddOnSpec {
    kind: AddOnKind::FallPreventionMonitoring,
    label: "Fall Prevention Monitoring",
    description: "Enhanced monitoring and prevention protocols",
    share_of_cap: 0.50,
    ceiling: 400.0,
};

const CHRONIC_MANAGEMENT: AddOnSpec = AddOnSpec {
    kind: AddOnKind::ChronicConditionManagement,
    label: "Chronic Condition Management",
    description: "Coordination and monitoring for complex chronic conditions",
    share_of_cap: 0.375,
    ceiling: 300.0,
};

const INCONTINENCE_CARE: AddOnSpec = AddOnSpec {
    kind: AddOnKind::IncontinenceCare,
    label: "Incontinence Care",
    description: "Regular assistance and supplies",
    share_of_cap: 0.3125,
    ceiling: 250.0,
};

impl AddOnSpec {
    fn build(&self, cap: f64, reason: String) -> AddOn {
        AddOn {
            kind: self.kind,
            label: self.label.to_string(),
            amount: self.ceiling.min(cap * self.share_of_cap),
            description: self.description.to_string(),
            reason,
            capped: false,
        }
    }
}

/// Qualifying add-ons after the total cap has been enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOnSet {
    pub add_ons: Vec<AddOn>,
    pub cap: f64,
}

/// `min(800, regional_base x 0.15)`.
pub fn add_on_cap(regional_base: f64) -> f64 {
    MAX_ADDON_ABSOLUTE.min(regional_base * MAX_ADDON_PCT)
}

pub fn chronic_add_on_applies(context: &ClinicalContext) -> bool {
    if context.chronic_count() == 0 {
        return false;
    }
    CHRONIC_COMPLEXITY.evaluate(&Facts::new(context, CareType::AssistedLiving))
}

/// Compute the capped add-ons for a facility placement.
pub fn calculate_add_ons(context: &ClinicalContext, regional_base: f64) -> AddOnSet {
    let cap = add_on_cap(regional_base);
    let facts = Facts::new(context, CareType::AssistedLiving);
    let mut add_ons = Vec::new();

    if context.has_flag(flags::FALLS_MULTIPLE) {
        add_ons.push(FALL_MONITORING.build(cap, "Multiple falls in past 6 months".to_string()));
    }

    if chronic_add_on_applies(context) {
        add_ons.push(CHRONIC_MANAGEMENT.build(cap, explain_chronic_add_on(context)));
    }

    if INCONTINENCE_NOT_IN_TIER.holds(&facts) {
        add_ons.push(
            INCONTINENCE_CARE.build(cap, "Requires incontinence management support".to_string()),
        );
    }

    AddOnSet {
        add_ons: apply_cap(add_ons, cap),
        cap,
    }
}

/// Scale every add-on by `cap / sum` when the sum exceeds the cap, so the
/// result sums to the cap and no single add-on is truncated on its own.
pub fn apply_cap(mut add_ons: Vec<AddOn>, cap: f64) -> Vec<AddOn> {
    let total: f64 = add_ons.iter().map(|add_on| add_on.amount).sum();
    if total <= cap || total <= 0.0 {
        return add_ons;
    }

    let scale = cap / total;
    debug!(total, cap, scale, "scaling add-ons down to cap");
    for add_on in &mut add_ons {
        add_on.amount *= scale;
        add_on.capped = true;
    }

    let scaled: f64 = add_ons.iter().map(|add_on| add_on.amount).sum();
    let drift = scaled - cap;
    if drift > 0.0 {
        if let Some(last) = add_ons.last_mut() {
            last.amount -= drift;
        }
    }

    add_ons
}

/// Rationale for whether chronic conditions raise the estimate.
pub fn explain_chronic_add_on(context: &ClinicalContext) -> String {
    let count = context.chronic_count();
    if count == 0 {
        return "No chronic conditions reported.".to_string();
    }

    if !chronic_add_on_applies(context) {
        return format!(
            "{count} chronic condition(s) present but stable and not requiring additional care coordination at this time."
        );
    }

    let facts = Facts::new(context, CareType::AssistedLiving);
    let reasons: Vec<String> = CHRONIC_COMPLEXITY
        .matching(&facts)
        .map(|rule| match rule.id {
            "multiple_conditions_with_medication_complexity" => {
                "multiple conditions requiring complex medication management".to_string()
            }
            "conditions_with_repeated_falls" => {
                "chronic instability contributing to fall risk".to_string()
            }
            "high_impact_condition_affecting_function" => {
                let names: Vec<String> = context
                    .high_impact_conditions()
                    .map(title_case)
                    .collect();
                format!("{} affecting daily function", names.join(", "))
            }
            _ => "multiple high-impact conditions".to_string(),
        })
        .collect();

    format!(
        "{count} chronic condition(s) increasing care needs due to: {}.",
        reasons.join("; ")
    )
}

fn title_case(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
