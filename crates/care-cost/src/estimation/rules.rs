//! Table-driven predicates and the first-match cascade used by tiers,
//! escalation, and confidence classification.

use super::context::{ClinicalContext, IncontinenceLevel, SafeAlone};
use super::domain::CareType;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct Facts<'a> {
    pub context: &'a ClinicalContext,
    pub care_type: CareType,
}

impl<'a> Facts<'a> {
    pub fn new(context: &'a ClinicalContext, care_type: CareType) -> Self {
        Self { context, care_type }
    }
}

/// Boolean test over [`Facts`]. Combinators nest, so a k-of-n rule and an
/// any-of rule look the same to the cascade.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    Flag(&'static str),
    AdlAtLeast(u32),
    AdlExactly(u32),
    IadlAtLeast(u32),
    BehaviorsAtLeast(u32),
    ChronicAtLeast(u32),
    HighImpactAtLeast(u32),
    MedsNeedManagement,
    IncontinenceComplete,
    NotSafeAlone,
    CareTypeIs(CareType),
    MemoryCareType,
    Not(&'static Condition),
    All(&'static [Condition]),
    Any(&'static [Condition]),
    AtLeast {
        count: usize,
        of: &'static [Condition],
    },
}

impl Condition {
    pub fn holds(&self, facts: &Facts<'_>) -> bool {
        let context = facts.context;
        match *self {
            Condition::Flag(flag) => context.has_flag(flag),
            Condition::AdlAtLeast(min) => context.adl_count() >= min,
            Condition::AdlExactly(count) => context.adl_count() == count,
            Condition::IadlAtLeast(min) => context.iadl_count() >= min,
            Condition::BehaviorsAtLeast(min) => context.behavior_count() >= min,
            Condition::ChronicAtLeast(min) => context.chronic_count() >= min,
            Condition::HighImpactAtLeast(min) => context.high_impact_count() >= min,
            Condition::MedsNeedManagement => context
                .answers()
                .meds_complexity
                .map(|meds| meds.needs_management())
                .unwrap_or(false),
            Condition::IncontinenceComplete => {
                context.answers().incontinence == Some(IncontinenceLevel::Complete)
            }
            Condition::NotSafeAlone => context.answers().safe_alone == Some(SafeAlone::No),
            Condition::CareTypeIs(care_type) => facts.care_type == care_type,
            Condition::MemoryCareType => facts.care_type.is_memory_care(),
            Condition::Not(condition) => !condition.holds(facts),
            Condition::All(conditions) => conditions.iter().all(|c| c.holds(facts)),
            Condition::Any(conditions) => conditions.iter().any(|c| c.holds(facts)),
            Condition::AtLeast { count, of } => {
                of.iter().filter(|c| c.holds(facts)).count() >= count
            }
        }
    }
}

/// One row of a decision table.
#[derive(Debug, Clone, Copy)]
pub struct Rule<T: 'static> {
    pub id: &'static str,
    pub when: Condition,
    pub then: T,
}

/// Ordered rule table evaluated highest priority first.
#[derive(Debug, Clone, Copy)]
pub struct Cascade<T: 'static> {
    pub rules: &'static [Rule<T>],
    pub default: T,
}

impl<T: Copy + 'static> Cascade<T> {
    /// First matching rule, if any.
    pub fn first_match(&self, facts: &Facts<'_>) -> Option<&'static Rule<T>> {
        self.rules.iter().find(|rule| rule.when.holds(facts))
    }

    pub fn evaluate(&self, facts: &Facts<'_>) -> T {
        self.first_match(facts)
            .map(|rule| rule.then)
            .unwrap_or(self.default)
    }

    /// Every rule that holds, in table order.
    pub fn matching<'f>(
        &self,
        facts: &'f Facts<'f>,
    ) -> impl Iterator<Item = &'static Rule<T>> + 'f {
        self.rules.iter().filter(move |rule| rule.when.holds(facts))
    }
}
