use std::fmt;

use serde::{Deserialize, Serialize};

use super::escalation::EscalationStep;

/// Care settings the engine knows how to price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareType {
    AssistedLiving,
    MemoryCare,
    MemoryCareHighAcuity,
    InHomeCare,
    NoCareNeeded,
}

impl CareType {
    pub const fn key(self) -> &'static str {
        match self {
            CareType::AssistedLiving => "assisted_living",
            CareType::MemoryCare => "memory_care",
            CareType::MemoryCareHighAcuity => "memory_care_high_acuity",
            CareType::InHomeCare => "in_home_care",
            CareType::NoCareNeeded => "no_care_needed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CareType::AssistedLiving => "Assisted Living",
            CareType::MemoryCare => "Memory Care",
            CareType::MemoryCareHighAcuity => "High-Acuity Memory Care",
            CareType::InHomeCare => "In-Home Care",
            CareType::NoCareNeeded => "No Care Needed",
        }
    }

    /// Lenient parse of an upstream classification string.
    pub fn from_key(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "assisted_living" | "al" => Some(CareType::AssistedLiving),
            "memory_care" | "mc" => Some(CareType::MemoryCare),
            "memory_care_high_acuity" | "mc_high_acuity" | "high_acuity_memory_care" => {
                Some(CareType::MemoryCareHighAcuity)
            }
            "in_home_care" | "in_home" | "home_care" => Some(CareType::InHomeCare),
            "no_care_needed" | "no_care" | "none" | "independent" => Some(CareType::NoCareNeeded),
            _ => None,
        }
    }

    /// Position on the facility escalation ladder; `None` for settings that never escalate.
    pub const fn acuity_rank(self) -> Option<u8> {
        match self {
            CareType::AssistedLiving => Some(0),
            CareType::MemoryCare => Some(1),
            CareType::MemoryCareHighAcuity => Some(2),
            CareType::InHomeCare | CareType::NoCareNeeded => None,
        }
    }

    pub const fn is_memory_care(self) -> bool {
        matches!(self, CareType::MemoryCare | CareType::MemoryCareHighAcuity)
    }

    /// Whether the tier increment is shown as its own line item.
    pub const fn has_tier_pricing(self) -> bool {
        matches!(self, CareType::AssistedLiving | CareType::MemoryCare)
    }
}

impl fmt::Display for CareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Severity level 0-4 scoped to a care type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    pub const ZERO: Tier = Tier(0);
    pub const ONE: Tier = Tier(1);
    pub const TWO: Tier = Tier(2);
    pub const THREE: Tier = Tier(3);
    pub const FOUR: Tier = Tier(4);
    pub const MAX: u8 = 4;

    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Tier(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub fn key(self) -> String {
        format!("tier_{}", self.0)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tier {0} is outside the supported range 0-4")]
pub struct TierOutOfRange(pub u8);

impl TryFrom<u8> for Tier {
    type Error = TierOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::new(value).ok_or(TierOutOfRange(value))
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

/// Coarse uncertainty classification driving the range width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Half-width of the cost range as a fraction of the likely cost.
    pub const fn range_pct(self) -> f64 {
        match self {
            Confidence::High => 0.07,
            Confidence::Medium => 0.12,
            Confidence::Low => 0.20,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOnKind {
    FallPreventionMonitoring,
    ChronicConditionManagement,
    IncontinenceCare,
}

/// Capped secondary adjustment for a need the tier does not already price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOn {
    pub kind: AddOnKind,
    pub label: String,
    pub amount: f64,
    pub description: String,
    pub reason: String,
    pub capped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    NationalBase,
    RegionalAdjustment,
    CareTier,
    AddOn,
}

/// Display row of the breakdown; the rows always sum to the breakdown total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub kind: LineItemKind,
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub base_cost: f64,
    pub regional_base: f64,
    pub tier_increment: f64,
    pub add_ons: Vec<AddOn>,
    pub add_on_cap: f64,
    pub total: f64,
    pub line_items: Vec<LineItem>,
}

impl CostBreakdown {
    pub fn add_on_total(&self) -> f64 {
        self.add_ons.iter().map(|add_on| add_on.amount).sum()
    }

    pub fn zero() -> Self {
        Self {
            base_cost: 0.0,
            regional_base: 0.0,
            tier_increment: 0.0,
            add_ons: Vec::new(),
            add_on_cap: 0.0,
            total: 0.0,
            line_items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    pub low: f64,
    pub likely: f64,
    pub high: f64,
    pub confidence: Confidence,
    pub range_pct: f64,
    pub explanation: String,
    pub widening_factors: Vec<String>,
}

/// Externally visible result of one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareCostEstimate {
    pub care_type: CareType,
    pub recommended_care_type: CareType,
    pub tier: Tier,
    pub tier_label: String,
    pub tier_description: String,
    pub breakdown: CostBreakdown,
    pub range: CostRange,
    pub explanation: String,
    pub recommendations: Vec<String>,
    pub escalation_path: Vec<EscalationStep>,
    /// Daily caregiver hours; only set for in-home care.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_day: Option<f64>,
    pub regional_multiplier: f64,
    pub model_version: String,
    pub calculation_method: String,
}

impl CareCostEstimate {
    pub fn escalated(&self) -> bool {
        !self.escalation_path.is_empty()
    }
}
