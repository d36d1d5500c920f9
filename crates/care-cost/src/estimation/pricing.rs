use std::sync::{Arc, OnceLock};

use serde::Serialize;

use super::domain::{AddOn, CareType, CostBreakdown, LineItem, LineItemKind, Tier};
use super::EstimationError;

/// Average days per month used to turn daily in-home hours into a monthly cost.
pub const DAYS_PER_MONTH: f64 = 30.4;

/// Citation for a national base cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSource {
    pub name: &'static str,
    pub url: Option<&'static str>,
    pub notes: &'static str,
    pub derived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseRate {
    Monthly(f64),
    Hourly(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseCostEntry {
    pub care_type: CareType,
    pub rate: BaseRate,
    pub source: CostSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierIncrement {
    pub tier: Tier,
    pub increment: f64,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierTable {
    pub care_type: CareType,
    pub tiers: Vec<TierIncrement>,
}

/// Process-wide pricing configuration. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostTables {
    base_costs: Vec<BaseCostEntry>,
    tier_tables: Vec<TierTable>,
}

static STANDARD_TABLES: OnceLock<Arc<CostTables>> = OnceLock::new();

impl CostTables {
    pub fn new(base_costs: Vec<BaseCostEntry>, tier_tables: Vec<TierTable>) -> Self {
        Self {
            base_costs,
            tier_tables,
        }
    }

    /// National 2024 cost tables shared by every engine in the process.
    pub fn standard() -> Arc<CostTables> {
        STANDARD_TABLES
            .get_or_init(|| Arc::new(CostTables::new(standard_base_costs(), standard_tier_tables())))
            .clone()
    }

    pub fn base_cost(&self, care_type: CareType) -> Result<&BaseCostEntry, EstimationError> {
        self.base_costs
            .iter()
            .find(|entry| entry.care_type == care_type)
            .ok_or(EstimationError::MissingBaseCost(care_type))
    }

    pub fn monthly_base(&self, care_type: CareType) -> Result<f64, EstimationError> {
        match self.base_cost(care_type)?.rate {
            BaseRate::Monthly(amount) => Ok(amount),
            BaseRate::Hourly(_) => Err(EstimationError::MissingBaseCost(care_type)),
        }
    }

    pub fn hourly_rate(&self, care_type: CareType) -> Result<f64, EstimationError> {
        match self.base_cost(care_type)?.rate {
            BaseRate::Hourly(amount) => Ok(amount),
            BaseRate::Monthly(_) => Err(EstimationError::MissingBaseCost(care_type)),
        }
    }

    pub fn tier_increment(
        &self,
        care_type: CareType,
        tier: Tier,
    ) -> Result<&TierIncrement, EstimationError> {
        self.tier_tables
            .iter()
            .find(|table| table.care_type == care_type)
            .and_then(|table| table.tiers.iter().find(|row| row.tier == tier))
            .ok_or(EstimationError::MissingTierIncrement { care_type, tier })
    }
}

fn standard_base_costs() -> Vec<BaseCostEntry> {
    vec![
        BaseCostEntry {
            care_type: CareType::AssistedLiving,
            rate: BaseRate::Monthly(5900.0),
            source: CostSource {
                name: "Genworth Cost of Care Survey 2024",
                url: Some("https://investor.genworth.com/news-events/press-releases/detail/982/"),
                notes: "National median for assisted living facility",
                derived: false,
            },
        },
        BaseCostEntry {
            care_type: CareType::MemoryCare,
            rate: BaseRate::Monthly(7400.0),
            source: CostSource {
                name: "Derived from Genworth 2024 assisted living median (1.254x premium)",
                url: None,
                notes: "Typical memory care premium over the assisted living baseline",
                derived: true,
            },
        },
        BaseCostEntry {
            care_type: CareType::MemoryCareHighAcuity,
            rate: BaseRate::Monthly(9400.0),
            source: CostSource {
                name: "Derived from memory care base plus high-acuity increment",
                url: None,
                notes: "High-acuity memory care with skilled nursing",
                derived: true,
            },
        },
        BaseCostEntry {
            care_type: CareType::InHomeCare,
            rate: BaseRate::Hourly(34.0),
            source: CostSource {
                name: "Genworth Cost of Care Survey 2024 - Home Health Aide",
                url: Some("https://investor.genworth.com/news-events/press-releases/detail/982/"),
                notes: "National median for home health aide",
                derived: false,
            },
        },
    ]
}

fn tier_row(tier: Tier, increment: f64, label: &'static str, description: &'static str) -> TierIncrement {
    TierIncrement {
        tier,
        increment,
        label,
        description,
    }
}

fn standard_tier_tables() -> Vec<TierTable> {
    vec![
        TierTable {
            care_type: CareType::AssistedLiving,
            tiers: vec![
                tier_row(Tier::ZERO, 0.0, "Standard Care", "Minimal support, independent with most ADLs"),
                tier_row(Tier::ONE, 600.0, "Light Assistance", "Medication management or mild ADL help"),
                tier_row(Tier::TWO, 1200.0, "Moderate Assistance", "Mobility assistance or moderate ADL help"),
                tier_row(
                    Tier::THREE,
                    2000.0,
                    "Enhanced Support",
                    "Memory support, behavioral concerns, or extensive ADLs",
                ),
                tier_row(Tier::FOUR, 3000.0, "Maximum Support", "Multiple high-intensity needs"),
            ],
        },
        TierTable {
            care_type: CareType::MemoryCare,
            tiers: vec![
                tier_row(Tier::ZERO, 0.0, "Standard Memory Care", "Base secured memory care environment"),
                tier_row(Tier::ONE, 400.0, "Light ADL Support", "Mild ADL or mobility support"),
                tier_row(Tier::TWO, 900.0, "Moderate ADL Support", "Moderate ADLs or mobility needs"),
                tier_row(
                    Tier::THREE,
                    1500.0,
                    "Enhanced Behavioral Support",
                    "Behavioral concerns or complex ADLs",
                ),
                tier_row(Tier::FOUR, 2200.0, "High-Acuity Care", "Severe behaviors or hands-on care"),
            ],
        },
        TierTable {
            care_type: CareType::MemoryCareHighAcuity,
            tiers: [Tier::ZERO, Tier::ONE, Tier::TWO, Tier::THREE, Tier::FOUR]
                .into_iter()
                .map(|tier| {
                    tier_row(
                        tier,
                        0.0,
                        "High Acuity",
                        "24/7 specialized memory care with the highest level of support",
                    )
                })
                .collect(),
        },
        TierTable {
            care_type: CareType::InHomeCare,
            tiers: vec![tier_row(
                Tier::ZERO,
                0.0,
                "Hourly Care",
                "Professional caregiver hours priced at the regional hourly rate",
            )],
        },
    ]
}

/// Regional base plus tier increment, before add-ons.
#[derive(Debug, Clone, PartialEq)]
pub struct TierPricing {
    pub care_type: CareType,
    pub tier: Tier,
    pub base_cost: f64,
    pub regional_base: f64,
    pub tier_increment: f64,
    pub tier_label: String,
    pub tier_description: String,
    base_label: String,
}

impl TierPricing {
    pub fn subtotal(&self) -> f64 {
        self.regional_base + self.tier_increment
    }
}

/// Facility pricing: both the base and the tier increment scale by the regional multiplier.
pub fn price_facility(
    tables: &CostTables,
    care_type: CareType,
    tier: Tier,
    regional_multiplier: f64,
) -> Result<TierPricing, EstimationError> {
    let base_cost = tables.monthly_base(care_type)?;
    let tier_row = tables.tier_increment(care_type, tier)?;

    Ok(TierPricing {
        care_type,
        tier,
        base_cost,
        regional_base: base_cost * regional_multiplier,
        tier_increment: tier_row.increment * regional_multiplier,
        tier_label: tier_row.label.to_string(),
        tier_description: tier_row.description.to_string(),
        base_label: "National Base".to_string(),
    })
}

/// In-home pricing: hourly rate over the assessed daily hours, treated as the monthly base.
pub fn price_in_home(
    tables: &CostTables,
    hours_per_day: f64,
    regional_multiplier: f64,
) -> Result<TierPricing, EstimationError> {
    let hourly = tables.hourly_rate(CareType::InHomeCare)?;
    let tier_row = tables.tier_increment(CareType::InHomeCare, Tier::ZERO)?;
    let base_cost = hourly * hours_per_day * DAYS_PER_MONTH;

    Ok(TierPricing {
        care_type: CareType::InHomeCare,
        tier: Tier::ZERO,
        base_cost,
        regional_base: base_cost * regional_multiplier,
        tier_increment: tier_row.increment * regional_multiplier,
        tier_label: format!("{} hours/day", format_hours(hours_per_day)),
        tier_description: tier_row.description.to_string(),
        base_label: format!(
            "National Base ({} hrs/day x {DAYS_PER_MONTH} days at ${hourly:.2}/hr)",
            format_hours(hours_per_day)
        ),
    })
}

/// Combine pricing and add-ons into the breakdown and its display rows.
pub fn assemble_breakdown(
    pricing: &TierPricing,
    add_ons: Vec<AddOn>,
    add_on_cap: f64,
    regional_multiplier: f64,
) -> CostBreakdown {
    let add_on_total: f64 = add_ons.iter().map(|add_on| add_on.amount).sum();
    let total = pricing.regional_base + pricing.tier_increment + add_on_total;

    let mut line_items = vec![
        LineItem {
            kind: LineItemKind::NationalBase,
            label: pricing.base_label.clone(),
            amount: pricing.base_cost,
        },
        LineItem {
            kind: LineItemKind::RegionalAdjustment,
            label: format!("Regional Adjustment ({regional_multiplier}x)"),
            amount: pricing.regional_base - pricing.base_cost,
        },
    ];

    if pricing.care_type.has_tier_pricing() {
        line_items.push(LineItem {
            kind: LineItemKind::CareTier,
            label: format!("Care Tier: {}", pricing.tier_label),
            amount: pricing.tier_increment,
        });
    }

    line_items.extend(add_ons.iter().map(|add_on| LineItem {
        kind: LineItemKind::AddOn,
        label: add_on.label.clone(),
        amount: add_on.amount,
    }));

    CostBreakdown {
        base_cost: pricing.base_cost,
        regional_base: pricing.regional_base,
        tier_increment: pricing.tier_increment,
        add_ons,
        add_on_cap,
        total,
        line_items,
    }
}

fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.0}")
    } else {
        format!("{hours:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_cover_every_priced_care_type() {
        let tables = CostTables::standard();

        assert_eq!(tables.monthly_base(CareType::AssistedLiving).unwrap(), 5900.0);
        assert_eq!(tables.monthly_base(CareType::MemoryCare).unwrap(), 7400.0);
        assert_eq!(tables.monthly_base(CareType::MemoryCareHighAcuity).unwrap(), 9400.0);
        assert_eq!(tables.hourly_rate(CareType::InHomeCare).unwrap(), 34.0);
        assert!(matches!(
            tables.base_cost(CareType::NoCareNeeded),
            Err(EstimationError::MissingBaseCost(CareType::NoCareNeeded))
        ));
    }

    #[test]
    fn standard_tables_are_shared() {
        assert!(Arc::ptr_eq(&CostTables::standard(), &CostTables::standard()));
    }

    #[test]
    fn tier_increments_match_published_schedule() {
        let tables = CostTables::standard();
        let assisted: Vec<f64> = (0..=Tier::MAX)
            .filter_map(Tier::new)
            .map(|tier| tables.tier_increment(CareType::AssistedLiving, tier).unwrap().increment)
            .collect();
        let memory: Vec<f64> = (0..=Tier::MAX)
            .filter_map(Tier::new)
            .map(|tier| tables.tier_increment(CareType::MemoryCare, tier).unwrap().increment)
            .collect();

        assert_eq!(assisted, vec![0.0, 600.0, 1200.0, 2000.0, 3000.0]);
        assert_eq!(memory, vec![0.0, 400.0, 900.0, 1500.0, 2200.0]);
        assert_eq!(
            tables
                .tier_increment(CareType::MemoryCareHighAcuity, Tier::FOUR)
                .unwrap()
                .increment,
            0.0
        );
    }

    #[test]
    fn regional_multiplier_scales_base_and_tier() {
        let tables = CostTables::standard();

        let pricing = price_facility(&tables, CareType::AssistedLiving, Tier::TWO, 1.25).unwrap();

        assert_eq!(pricing.base_cost, 5900.0);
        assert!((pricing.regional_base - 7375.0).abs() < 1e-9);
        assert!((pricing.tier_increment - 1500.0).abs() < 1e-9);
        assert!((pricing.subtotal() - 8875.0).abs() < 1e-9);
    }

    #[test]
    fn in_home_pricing_uses_hours_and_days() {
        let tables = CostTables::standard();

        let pricing = price_in_home(&tables, 4.0, 1.1).unwrap();

        let expected_base = 34.0 * 4.0 * DAYS_PER_MONTH;
        assert!((pricing.base_cost - expected_base).abs() < 1e-9);
        assert!((pricing.regional_base - expected_base * 1.1).abs() < 1e-9);
        assert_eq!(pricing.tier_increment, 0.0);
        assert_eq!(pricing.tier_label, "4 hours/day");
    }

    #[test]
    fn missing_tier_row_is_a_configuration_error() {
        let tables = CostTables::new(standard_base_costs(), Vec::new());

        let err = price_facility(&tables, CareType::MemoryCare, Tier::ONE, 1.0).unwrap_err();

        assert!(matches!(
            err,
            EstimationError::MissingTierIncrement {
                care_type: CareType::MemoryCare,
                tier: Tier::ONE
            }
        ));
    }

    #[test]
    fn line_items_sum_to_total() {
        let tables = CostTables::standard();
        let pricing = price_facility(&tables, CareType::MemoryCare, Tier::THREE, 0.87).unwrap();
        let add_ons = vec![AddOn {
            kind: super::super::domain::AddOnKind::IncontinenceCare,
            label: "Incontinence Care".to_string(),
            amount: 201.13,
            description: String::new(),
            reason: String::new(),
            capped: false,
        }];

        let breakdown = assemble_breakdown(&pricing, add_ons, 800.0, 0.87);

        let line_sum: f64 = breakdown.line_items.iter().map(|item| item.amount).sum();
        assert!((line_sum - breakdown.total).abs() < 0.005);
        assert!(
            (breakdown.total
                - (breakdown.regional_base + breakdown.tier_increment + breakdown.add_on_total()))
            .abs()
                < 0.005
        );
        assert_eq!(breakdown.line_items.len(), 4);
    }

    #[test]
    fn high_acuity_breakdown_omits_tier_line() {
        let tables = CostTables::standard();
        let pricing =
            price_facility(&tables, CareType::MemoryCareHighAcuity, Tier::FOUR, 1.0).unwrap();

        let breakdown = assemble_breakdown(&pricing, Vec::new(), 800.0, 1.0);

        assert!(breakdown
            .line_items
            .iter()
            .all(|item| item.kind != LineItemKind::CareTier));
        assert_eq!(breakdown.total, 9400.0);
    }
}
