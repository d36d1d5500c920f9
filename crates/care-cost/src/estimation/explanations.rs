//! Text rendering of estimates for advisors and families.
//!
//! Every sentence is derived from values already on the estimate, so nothing
//! here can introduce a reason the pricing rules did not produce.

use serde::{Deserialize, Serialize};

use super::domain::{CareCostEstimate, CareType, Confidence, CostRange};
use super::pricing::CostTables;

/// One or two sentences used as the estimate's headline explanation.
pub fn quick_summary(care_type: CareType, range: &CostRange) -> String {
    let mut summary = format!(
        "{} costs are estimated at {}/month, with a range of {} to {}. ",
        care_type.label(),
        format_currency(range.likely, 0),
        format_currency(range.low, 0),
        format_currency(range.high, 0),
    );

    summary.push_str(match range.confidence {
        Confidence::High => {
            "This is a high-confidence estimate based on stable, predictable care needs."
        }
        Confidence::Medium => {
            "Range reflects some variability in how communities price these care needs."
        }
        Confidence::Low => "Range is wider due to market variation for complex care requirements.",
    });
    summary
}

/// Who a rendered explanation is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    #[default]
    Advisor,
    Family,
}

impl Audience {
    pub fn from_key(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "advisor" => Some(Audience::Advisor),
            "family" => Some(Audience::Family),
            _ => None,
        }
    }
}

/// Markdown explanation of an estimate for the given audience.
pub fn cost_explanation(
    estimate: &CareCostEstimate,
    tables: &CostTables,
    audience: Audience,
) -> String {
    match audience {
        Audience::Advisor => advisor_report(estimate, tables),
        Audience::Family => family_report(estimate),
    }
}

/// Plain-language view: the range, what the monthly cost covers, why the
/// range is as wide as it is, and what happens next. No tier or add-on detail.
pub fn family_report(estimate: &CareCostEstimate) -> String {
    let range = &estimate.range;
    let sections = [
        "## Estimated Monthly Cost".to_string(),
        format!(
            "**Range:** {} - {}/month\n**Most Likely:** {}/month",
            format_currency(range.low, 0),
            format_currency(range.high, 0),
            format_currency(range.likely, 0),
        ),
        "### What This Includes".to_string(),
        inclusions(estimate),
        "### Why This Range?".to_string(),
        range.explanation.clone(),
        "### Next Steps".to_string(),
        "Your Care Advisor will:\n\
         - Match you with communities in your target area\n\
         - Request actual pricing quotes\n\
         - Review contracts and fee schedules\n\
         - Help you compare options side-by-side"
            .to_string(),
    ];

    sections.join("\n\n")
}

fn inclusions(estimate: &CareCostEstimate) -> String {
    let specific = match estimate.care_type {
        CareType::AssistedLiving => "Personal care assistance based on needs",
        CareType::MemoryCare => "Specialized memory care programming and secured environment",
        CareType::MemoryCareHighAcuity => {
            "24/7 specialized dementia care with intensive clinical oversight"
        }
        CareType::InHomeCare => {
            let weekly = estimate.hours_per_day.unwrap_or_default() * 7.0;
            return [
                format!("- Professional caregiver support ({weekly:.0} hours/week)"),
                "- Personal care assistance".to_string(),
                "- Light housekeeping".to_string(),
                "- Meal preparation".to_string(),
                "- Medication reminders".to_string(),
                "- Companionship".to_string(),
            ]
            .join("\n");
        }
        CareType::NoCareNeeded => return "- No paid care services".to_string(),
    };

    [
        "- Private or semi-private apartment",
        "- Three meals daily plus snacks",
        "- Medication management and monitoring",
        "- Activities and social engagement",
        "- Housekeeping and laundry",
        "- Transportation to appointments",
    ]
    .iter()
    .map(|line| line.to_string())
    .chain(std::iter::once(format!("- {specific}")))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Full markdown report: header, breakdown, range, tier, add-ons, sources and notes.
pub fn advisor_report(estimate: &CareCostEstimate, tables: &CostTables) -> String {
    let mut sections = vec![
        header(estimate),
        breakdown_table(estimate),
        range_section(&estimate.range),
    ];

    if estimate.care_type.has_tier_pricing() {
        sections.push(tier_explanation(estimate));
    }
    if !estimate.breakdown.add_ons.is_empty() {
        sections.push(add_ons_section(estimate));
    }
    if let Some(sources) = sources_section(estimate, tables) {
        sections.push(sources);
    }
    sections.push(advisor_notes(estimate));

    sections.join("\n\n")
}

fn header(estimate: &CareCostEstimate) -> String {
    format!(
        "# Cost Estimate: {}\n**Estimated Monthly Cost:** {}\n**Confidence Level:** {}",
        estimate.care_type.label(),
        format_currency(estimate.breakdown.total, 0),
        capitalize(estimate.range.confidence.label()),
    )
}

pub fn breakdown_table(estimate: &CareCostEstimate) -> String {
    let mut lines = vec![
        "## Cost Breakdown".to_string(),
        String::new(),
        "| Component | Amount |".to_string(),
        "|-----------|--------|".to_string(),
    ];

    for item in &estimate.breakdown.line_items {
        if item.amount == 0.0 {
            lines.push(format!("| {} | - |", item.label));
        } else {
            lines.push(format!("| {} | {} |", item.label, format_currency(item.amount, 2)));
        }
    }
    lines.push(format!(
        "| **Total Monthly** | **{}** |",
        format_currency(estimate.breakdown.total, 2)
    ));

    lines.join("\n")
}

fn range_section(range: &CostRange) -> String {
    let mut lines = vec![
        "## Cost Range".to_string(),
        format!("- **Low:** {}/month", format_currency(range.low, 0)),
        format!("- **Most Likely:** {}/month", format_currency(range.likely, 0)),
        format!("- **High:** {}/month", format_currency(range.high, 0)),
        String::new(),
        format!(
            "**Range Width:** ±{:.0}% ({} confidence)",
            range.range_pct * 100.0,
            range.confidence.label()
        ),
        String::new(),
        range.explanation.clone(),
    ];

    if !range.widening_factors.is_empty() {
        lines.push(String::new());
        lines.push("**Factors Affecting Range:**".to_string());
        lines.extend(range.widening_factors.iter().map(|factor| format!("- {factor}")));
    }

    lines.join("\n")
}

pub fn tier_explanation(estimate: &CareCostEstimate) -> String {
    let mut lines = vec![
        format!("## Care Tier: {} ({})", estimate.tier_label, estimate.tier),
        estimate.tier_description.clone(),
    ];

    if estimate.breakdown.tier_increment > 0.0 {
        lines.push(format!(
            "\n**Tier Cost:** {}/month",
            format_currency(estimate.breakdown.tier_increment, 2)
        ));
        lines.push(
            "This reflects the additional staffing, training, and resources required to support the assessed care needs."
                .to_string(),
        );
    }

    lines.join("\n")
}

fn add_ons_section(estimate: &CareCostEstimate) -> String {
    let breakdown = &estimate.breakdown;
    let mut lines = vec![
        "## Additional Services".to_string(),
        format!(
            "*(Capped at {} or 15% of regional base, whichever is lower)*",
            format_currency(breakdown.add_on_cap, 0)
        ),
        String::new(),
    ];

    for add_on in &breakdown.add_ons {
        lines.push(format!(
            "### {} (+{}/month)",
            add_on.label,
            format_currency(add_on.amount, 2)
        ));
        lines.push(add_on.description.clone());
        lines.push(format!("*Reason:* {}", add_on.reason));
        if add_on.capped {
            lines.push("*Scaled down to fit the additional services cap.*".to_string());
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "**Total Additional Services:** {}/month",
        format_currency(breakdown.add_on_total(), 2)
    ));
    lines.join("\n")
}

fn sources_section(estimate: &CareCostEstimate, tables: &CostTables) -> Option<String> {
    let entry = tables.base_cost(estimate.care_type).ok()?;
    let source = &entry.source;

    let mut lines = vec![
        "## Data Sources".to_string(),
        format!(
            "**Base Cost:** {}/month",
            format_currency(estimate.breakdown.base_cost, 2)
        ),
    ];
    match (source.derived, source.url) {
        (false, Some(url)) => lines.push(format!("*Source:* [{}]({url})", source.name)),
        _ => {
            lines.push(format!("*Source:* {} (derived)", source.name));
            lines.push(format!("*Notes:* {}", source.notes));
        }
    }
    lines.push(String::new());
    lines.push(
        "**Regional Multiplier:** Based on local market analysis and community surveys".to_string(),
    );
    lines.push(
        "**Tier Increments:** Based on industry staffing cost analysis and provider fee schedules"
            .to_string(),
    );

    Some(lines.join("\n"))
}

/// Confidence guidance plus notes specific to the care setting.
pub fn advisor_notes(estimate: &CareCostEstimate) -> String {
    let mut lines = vec!["## Advisor Notes".to_string()];

    lines.push(
        match estimate.range.confidence {
            Confidence::High => {
                "**High confidence estimate:** Care needs are stable. Most communities should fall within the likely range (±7%)."
            }
            Confidence::Medium => {
                "**Moderate confidence estimate:** Some variability expected. Get quotes from 3-5 communities to narrow the range."
            }
            Confidence::Low => {
                "**Lower confidence estimate:** Significant market variation exists. Recommend getting quotes from 5+ specialized communities and discussing specific care plans to understand pricing."
            }
        }
        .to_string(),
    );

    match estimate.care_type {
        CareType::MemoryCareHighAcuity => {
            lines.push(String::new());
            lines.push(
                "**High-Acuity Memory Care:** Few communities offer this level of care. Focus on communities with specialized dementia units, secured environments, and 24/7 clinical staffing."
                    .to_string(),
            );
        }
        CareType::InHomeCare => {
            let weekly = estimate.hours_per_day.unwrap_or_default() * 7.0;
            if weekly >= 40.0 {
                lines.push(String::new());
                lines.push(format!(
                    "**High-Hour In-Home Care ({weekly:.0} hrs/week):** Consider comparing with assisted living/memory care costs. Facility care may provide better value at this hour level."
                ));
            }
        }
        _ => {}
    }

    for step in &estimate.escalation_path {
        lines.push(String::new());
        lines.push(format!(
            "**Escalated from {} to {}:** {}.",
            step.from.label(),
            step.to.label(),
            step.rule.replace('_', " ")
        ));
    }

    lines.join("\n")
}

/// Side-by-side markdown table for several care options.
pub fn comparison_table(estimates: &[CareCostEstimate]) -> String {
    if estimates.is_empty() {
        return String::new();
    }

    let mut lines = vec![
        "# Care Cost Comparison".to_string(),
        String::new(),
        "| Care Type | Monthly Cost | Range | Confidence |".to_string(),
        "|-----------|--------------|-------|------------|".to_string(),
    ];

    for estimate in estimates {
        lines.push(format!(
            "| {} | {} | {} - {} | {} |",
            estimate.care_type.label(),
            format_currency(estimate.breakdown.total, 0),
            format_currency(estimate.range.low, 0),
            format_currency(estimate.range.high, 0),
            capitalize(estimate.range.confidence.label()),
        ));
    }

    lines.push(String::new());
    lines.push("*All estimates based on same regional multiplier and assessment data*".to_string());
    lines.join("\n")
}

/// `$12,345` / `$12,345.67` style dollar amounts.
pub fn format_currency(amount: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}${grouped}.{fraction}"),
        None => format!("{sign}${grouped}"),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
