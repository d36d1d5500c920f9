use crate::infra::ConfiguredRegions;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use care_cost::error::AppError;
use care_cost::estimation::explanations::{cost_explanation, format_currency, Audience};
use care_cost::estimation::{AssessmentOutcome, CareCostEngine, CareType};
use care_cost::regional::{Location, RegionalMultiplierSource};

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Assessment outcome JSON (flags, answers, recommendation)
    pub(crate) assessment: PathBuf,
    /// Regional cost multiplier; wins over --zip/--state
    #[arg(long)]
    pub(crate) multiplier: Option<f64>,
    /// Zip code used for the regional lookup
    #[arg(long)]
    pub(crate) zip: Option<String>,
    /// State used for the regional lookup when the zip is unknown
    #[arg(long)]
    pub(crate) state: Option<String>,
    /// Price this care type instead of the assessment recommendation
    #[arg(long, value_parser = parse_care_type)]
    pub(crate) care_type: Option<CareType>,
    /// Comma separated care types to compare side by side
    #[arg(long, value_delimiter = ',', value_parser = parse_care_type)]
    pub(crate) compare: Vec<CareType>,
    /// Regional multiplier CSV (scope,key,multiplier)
    #[arg(long)]
    pub(crate) regional_table: Option<PathBuf>,
    /// Report audience: advisor (full breakdown) or family (plain language)
    #[arg(long, default_value = "advisor", value_parser = parse_audience)]
    pub(crate) audience: Audience,
    /// Print the estimate as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
    /// Report date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn parse_care_type(raw: &str) -> Result<CareType, String> {
    CareType::from_key(raw).ok_or_else(|| {
        format!(
            "unknown care type '{raw}' (expected assisted_living, memory_care, \
             memory_care_high_acuity, in_home_care or no_care_needed)"
        )
    })
}

pub(crate) fn parse_audience(raw: &str) -> Result<Audience, String> {
    Audience::from_key(raw)
        .ok_or_else(|| format!("unknown audience '{raw}' (expected advisor or family)"))
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        assessment,
        multiplier,
        zip,
        state,
        care_type,
        compare,
        regional_table,
        audience,
        json,
        as_of,
    } = args;

    let outcome: AssessmentOutcome =
        serde_json::from_reader(BufReader::new(File::open(&assessment)?))?;
    let regions = ConfiguredRegions::load(regional_table.as_deref())?;
    let location = Location::new(zip.as_deref(), state.as_deref());
    let multiplier = multiplier.unwrap_or_else(|| regions.multiplier_for(&location));

    let engine = CareCostEngine::standard();
    let estimate = match care_type {
        Some(care_type) => engine.estimate_as(&outcome, multiplier, care_type)?,
        None => engine.estimate(&outcome, multiplier)?,
    };
    let comparison = if compare.is_empty() {
        None
    } else {
        Some(engine.compare(&outcome, multiplier, &compare)?)
    };

    if json {
        let payload = serde_json::json!({
            "estimate": estimate,
            "comparison": comparison,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    println!("Prepared {} from {}", as_of.format("%B %-d, %Y"), assessment.display());
    println!(
        "Regional multiplier {:.2} ({} base)\n",
        estimate.regional_multiplier,
        format_currency(estimate.breakdown.regional_base, 0)
    );
    println!("{}", cost_explanation(&estimate, engine.tables(), audience));

    if let Some(comparison) = comparison {
        println!("\n{}", comparison.table);
    }

    Ok(())
}
