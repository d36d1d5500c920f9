use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::domain::CareType;

/// Flag identifiers emitted by the clinical assessment.
pub mod flags {
    pub const SEVERE_COGNITIVE_RISK: &str = "severe_cognitive_risk";
    pub const MODERATE_COGNITIVE_DECLINE: &str = "moderate_cognitive_decline";
    pub const MILD_COGNITIVE_DECLINE: &str = "mild_cognitive_decline";
    pub const MEMORY_CARE_DX: &str = "memory_care_dx";
    pub const BEHAVIORAL_CONCERNS: &str = "behavioral_concerns";
    pub const CONTINUOUS_SUPERVISION: &str = "continuous_supervision";
    pub const HIGH_MOBILITY_DEPENDENCE: &str = "high_mobility_dependence";
    pub const MODERATE_MOBILITY: &str = "moderate_mobility";
    pub const HIGH_DEPENDENCE: &str = "high_dependence";
    pub const TRANSFER_ASSISTANCE_1PERSON: &str = "transfer_assistance_1person";
    pub const TRANSFER_ASSISTANCE_2PERSON: &str = "transfer_assistance_2person";
    pub const TRANSFER_LIFT_REQUIRED: &str = "transfer_lift_required";
    pub const INCONTINENCE_MANAGEMENT: &str = "incontinence_management";
    pub const FALLS_MULTIPLE: &str = "falls_multiple";
}

/// Chronic conditions that materially change care delivery.
pub const HIGH_IMPACT_CONDITIONS: &[&str] = &["parkinsons", "copd", "heart_disease", "stroke"];

/// Hours of in-home care assumed when the assessment gives no band.
pub const DEFAULT_HOURS_PER_DAY: f64 = 1.0;

/// Raw outcome handed over by the assessment collaborator. Null or oddly
/// shaped fields read as absent instead of failing the whole outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    #[serde(default, deserialize_with = "lenient_flags")]
    pub flags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_answers")]
    pub answers: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recommendation: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub support_band: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hours_band: Option<String>,
}

fn lenient_flags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(flag) => Some(flag),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_answers<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        _ => None,
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let score = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score.filter(|score| score.is_finite()).unwrap_or_default())
}

impl AssessmentOutcome {
    /// Care classification from the assessment; unknown or missing values fall back to assisted living.
    pub fn recommended_care_type(&self) -> CareType {
        self.recommendation
            .as_deref()
            .and_then(CareType::from_key)
            .unwrap_or(CareType::AssistedLiving)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedsComplexity {
    None,
    Simple,
    Moderate,
    Complex,
}

impl MedsComplexity {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "simple" | "low" => Some(Self::Simple),
            "moderate" => Some(Self::Moderate),
            "complex" | "high" => Some(Self::Complex),
            _ => None,
        }
    }

    pub const fn needs_management(self) -> bool {
        matches!(self, Self::Moderate | Self::Complex)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncontinenceLevel {
    None,
    Occasional,
    Frequent,
    Complete,
}

impl IncontinenceLevel {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "none" | "continent" => Some(Self::None),
            "occasional" | "some" => Some(Self::Occasional),
            "frequent" => Some(Self::Frequent),
            "complete" | "total" => Some(Self::Complete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeAlone {
    Yes,
    Sometimes,
    No,
}

impl SafeAlone {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" | "true" => Some(Self::Yes),
            "sometimes" | "short_periods" | "unsure" => Some(Self::Sometimes),
            "no" | "false" => Some(Self::No),
            _ => None,
        }
    }
}

/// Answer map after normalization; every field has a defined default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAnswers {
    pub badls: Vec<String>,
    pub badls_count: u32,
    pub iadls: Vec<String>,
    pub iadls_count: u32,
    pub behaviors: Vec<String>,
    pub behaviors_count: u32,
    pub chronic_conditions: Vec<String>,
    pub meds_complexity: Option<MedsComplexity>,
    pub incontinence: Option<IncontinenceLevel>,
    pub safe_alone: Option<SafeAlone>,
    pub transfers: Option<String>,
    pub mobility: Option<String>,
    pub hours_per_day: f64,
}

impl Default for NormalizedAnswers {
    fn default() -> Self {
        Self {
            badls: Vec::new(),
            badls_count: 0,
            iadls: Vec::new(),
            iadls_count: 0,
            behaviors: Vec::new(),
            behaviors_count: 0,
            chronic_conditions: Vec::new(),
            meds_complexity: None,
            incontinence: None,
            safe_alone: None,
            transfers: None,
            mobility: None,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
        }
    }
}

/// Canonical clinical view of one individual, built once per estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalContext {
    flags: BTreeSet<String>,
    answers: NormalizedAnswers,
}

impl ClinicalContext {
    pub fn new<I, S>(flags: I, answers: NormalizedAnswers) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let flags = flags
            .into_iter()
            .map(|flag| normalize_token(flag.as_ref()))
            .filter(|flag| !flag.is_empty() && flag != "none")
            .collect();
        Self { flags, answers }
    }

    /// Translate an assessment outcome; missing or oddly shaped answers resolve to defaults.
    pub fn from_outcome(outcome: &AssessmentOutcome) -> Self {
        let raw = &outcome.answers;

        let badls = list_answer(raw, "badls");
        let iadls = list_answer(raw, "iadls");
        let behaviors = list_answer(raw, "behaviors");

        let answers = NormalizedAnswers {
            badls_count: count_answer(raw, "badls", &badls, "badls_count"),
            iadls_count: count_answer(raw, "iadls", &iadls, "iadls_count"),
            behaviors_count: count_answer(raw, "behaviors", &behaviors, "behaviors_count"),
            badls,
            iadls,
            behaviors,
            chronic_conditions: list_answer(raw, "chronic_conditions"),
            meds_complexity: text_answer(raw, "meds_complexity")
                .and_then(|value| MedsComplexity::parse(&value)),
            incontinence: text_answer(raw, "incontinence")
                .and_then(|value| IncontinenceLevel::parse(&value)),
            safe_alone: text_answer(raw, "safe_alone").and_then(|value| SafeAlone::parse(&value)),
            transfers: text_answer(raw, "transfers"),
            mobility: text_answer(raw, "mobility"),
            hours_per_day: hours_per_day(raw, outcome.hours_band.as_deref()),
        };

        Self::new(&outcome.flags, answers)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    pub fn answers(&self) -> &NormalizedAnswers {
        &self.answers
    }

    pub fn adl_count(&self) -> u32 {
        self.answers.badls_count
    }

    pub fn iadl_count(&self) -> u32 {
        self.answers.iadls_count
    }

    pub fn behavior_count(&self) -> u32 {
        self.answers.behaviors_count
    }

    pub fn chronic_count(&self) -> u32 {
        saturating_len(&self.answers.chronic_conditions)
    }

    pub fn high_impact_conditions(&self) -> impl Iterator<Item = &str> {
        self.answers
            .chronic_conditions
            .iter()
            .map(String::as_str)
            .filter(|condition| HIGH_IMPACT_CONDITIONS.contains(condition))
    }

    pub fn high_impact_count(&self) -> u32 {
        self.high_impact_conditions().count().try_into().unwrap_or(u32::MAX)
    }
}

pub(crate) fn normalize_token(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.trim().to_ascii_lowercase()
}

fn list_answer(answers: &BTreeMap<String, Value>, key: &str) -> Vec<String> {
    match answers.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(normalize_token)
            .filter(|item| !item.is_empty() && item != "none")
            .collect(),
        _ => Vec::new(),
    }
}

fn count_answer(
    answers: &BTreeMap<String, Value>,
    list_key: &str,
    list: &[String],
    count_key: &str,
) -> u32 {
    if matches!(answers.get(list_key), Some(Value::Array(_))) {
        return saturating_len(list);
    }

    answers
        .get(count_key)
        .and_then(Value::as_u64)
        .map(|count| count.min(u64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

fn text_answer(answers: &BTreeMap<String, Value>, key: &str) -> Option<String> {
    answers
        .get(key)
        .and_then(Value::as_str)
        .map(normalize_token)
        .filter(|value| !value.is_empty())
}

fn hours_per_day(answers: &BTreeMap<String, Value>, hours_band: Option<&str>) -> f64 {
    if let Some(hours) = answers.get("hours_per_day").and_then(Value::as_f64) {
        if hours.is_finite() && hours > 0.0 {
            return hours.min(24.0);
        }
    }

    match hours_band.map(normalize_token).as_deref() {
        Some("<1h") => 1.0,
        Some("1-3h") => 3.0,
        Some("4-8h") => 8.0,
        Some("24h") => 24.0,
        _ => DEFAULT_HOURS_PER_DAY,
    }
}

fn saturating_len(items: &[String]) -> u32 {
    items.len().try_into().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome(answers: Value) -> AssessmentOutcome {
        serde_json::from_value(json!({ "flags": ["Falls_Multiple ", "none"], "answers": answers }))
            .expect("outcome deserializes")
    }

    #[test]
    fn missing_answers_resolve_to_defaults() {
        let context = ClinicalContext::from_outcome(&AssessmentOutcome::default());

        assert_eq!(context.adl_count(), 0);
        assert_eq!(context.iadl_count(), 0);
        assert_eq!(context.behavior_count(), 0);
        assert_eq!(context.chronic_count(), 0);
        assert!(context.answers().meds_complexity.is_none());
        assert_eq!(context.answers().hours_per_day, DEFAULT_HOURS_PER_DAY);
        assert_eq!(context.flags().count(), 0);
    }

    #[test]
    fn null_fields_read_as_absent() {
        let raw: AssessmentOutcome = serde_json::from_value(json!({
            "flags": null,
            "answers": null,
            "recommendation": null,
            "score": null,
            "support_band": null,
            "hours_band": null,
        }))
        .expect("null fields are accepted");

        assert_eq!(raw, AssessmentOutcome::default());
        assert_eq!(raw.recommended_care_type(), CareType::AssistedLiving);
    }

    #[test]
    fn oddly_shaped_fields_fall_back_to_defaults() {
        let raw: AssessmentOutcome = serde_json::from_value(json!({
            "flags": "falls_multiple",
            "answers": ["bathing"],
            "recommendation": 3,
            "score": "not a score",
            "hours_band": { "band": "24h" },
        }))
        .expect("mismatched shapes are accepted");

        assert!(raw.flags.is_empty());
        assert!(raw.answers.is_empty());
        assert!(raw.recommendation.is_none());
        assert_eq!(raw.score, 0.0);
        assert!(raw.hours_band.is_none());
    }

    #[test]
    fn numeric_score_text_and_mixed_flag_lists_are_salvaged() {
        let raw: AssessmentOutcome = serde_json::from_value(json!({
            "flags": ["falls_multiple", 7, null, "memory_care_dx"],
            "score": "58",
        }))
        .expect("outcome deserializes");

        assert_eq!(raw.score, 58.0);
        assert_eq!(raw.flags, vec!["falls_multiple", "memory_care_dx"]);
        let context = ClinicalContext::from_outcome(&raw);
        assert!(context.has_flag(flags::MEMORY_CARE_DX));
    }

    #[test]
    fn lists_drop_none_entries_and_drive_counts() {
        let context = ClinicalContext::from_outcome(&outcome(json!({
            "badls": ["bathing", "none", "dressing"],
            "behaviors": "wandering",
            "chronic_conditions": ["COPD", "diabetes"],
        })));

        assert_eq!(context.adl_count(), 2);
        assert_eq!(context.behavior_count(), 0);
        assert_eq!(context.answers().chronic_conditions, vec!["copd", "diabetes"]);
        assert_eq!(context.high_impact_count(), 1);
        assert!(context.has_flag(flags::FALLS_MULTIPLE));
        assert_eq!(context.flags().count(), 1);
    }

    #[test]
    fn explicit_counts_apply_when_lists_are_absent() {
        let context = ClinicalContext::from_outcome(&outcome(json!({
            "badls_count": 3,
            "behaviors_count": 2,
            "iadls_count": "four",
        })));

        assert_eq!(context.adl_count(), 3);
        assert_eq!(context.behavior_count(), 2);
        assert_eq!(context.iadl_count(), 0);
    }

    #[test]
    fn scalar_answers_parse_into_enums() {
        let context = ClinicalContext::from_outcome(&outcome(json!({
            "meds_complexity": "Complex",
            "incontinence": "complete",
            "safe_alone": "no",
            "mobility": "walker",
        })));

        let answers = context.answers();
        assert_eq!(answers.meds_complexity, Some(MedsComplexity::Complex));
        assert_eq!(answers.incontinence, Some(IncontinenceLevel::Complete));
        assert_eq!(answers.safe_alone, Some(SafeAlone::No));
        assert_eq!(answers.mobility.as_deref(), Some("walker"));
    }

    #[test]
    fn unknown_enum_values_are_treated_as_absent() {
        let context = ClinicalContext::from_outcome(&outcome(json!({
            "meds_complexity": "extreme",
            "incontinence": 4,
        })));

        assert!(context.answers().meds_complexity.is_none());
        assert!(context.answers().incontinence.is_none());
    }

    #[test]
    fn hours_prefer_explicit_answer_over_band() {
        let mut raw = outcome(json!({ "hours_per_day": 6 }));
        raw.hours_band = Some("24h".to_string());
        assert_eq!(ClinicalContext::from_outcome(&raw).answers().hours_per_day, 6.0);

        raw.answers.clear();
        assert_eq!(ClinicalContext::from_outcome(&raw).answers().hours_per_day, 24.0);

        raw.hours_band = Some("4-8h".to_string());
        assert_eq!(ClinicalContext::from_outcome(&raw).answers().hours_per_day, 8.0);
    }

    #[test]
    fn recommendation_defaults_to_assisted_living() {
        let mut raw = AssessmentOutcome::default();
        assert_eq!(raw.recommended_care_type(), CareType::AssistedLiving);

        raw.recommendation = Some("in_home".to_string());
        assert_eq!(raw.recommended_care_type(), CareType::InHomeCare);

        raw.recommendation = Some("skilled nursing".to_string());
        assert_eq!(raw.recommended_care_type(), CareType::AssistedLiving);
    }
}
