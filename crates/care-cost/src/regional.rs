//! Regional cost-of-care multipliers keyed by location.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::estimation::context::normalize_token;

/// Multiplier used when no row matches a location.
pub const NATIONAL_AVERAGE: f64 = 1.0;

/// Where the individual plans to receive care.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Location {
    pub fn new(zip: Option<&str>, state: Option<&str>) -> Self {
        Self {
            zip: zip.map(str::to_string),
            state: state.map(str::to_string),
        }
    }
}

/// Resolves a location to the scaling factor applied to base and tier costs.
pub trait RegionalMultiplierSource: Send + Sync {
    fn multiplier_for(&self, location: &Location) -> f64;
}

/// Always the national average.
#[derive(Debug, Clone, Copy, Default)]
pub struct NationalAverage;

impl RegionalMultiplierSource for NationalAverage {
    fn multiplier_for(&self, _location: &Location) -> f64 {
        NATIONAL_AVERAGE
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegionalTableError {
    #[error("failed to open regional table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse regional table: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid regional row {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Scope {
    Zip,
    Zip3,
    State,
}

#[derive(Debug, Deserialize)]
struct RegionalRow {
    scope: Scope,
    key: String,
    multiplier: f64,
}

/// CSV-backed lookup: exact zip, then 3-digit zip prefix, then state.
#[derive(Debug, Clone, Default)]
pub struct RegionalTable {
    entries: HashMap<(Scope, String), f64>,
}

impl RegionalTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegionalTableError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse `scope,key,multiplier` rows. Non-positive multipliers reject the whole table.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RegionalTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut entries = HashMap::new();

        for (index, record) in csv_reader.deserialize::<RegionalRow>().enumerate() {
            let row = record?;
            // header is line 1
            let line = index + 2;
            if !row.multiplier.is_finite() || row.multiplier <= 0.0 {
                return Err(RegionalTableError::InvalidRow {
                    line,
                    reason: format!("multiplier must be positive, got {}", row.multiplier),
                });
            }

            let key = normalize_key(row.scope, &row.key);
            if key.is_empty() {
                return Err(RegionalTableError::InvalidRow {
                    line,
                    reason: "key is empty".to_string(),
                });
            }
            entries.insert((row.scope, key), row.multiplier);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, scope: Scope, key: &str) -> Option<f64> {
        self.entries.get(&(scope, key.to_string())).copied()
    }
}

impl RegionalMultiplierSource for RegionalTable {
    fn multiplier_for(&self, location: &Location) -> f64 {
        let zip = location
            .zip
            .as_deref()
            .map(|zip| normalize_key(Scope::Zip, zip))
            .filter(|zip| !zip.is_empty());

        if let Some(zip) = zip.as_deref() {
            if let Some(multiplier) = self.get(Scope::Zip, zip) {
                debug!(zip, multiplier, "regional multiplier from zip");
                return multiplier;
            }
            if zip.len() >= 3 {
                if let Some(multiplier) = self.get(Scope::Zip3, &zip[..3]) {
                    debug!(zip, multiplier, "regional multiplier from zip prefix");
                    return multiplier;
                }
            }
        }

        if let Some(state) = location.state.as_deref() {
            if let Some(multiplier) = self.get(Scope::State, &normalize_key(Scope::State, state)) {
                debug!(state, multiplier, "regional multiplier from state");
                return multiplier;
            }
        }

        NATIONAL_AVERAGE
    }
}

fn normalize_key(scope: Scope, raw: &str) -> String {
    match scope {
        Scope::Zip | Scope::Zip3 => raw.trim().chars().filter(char::is_ascii_digit).take(5).collect(),
        Scope::State => normalize_token(raw),
    }
}
