use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use care_cost::regional::{
    Location, NationalAverage, RegionalMultiplierSource, RegionalTable, RegionalTableError,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Regional source chosen at startup.
#[derive(Debug, Clone)]
pub(crate) enum ConfiguredRegions {
    Table(RegionalTable),
    National(NationalAverage),
}

impl ConfiguredRegions {
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, RegionalTableError> {
        match path {
            Some(path) => {
                let table = RegionalTable::from_path(path)?;
                info!(path = %path.display(), rows = table.len(), "regional multiplier table loaded");
                Ok(Self::Table(table))
            }
            None => Ok(Self::National(NationalAverage)),
        }
    }
}

impl RegionalMultiplierSource for ConfiguredRegions {
    fn multiplier_for(&self, location: &Location) -> f64 {
        match self {
            ConfiguredRegions::Table(table) => table.multiplier_for(location),
            ConfiguredRegions::National(national) => national.multiplier_for(location),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
