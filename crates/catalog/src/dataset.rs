use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use foundation::{LonLat, LonLatBounds};
use serde::{Deserialize, Serialize};

use crate::CatalogError;
use crate::model::{Factory, PollutionDataPoint};

const SAMPLE_JSON: &str = include_str!("../data/sample.json");

/// Readings and factory sites served to the dashboard.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub readings: Vec<PollutionDataPoint>,
    #[serde(default)]
    pub factories: Vec<Factory>,
}

/// Non-fatal findings from validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetWarning {
    pub id: String,
    pub message: String,
}

impl fmt::Display for DatasetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.message)
    }
}

impl Dataset {
    /// Parses and validates once, returning the non-fatal warnings alongside.
    /// Validation errors reject the whole payload.
    pub fn parse_checked(raw: &str) -> Result<(Self, Vec<DatasetWarning>), CatalogError> {
        let dataset: Dataset =
            serde_json::from_str(raw).map_err(|e| CatalogError::Corrupt(e.to_string()))?;
        let warnings = dataset.validate()?;
        Ok((dataset, warnings))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        Self::parse_checked(raw).map(|(dataset, _)| dataset)
    }

    pub fn load_checked(
        path: impl AsRef<Path>,
    ) -> Result<(Self, Vec<DatasetWarning>), CatalogError> {
        let path = path.as_ref();
        let raw =
            fs::read_to_string(path).map_err(|e| CatalogError::Io(format!("{path:?}: {e}")))?;
        Self::parse_checked(&raw)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::load_checked(path).map(|(dataset, _)| dataset)
    }

    /// Embedded sample: Vietnamese provinces plus a handful of Hanoi factories.
    pub fn sample() -> Result<Self, CatalogError> {
        Self::from_json_str(SAMPLE_JSON)
    }

    pub fn validate(&self) -> Result<Vec<DatasetWarning>, CatalogError> {
        let mut warnings = Vec::new();

        let mut ids = BTreeSet::new();
        for point in &self.readings {
            if point.id.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "data point for {:?} has an empty id",
                    point.location.key
                )));
            }
            if !ids.insert(point.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate data point id {:?}",
                    point.id
                )));
            }
            warnings.extend(validate_point(point)?);
        }

        let mut factory_ids = BTreeSet::new();
        for factory in &self.factories {
            if !factory_ids.insert(factory.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate factory id {:?}",
                    factory.id
                )));
            }
            warnings.extend(check_position(&factory.id, factory.lon_lat())?);
        }

        Ok(warnings)
    }

    /// blake3 hex digest of the canonical JSON encoding.
    pub fn fingerprint(&self) -> Result<String, CatalogError> {
        let bytes = serde_json::to_vec(self).map_err(|e| CatalogError::Io(e.to_string()))?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}

/// Checks one data point. Concentrations must be finite and non-negative;
/// positions outside Vietnam are only warned about.
pub fn validate_point(point: &PollutionDataPoint) -> Result<Vec<DatasetWarning>, CatalogError> {
    if point.location.key.trim().is_empty() {
        return Err(CatalogError::Invalid(format!(
            "data point {:?} has an empty location key",
            point.id
        )));
    }
    for (pollutant, value) in point.readings.iter() {
        if !value.is_finite() || value < 0.0 {
            return Err(CatalogError::Invalid(format!(
                "data point {:?}: {} concentration {value} is not a finite non-negative number",
                point.id,
                pollutant.label()
            )));
        }
    }
    check_position(&point.id, point.location.lon_lat())
}

fn check_position(id: &str, pos: LonLat) -> Result<Vec<DatasetWarning>, CatalogError> {
    if !pos.is_valid() {
        return Err(CatalogError::Invalid(format!(
            "{id:?}: invalid coordinates ({}, {})",
            pos.lon, pos.lat
        )));
    }
    if !LonLatBounds::VIETNAM.contains(pos) {
        return Ok(vec![DatasetWarning {
            id: id.to_string(),
            message: format!("position ({}, {}) is outside Vietnam", pos.lon, pos.lat),
        }]);
    }
    Ok(Vec::new())
}
