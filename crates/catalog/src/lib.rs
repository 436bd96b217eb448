use std::collections::BTreeMap;

pub mod dataset;
pub mod model;
pub mod query;
pub mod stats;

pub use dataset::*;
pub use model::*;
pub use query::*;
pub use stats::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound(String),
    Invalid(String),
    Corrupt(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(what) => write!(f, "not found: {what}"),
            CatalogError::Invalid(msg) => write!(f, "invalid data: {msg}"),
            CatalogError::Corrupt(msg) => write!(f, "dataset corrupt: {msg}"),
            CatalogError::Io(msg) => write!(f, "dataset I/O error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

pub trait ReadingStore {
    fn list(&self) -> Result<Vec<PollutionDataPoint>, CatalogError>;
    fn get(&self, id: &str) -> Result<Option<PollutionDataPoint>, CatalogError>;
    /// Most recent reading for a location key.
    fn find_by_key(&self, key: &str) -> Result<Option<PollutionDataPoint>, CatalogError>;
    fn upsert(&mut self, point: PollutionDataPoint) -> Result<(), CatalogError>;
    fn delete(&mut self, id: &str) -> Result<bool, CatalogError>;
}

/// Reading store backed by a `BTreeMap` so listing order is deterministic.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReadingStore {
    points: BTreeMap<String, PollutionDataPoint>,
}

impl InMemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: &Dataset) -> Result<Self, CatalogError> {
        let mut store = Self::new();
        for point in &dataset.readings {
            store.upsert(point.clone())?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ReadingStore for InMemoryReadingStore {
    fn list(&self) -> Result<Vec<PollutionDataPoint>, CatalogError> {
        Ok(self.points.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<PollutionDataPoint>, CatalogError> {
        Ok(self.points.get(id).cloned())
    }

    fn find_by_key(&self, key: &str) -> Result<Option<PollutionDataPoint>, CatalogError> {
        Ok(self
            .points
            .values()
            .filter(|p| p.location.key == key)
            .max_by(|a, b| a.readings.cmp_observed(&b.readings))
            .cloned())
    }

    fn upsert(&mut self, point: PollutionDataPoint) -> Result<(), CatalogError> {
        if point.id.trim().is_empty() {
            return Err(CatalogError::Invalid("data point id is empty".to_string()));
        }
        validate_point(&point)?;
        self.points.insert(point.id.clone(), point);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, CatalogError> {
        Ok(self.points.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, key: &str, pm25: f64) -> PollutionDataPoint {
        point_at(id, key, pm25, "2025-04-29T10:30:00Z")
    }

    fn point_at(id: &str, key: &str, pm25: f64, timestamp: &str) -> PollutionDataPoint {
        PollutionDataPoint {
            id: id.to_string(),
            location: Location {
                key: key.to_string(),
                name: key.replace('_', " "),
                lat: 21.0,
                lng: 105.8,
            },
            readings: Readings {
                pm25,
                pm10: 20.0,
                no2: 10.0,
                o3: 30.0,
                timestamp: timestamp.to_string(),
            },
        }
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut store = InMemoryReadingStore::new();
        store.upsert(point("1", "Ha_Noi", 10.0)).unwrap();
        store.upsert(point("1", "Ha_Noi", 40.0)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("1").unwrap().unwrap().readings.pm25, 40.0);
    }

    #[test]
    fn find_by_key_and_delete() {
        let mut store = InMemoryReadingStore::new();
        store.upsert(point("1", "Ha_Noi", 10.0)).unwrap();
        store.upsert(point("2", "Da_Nang", 10.0)).unwrap();
        assert_eq!(store.find_by_key("Da_Nang").unwrap().unwrap().id, "2");
        assert!(store.delete("2").unwrap());
        assert!(!store.delete("2").unwrap());
        assert!(store.find_by_key("Da_Nang").unwrap().is_none());
    }

    #[test]
    fn find_by_key_prefers_newest_reading() {
        let mut store = InMemoryReadingStore::new();
        store.upsert(point_at("a", "Ha_Noi", 10.0, "2025-04-29T12:00:00Z")).unwrap();
        store.upsert(point_at("b", "Ha_Noi", 20.0, "2025-04-29T10:30:00Z")).unwrap();
        store.upsert(point_at("c", "Ha_Noi", 30.0, "2025-04-29T18:00:00+07:00")).unwrap();
        assert_eq!(store.find_by_key("Ha_Noi").unwrap().unwrap().id, "a");
    }

    #[test]
    fn rejects_empty_id_and_bad_values() {
        let mut store = InMemoryReadingStore::new();
        assert!(matches!(
            store.upsert(point("", "Ha_Noi", 10.0)),
            Err(CatalogError::Invalid(_))
        ));
        assert!(matches!(
            store.upsert(point("1", "Ha_Noi", f64::NAN)),
            Err(CatalogError::Invalid(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn loads_sample_dataset() {
        let dataset = Dataset::sample().unwrap();
        let store = InMemoryReadingStore::from_dataset(&dataset).unwrap();
        assert_eq!(store.len(), dataset.readings.len());
        assert!(store.find_by_key("Ha_Noi").unwrap().is_some());
    }
}
