use aqi::Color;
use catalog::{EmissionEstimate, Factory, FactoryStatus};
use foundation::{LonLat, LonLatBounds};
use serde::Serialize;

use crate::layer::{Layer, LayerId};

pub const LOW_POLLUTION_COLOR: Color = Color::new("#38A169", [0x38, 0xA1, 0x69]);
pub const HIGH_POLLUTION_COLOR: Color = Color::new("#E53E3E", [0xE5, 0x3E, 0x3E]);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerLevel {
    pub label: &'static str,
    pub color: Color,
    pub description: &'static str,
}

impl MarkerLevel {
    pub const fn for_status(status: FactoryStatus) -> Self {
        match status {
            FactoryStatus::Available => MarkerLevel {
                label: "Low Pollution",
                color: LOW_POLLUTION_COLOR,
                description: "Air quality is acceptable",
            },
            FactoryStatus::Full => MarkerLevel {
                label: "High Pollution",
                color: HIGH_POLLUTION_COLOR,
                description: "Air quality is hazardous",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactoryMarker {
    pub id: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    /// WGS84 ECEF position in metres, including the site altitude.
    pub ecef: [f64; 3],
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: FactoryStatus,
    pub level: MarkerLevel,
    pub emission: Option<EmissionEstimate>,
}

impl FactoryMarker {
    pub fn for_factory(factory: &Factory) -> Self {
        let pos = factory.lon_lat();
        Self {
            id: factory.id.clone(),
            name: factory.name.clone(),
            lon: pos.lon,
            lat: pos.lat,
            ecef: pos.to_ecef(factory.coordinates[2]).as_array(),
            address: factory.address.clone(),
            phone: factory.phone.clone(),
            status: factory.status,
            level: MarkerLevel::for_status(factory.status),
            emission: factory.emission_estimate(),
        }
    }

    /// e.g. `PM10 Emission: 56 µg/m³`.
    pub fn emission_text(&self) -> Option<String> {
        self.emission
            .map(|e| format!("{} Emission: {} µg/m³", e.dominant.label(), e.level))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FactoryLayerSnapshot {
    pub markers: Vec<FactoryMarker>,
    /// `[west, south, east, north]` of all markers, for fitting the camera.
    pub bounds: Option<[f64; 4]>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FactoryLayer {
    id: LayerId,
    pub status: Option<FactoryStatus>,
}

impl FactoryLayer {
    pub fn new(id: u64) -> Self {
        Self {
            id: LayerId(id),
            status: None,
        }
    }

    pub fn with_status(mut self, status: FactoryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn extract(&self, factories: &[Factory]) -> FactoryLayerSnapshot {
        let markers: Vec<FactoryMarker> = factories
            .iter()
            .filter(|f| self.status.is_none_or(|s| f.status == s))
            .map(FactoryMarker::for_factory)
            .collect();
        let bounds =
            LonLatBounds::from_points(markers.iter().map(|m| LonLat::new(m.lon, m.lat)))
                .map(|b| b.as_array());
        FactoryLayerSnapshot { markers, bounds }
    }
}

impl Layer for FactoryLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "factories"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Dataset;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_picks_marker_level() {
        assert_eq!(MarkerLevel::for_status(FactoryStatus::Available).label, "Low Pollution");
        assert_eq!(MarkerLevel::for_status(FactoryStatus::Available).color.hex, "#38A169");
        assert_eq!(MarkerLevel::for_status(FactoryStatus::Full).label, "High Pollution");
        assert_eq!(MarkerLevel::for_status(FactoryStatus::Full).color.hex, "#E53E3E");
    }

    #[test]
    fn markers_carry_emission_estimates() {
        let dataset = Dataset::sample().unwrap();
        let snap = FactoryLayer::new(3).extract(&dataset.factories);
        assert_eq!(snap.markers.len(), dataset.factories.len());
        let f1 = snap.markers.iter().find(|m| m.id == "f1").unwrap();
        // 'f' (102) + '1' (49) = 151 -> level 56, dominant index 3
        assert_eq!(f1.emission_text().unwrap(), "O₃ Emission: 56 µg/m³");
        let radius = foundation::Ecef::new(f1.ecef[0], f1.ecef[1], f1.ecef[2]).length();
        assert!((6_370_000.0..6_385_000.0).contains(&radius));
        let [west, south, east, north] = snap.bounds.unwrap();
        assert!(
            snap.markers
                .iter()
                .all(|m| (west..=east).contains(&m.lon) && (south..=north).contains(&m.lat))
        );
    }

    #[test]
    fn status_filter_limits_markers() {
        let dataset = Dataset::sample().unwrap();
        let layer = FactoryLayer::new(3).with_status(FactoryStatus::Full);
        let snap = layer.extract(&dataset.factories);
        assert!(!snap.markers.is_empty());
        assert!(snap.markers.iter().all(|m| m.status == FactoryStatus::Full));
        assert!(FactoryLayer::new(3).extract(&[]).bounds.is_none());
    }
}
