use aqi::{Classification, Pollutant};
use catalog::PollutionDataPoint;
use serde::Serialize;

use crate::layer::{Layer, LayerId};
use crate::legend::BandFilter;
use crate::symbology::{
    DEFAULT_PROVINCE_COLOR, HOVER_ELEVATION, INACTIVE_PROVINCE_COLOR, LayerStyle,
};

/// Interaction state that affects province styling.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ProvinceView<'a> {
    /// Selected province key.
    pub active: Option<&'a str>,
    pub hovered: Option<&'a str>,
    pub filter: Option<BandFilter>,
}

impl ProvinceView<'_> {
    fn is_raised(&self, key: &str) -> bool {
        self.active == Some(key) || self.hovered == Some(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceFeature {
    pub id: String,
    pub key: String,
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    /// Unit-sphere position scaled by `1 + lift`.
    pub globe_position: [f64; 3],
    pub value: f64,
    pub index: u32,
    pub classification: Classification,
    pub highlighted: bool,
    pub style: LayerStyle,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ProvinceLayerSnapshot {
    pub features: Vec<ProvinceFeature>,
}

/// Choropleth of one pollutant over province readings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ProvinceLayer {
    id: LayerId,
    pollutant: Pollutant,
}

impl ProvinceLayer {
    pub fn new(id: u64, pollutant: Pollutant) -> Self {
        Self {
            id: LayerId(id),
            pollutant,
        }
    }

    pub fn pollutant(&self) -> Pollutant {
        self.pollutant
    }

    /// Style for the province mesh `key`, which may have no reading.
    pub fn style_for(
        &self,
        key: &str,
        point: Option<&PollutionDataPoint>,
        view: &ProvinceView<'_>,
    ) -> LayerStyle {
        let color = match point {
            None => DEFAULT_PROVINCE_COLOR,
            Some(p) => match view.filter {
                Some(f) if !f.matches(p) => INACTIVE_PROVINCE_COLOR,
                _ => p.classify(self.pollutant).color,
            },
        };
        let style = LayerStyle::filled(color);
        if view.is_raised(key) {
            style.lifted(HOVER_ELEVATION)
        } else {
            style
        }
    }

    pub fn extract(
        &self,
        points: &[PollutionDataPoint],
        view: &ProvinceView<'_>,
    ) -> ProvinceLayerSnapshot {
        let features = points
            .iter()
            .map(|p| {
                let value = p.value(self.pollutant);
                let style = self.style_for(&p.location.key, Some(p), view);
                let lift = 1.0 + style.lift as f64;
                let [x, y, z] = p.location.lon_lat().to_unit_sphere();
                ProvinceFeature {
                    id: p.id.clone(),
                    key: p.location.key.clone(),
                    name: p.location.name.clone(),
                    lon: p.location.lng,
                    lat: p.location.lat,
                    globe_position: [x * lift, y * lift, z * lift],
                    value,
                    index: aqi::approximate_index(self.pollutant, value),
                    classification: p.classify(self.pollutant),
                    highlighted: view.filter.is_some_and(|f| f.matches(p)),
                    style,
                }
            })
            .collect();
        ProvinceLayerSnapshot { features }
    }
}

impl Layer for ProvinceLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "provinces"
    }
}
