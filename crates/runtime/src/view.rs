use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Camera presets for the factory map.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewType {
    TopDown,
    Isometric,
    Side,
    #[default]
    Bird,
}

impl ViewType {
    pub const ALL: [ViewType; 4] = [
        ViewType::TopDown,
        ViewType::Isometric,
        ViewType::Side,
        ViewType::Bird,
    ];

    /// `(pitch, bearing)` in degrees.
    pub const fn angles(self) -> (f64, f64) {
        match self {
            ViewType::TopDown => (0.0, 0.0),
            ViewType::Isometric => (45.0, 45.0),
            ViewType::Side => (85.0, 90.0),
            ViewType::Bird => (60.0, 30.0),
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            ViewType::TopDown => "topDown",
            ViewType::Isometric => "isometric",
            ViewType::Side => "side",
            ViewType::Bird => "bird",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        ViewType::ALL
            .into_iter()
            .find(|v| v.key().to_ascii_lowercase() == norm)
            .ok_or_else(|| format!("unknown view type {s:?}"))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl ViewState {
    /// Central Hanoi, looking down at the bird preset.
    pub fn initial() -> Self {
        Self {
            longitude: 105.8419,
            latitude: 21.0022,
            zoom: 14.0,
            pitch: 0.0,
            bearing: 0.0,
        }
        .with_preset(ViewType::Bird)
    }

    /// Keeps position and zoom, replaces pitch and bearing.
    pub fn with_preset(self, view: ViewType) -> Self {
        let (pitch, bearing) = view.angles();
        Self {
            pitch,
            bearing,
            ..self
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::initial()
    }
}
