use std::cmp::Ordering;

use aqi::Pollutant;
use chrono::{DateTime, FixedOffset};
use foundation::LonLat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Province/mesh key, underscored (`Ha_Noi`).
    pub key: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn lon_lat(&self) -> LonLat {
        LonLat::new(self.lng, self.lat)
    }
}

/// One set of concentrations in µg/m³.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub pm25: f64,
    pub pm10: f64,
    pub no2: f64,
    pub o3: f64,
    /// RFC 3339.
    pub timestamp: String,
}

impl Readings {
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    pub fn overall(&self) -> aqi::Classification {
        aqi::overall(self.iter())
    }

    /// `None` when the timestamp is not valid RFC 3339.
    pub fn observed_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.timestamp.trim()).ok()
    }

    /// Orders by instant, so offsets are honoured. Unparseable timestamps
    /// sort before parseable ones and compare as text among themselves.
    pub fn cmp_observed(&self, other: &Readings) -> Ordering {
        match (self.observed_at(), other.observed_at()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.timestamp.cmp(&other.timestamp),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutionDataPoint {
    #[serde(default)]
    pub id: String,
    pub location: Location,
    pub readings: Readings,
}

impl PollutionDataPoint {
    pub fn value(&self, pollutant: Pollutant) -> f64 {
        self.readings.get(pollutant)
    }

    pub fn classify(&self, pollutant: Pollutant) -> aqi::Classification {
        aqi::classify(pollutant, self.value(pollutant))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactoryStatus {
    Available,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    pub id: String,
    pub name: String,
    /// `[lon, lat, altitude_m]`.
    pub coordinates: [f64; 3],
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: FactoryStatus,
    pub city: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct EmissionEstimate {
    /// Relative emission level in `35..=99`.
    pub level: u32,
    pub dominant: Pollutant,
}

impl Factory {
    pub fn lon_lat(&self) -> LonLat {
        LonLat::new(self.coordinates[0], self.coordinates[1])
    }

    /// Deterministic placeholder emission figures seeded by the id's first and
    /// last characters. Factories carry no measured data of their own.
    pub fn emission_estimate(&self) -> Option<EmissionEstimate> {
        let first = self.id.chars().next()? as u32;
        let last = self.id.chars().next_back()? as u32;
        let seed = first + last;
        Some(EmissionEstimate {
            level: seed % 65 + 35,
            dominant: Pollutant::ALL[(seed % Pollutant::ALL.len() as u32) as usize],
        })
    }
}
