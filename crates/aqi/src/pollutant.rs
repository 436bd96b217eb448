use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pollutants tracked by the atlas. Concentrations are always in µg/m³.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    No2,
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 4] = [Pollutant::Pm25, Pollutant::Pm10, Pollutant::No2, Pollutant::O3];

    /// Wire/storage key (`pm25`, `pm10`, `no2`, `o3`).
    pub const fn key(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::No2 => "no2",
            Pollutant::O3 => "o3",
        }
    }

    /// Display label for table headers and legends.
    pub const fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::No2 => "NO₂",
            Pollutant::O3 => "O₃",
        }
    }

    /// Lenient key lookup. Returns `None` for anything unrecognised so callers
    /// can fall back to the `Unknown` classification.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        match key.as_str() {
            "pm25" | "pm2.5" | "pm2_5" => Some(Pollutant::Pm25),
            "pm10" => Some(Pollutant::Pm10),
            "no2" => Some(Pollutant::No2),
            "o3" => Some(Pollutant::O3),
            _ => None,
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPollutant(pub String);

impl fmt::Display for UnknownPollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown pollutant: {:?}", self.0)
    }
}

impl std::error::Error for UnknownPollutant {}

impl FromStr for Pollutant {
    type Err = UnknownPollutant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pollutant::from_key(s).ok_or_else(|| UnknownPollutant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::Pollutant;

    #[test]
    fn keys_round_trip_through_from_key() {
        for p in Pollutant::ALL {
            assert_eq!(Pollutant::from_key(p.key()), Some(p));
        }
    }

    #[test]
    fn accepts_common_pm25_spellings() {
        assert_eq!(Pollutant::from_key("PM2.5"), Some(Pollutant::Pm25));
        assert_eq!(Pollutant::from_key(" pm2_5 "), Some(Pollutant::Pm25));
    }

    #[test]
    fn parse_reports_unknown_key() {
        let err = "xyz".parse::<Pollutant>().unwrap_err();
        assert_eq!(err.to_string(), "unknown pollutant: \"xyz\"");
    }

    #[test]
    fn serializes_as_lowercase_key() {
        let json = serde_json::to_string(&Pollutant::No2).unwrap();
        assert_eq!(json, "\"no2\"");
    }
}
