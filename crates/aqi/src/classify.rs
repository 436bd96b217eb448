use serde::{Serialize, Serializer};

use crate::palette::{Color, UNKNOWN_COLOR, tier_color};
use crate::pollutant::Pollutant;
use crate::thresholds::ThresholdTable;
use crate::tier::{SeverityTier, UNKNOWN_LABEL};

/// Result of classifying one concentration.
///
/// `tier == None` is the `Unknown` sentinel: a displayable result, not a
/// failure. It is produced for unrecognised pollutant keys and for `NaN`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Classification {
    #[serde(serialize_with = "serialize_tier")]
    pub tier: Option<SeverityTier>,
    pub label: &'static str,
    pub color: Color,
}

fn serialize_tier<S: Serializer>(tier: &Option<SeverityTier>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(tier.map(SeverityTier::key).unwrap_or("unknown"))
}

impl Classification {
    pub const UNKNOWN: Classification = Classification {
        tier: None,
        label: UNKNOWN_LABEL,
        color: UNKNOWN_COLOR,
    };

    pub const fn from_tier(tier: SeverityTier) -> Self {
        Self {
            tier: Some(tier),
            label: tier.label(),
            color: tier_color(tier),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.tier.is_none()
    }
}

pub fn classify(pollutant: Pollutant, concentration: f64) -> Classification {
    if concentration.is_nan() {
        return Classification::UNKNOWN;
    }
    let tier = ThresholdTable::for_pollutant(pollutant).tier_for(concentration);
    Classification::from_tier(tier)
}

/// Like [`classify`], keyed by the pollutant's string name.
pub fn classify_key(key: &str, concentration: f64) -> Classification {
    match Pollutant::from_key(key) {
        Some(p) => classify(p, concentration),
        None => Classification::UNKNOWN,
    }
}

/// Worst tier across several pollutant readings.
///
/// Entries that classify as `Unknown` are skipped; if nothing remains the
/// result is `Unknown`.
pub fn overall<I>(readings: I) -> Classification
where
    I: IntoIterator<Item = (Pollutant, f64)>,
{
    readings
        .into_iter()
        .filter_map(|(p, v)| classify(p, v).tier)
        .max()
        .map(Classification::from_tier)
        .unwrap_or(Classification::UNKNOWN)
}

/// Simplified index shown on dashboard cards: the concentration scaled by a
/// per-pollutant factor and rounded. This is not the EPA piecewise-linear AQI.
pub fn approximate_index(pollutant: Pollutant, concentration: f64) -> u32 {
    if concentration.is_nan() || concentration <= 0.0 {
        return 0;
    }
    let factor = match pollutant {
        Pollutant::Pm25 => 4.5,
        Pollutant::Pm10 => 2.5,
        Pollutant::No2 => 0.8,
        Pollutant::O3 => 1.2,
    };
    // `as` saturates for out-of-range floats.
    (concentration * factor).round() as u32
}
