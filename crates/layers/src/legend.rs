use std::fmt;
use std::str::FromStr;

use aqi::{Color, Pollutant, SeverityTier, ThresholdTable, tier_color};
use catalog::PollutionDataPoint;
use serde::Serialize;

/// Human-readable concentration range of a tier, e.g. `12–35.5 µg/m³`.
pub fn range_text(pollutant: Pollutant, tier: SeverityTier) -> String {
    let (lower, upper) = ThresholdTable::for_pollutant(pollutant).range(tier);
    if upper.is_infinite() {
        format!("≥ {lower} µg/m³")
    } else {
        format!("{lower}–{upper} µg/m³")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub tier: SeverityTier,
    pub label: &'static str,
    pub color: Color,
    pub range: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub pollutant: Pollutant,
    pub title: &'static str,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn for_pollutant(pollutant: Pollutant) -> Self {
        let entries = SeverityTier::ALL
            .into_iter()
            .map(|tier| LegendEntry {
                tier,
                label: tier.label(),
                color: tier_color(tier),
                range: range_text(pollutant, tier),
            })
            .collect();
        Self {
            pollutant,
            title: pollutant.label(),
            entries,
        }
    }
}

/// A (pollutant, tier) selection used to highlight matching locations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BandFilter {
    pub pollutant: Pollutant,
    pub tier: SeverityTier,
}

impl BandFilter {
    pub const fn new(pollutant: Pollutant, tier: SeverityTier) -> Self {
        Self { pollutant, tier }
    }

    /// Every pollutant/tier combination, pollutant-major.
    pub fn all() -> Vec<BandFilter> {
        Pollutant::ALL
            .into_iter()
            .flat_map(|p| SeverityTier::ALL.into_iter().map(move |t| BandFilter::new(p, t)))
            .collect()
    }

    pub fn label(&self) -> String {
        format!("{} ({})", self.tier.label(), range_text(self.pollutant, self.tier))
    }

    pub fn color(&self) -> Color {
        tier_color(self.tier)
    }

    /// Agrees with the classifier, including its breakpoint rule.
    pub fn matches_value(&self, concentration: f64) -> bool {
        aqi::classify(self.pollutant, concentration).tier == Some(self.tier)
    }

    pub fn matches(&self, point: &PollutionDataPoint) -> bool {
        self.matches_value(point.value(self.pollutant))
    }
}

impl fmt::Display for BandFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pollutant.key(), self.tier.key())
    }
}

impl FromStr for BandFilter {
    type Err = String;

    /// Parses `pollutant:tier`, e.g. `pm25:moderate`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (p, t) = s
            .split_once(':')
            .ok_or_else(|| format!("expected pollutant:tier, got {s:?}"))?;
        let pollutant = Pollutant::from_key(p).ok_or_else(|| format!("unknown pollutant {p:?}"))?;
        let tier = SeverityTier::from_key(t).ok_or_else(|| format!("unknown tier {t:?}"))?;
        Ok(BandFilter::new(pollutant, tier))
    }
}
