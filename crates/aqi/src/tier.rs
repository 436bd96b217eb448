use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity bands, ordered from least to most severe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Good,
    Moderate,
    Sensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

pub const UNKNOWN_LABEL: &str = "Unknown";

impl SeverityTier {
    pub const ALL: [SeverityTier; 6] = [
        SeverityTier::Good,
        SeverityTier::Moderate,
        SeverityTier::Sensitive,
        SeverityTier::Unhealthy,
        SeverityTier::VeryUnhealthy,
        SeverityTier::Hazardous,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            SeverityTier::Good => "Good",
            SeverityTier::Moderate => "Moderate",
            SeverityTier::Sensitive => "Unhealthy for Sensitive Groups",
            SeverityTier::Unhealthy => "Unhealthy",
            SeverityTier::VeryUnhealthy => "Very Unhealthy",
            SeverityTier::Hazardous => "Hazardous",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            SeverityTier::Good => "good",
            SeverityTier::Moderate => "moderate",
            SeverityTier::Sensitive => "sensitive",
            SeverityTier::Unhealthy => "unhealthy",
            SeverityTier::VeryUnhealthy => "very_unhealthy",
            SeverityTier::Hazardous => "hazardous",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase().replace('-', "_");
        SeverityTier::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Next less severe tier, if any.
    pub const fn milder(self) -> Option<Self> {
        match self {
            SeverityTier::Good => None,
            SeverityTier::Moderate => Some(SeverityTier::Good),
            SeverityTier::Sensitive => Some(SeverityTier::Moderate),
            SeverityTier::Unhealthy => Some(SeverityTier::Sensitive),
            SeverityTier::VeryUnhealthy => Some(SeverityTier::Unhealthy),
            SeverityTier::Hazardous => Some(SeverityTier::VeryUnhealthy),
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::SeverityTier;

    #[test]
    fn ordering_follows_severity() {
        let mut sorted = SeverityTier::ALL;
        sorted.sort();
        assert_eq!(sorted, SeverityTier::ALL);
        assert!(SeverityTier::Good < SeverityTier::Hazardous);
    }

    #[test]
    fn index_matches_position() {
        for (i, t) in SeverityTier::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn key_lookup_accepts_dashes() {
        assert_eq!(
            SeverityTier::from_key("very-unhealthy"),
            Some(SeverityTier::VeryUnhealthy)
        );
        assert_eq!(SeverityTier::from_key("poor"), None);
    }
}
