use crate::pollutant::Pollutant;
use crate::tier::SeverityTier;

/// Upper (exclusive) breakpoint of each tier in µg/m³, `Good` first.
///
/// The final entry is always `f64::INFINITY`; breakpoints strictly increase.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ThresholdTable {
    pub pollutant: Pollutant,
    breakpoints: [f64; 6],
}

pub const PM25_THRESHOLDS: ThresholdTable = ThresholdTable {
    pollutant: Pollutant::Pm25,
    breakpoints: [12.0, 35.5, 55.5, 150.5, 250.5, f64::INFINITY],
};

pub const PM10_THRESHOLDS: ThresholdTable = ThresholdTable {
    pollutant: Pollutant::Pm10,
    breakpoints: [55.0, 155.0, 255.0, 355.0, 425.0, f64::INFINITY],
};

pub const NO2_THRESHOLDS: ThresholdTable = ThresholdTable {
    pollutant: Pollutant::No2,
    breakpoints: [54.0, 101.0, 361.0, 650.0, 1250.0, f64::INFINITY],
};

pub const O3_THRESHOLDS: ThresholdTable = ThresholdTable {
    pollutant: Pollutant::O3,
    breakpoints: [55.0, 105.0, 165.0, 205.0, 405.0, f64::INFINITY],
};

impl ThresholdTable {
    pub const fn for_pollutant(pollutant: Pollutant) -> &'static ThresholdTable {
        match pollutant {
            Pollutant::Pm25 => &PM25_THRESHOLDS,
            Pollutant::Pm10 => &PM10_THRESHOLDS,
            Pollutant::No2 => &NO2_THRESHOLDS,
            Pollutant::O3 => &O3_THRESHOLDS,
        }
    }

    /// Exclusive upper bound of `tier`.
    pub const fn breakpoint(&self, tier: SeverityTier) -> f64 {
        self.breakpoints[tier.index()]
    }

    /// The five finite breakpoints, `Good` first.
    pub fn finite_breakpoints(&self) -> &[f64] {
        &self.breakpoints[..5]
    }

    /// Half-open `[lower, upper)` concentration range of `tier`.
    pub fn range(&self, tier: SeverityTier) -> (f64, f64) {
        let lower = match tier.milder() {
            Some(prev) => self.breakpoint(prev),
            None => 0.0,
        };
        (lower, self.breakpoint(tier))
    }

    /// First tier whose breakpoint is strictly greater than `concentration`.
    ///
    /// A value equal to a breakpoint therefore lands in the next more severe
    /// tier. Values past every finite breakpoint (and `+inf`) are `Hazardous`.
    pub fn tier_for(&self, concentration: f64) -> SeverityTier {
        for tier in SeverityTier::ALL {
            if concentration < self.breakpoint(tier) {
                return tier;
            }
        }
        SeverityTier::Hazardous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_strictly_increase() {
        for p in Pollutant::ALL {
            let table = ThresholdTable::for_pollutant(p);
            assert_eq!(table.pollutant, p);
            let bps = &table.breakpoints;
            for w in bps.windows(2) {
                assert!(w[0] < w[1], "{p}: {} !< {}", w[0], w[1]);
            }
            assert!(bps[0] >= 0.0);
            assert!(bps[5].is_infinite());
        }
    }

    #[test]
    fn ranges_tile_the_axis() {
        let table = ThresholdTable::for_pollutant(Pollutant::Pm10);
        assert_eq!(table.range(SeverityTier::Good), (0.0, 55.0));
        assert_eq!(table.range(SeverityTier::Moderate), (55.0, 155.0));
        let (lo, hi) = table.range(SeverityTier::Hazardous);
        assert_eq!(lo, 425.0);
        assert!(hi.is_infinite());
    }

    #[test]
    fn exact_breakpoint_moves_to_next_tier() {
        let table = ThresholdTable::for_pollutant(Pollutant::No2);
        assert_eq!(table.tier_for(53.99), SeverityTier::Good);
        assert_eq!(table.tier_for(54.0), SeverityTier::Moderate);
        assert_eq!(table.tier_for(1250.0), SeverityTier::Hazardous);
    }
}
