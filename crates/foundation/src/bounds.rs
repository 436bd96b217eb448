use crate::geo::LonLat;

/// Axis-aligned lon/lat box (degrees). Does not handle antimeridian wrap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LonLatBounds {
    pub min: LonLat,
    pub max: LonLat,
}

impl LonLatBounds {
    /// Generous box around mainland Vietnam and its offshore islands.
    pub const VIETNAM: LonLatBounds = LonLatBounds {
        min: LonLat::new(102.0, 8.0),
        max: LonLat::new(117.5, 23.5),
    };

    pub fn new(min: LonLat, max: LonLat) -> Self {
        LonLatBounds { min, max }
    }

    pub fn from_point(p: LonLat) -> Self {
        LonLatBounds { min: p, max: p }
    }

    pub fn from_points<I: IntoIterator<Item = LonLat>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, p: LonLat) {
        self.min.lon = self.min.lon.min(p.lon);
        self.min.lat = self.min.lat.min(p.lat);
        self.max.lon = self.max.lon.max(p.lon);
        self.max.lat = self.max.lat.max(p.lat);
    }

    pub fn contains(&self, p: LonLat) -> bool {
        p.lon >= self.min.lon
            && p.lon <= self.max.lon
            && p.lat >= self.min.lat
            && p.lat <= self.max.lat
    }

    /// `[west, south, east, north]`.
    pub fn as_array(&self) -> [f64; 4] {
        [self.min.lon, self.min.lat, self.max.lon, self.max.lat]
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.min.lon + self.max.lon) * 0.5,
            (self.min.lat + self.max.lat) * 0.5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_covers_all() {
        let pts = [
            LonLat::new(105.8, 21.0),
            LonLat::new(106.7, 10.8),
            LonLat::new(108.2, 16.0),
        ];
        let b = LonLatBounds::from_points(pts).unwrap();
        assert_eq!(b.min, LonLat::new(105.8, 10.8));
        assert_eq!(b.max, LonLat::new(108.2, 21.0));
        assert!(pts.iter().all(|p| b.contains(*p)));
        let c = b.center();
        assert!((c.lon - 107.0).abs() < 1e-9 && (c.lat - 15.9).abs() < 1e-9);
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(LonLatBounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn vietnam_box_contains_hanoi_not_bangkok() {
        assert!(LonLatBounds::VIETNAM.contains(LonLat::new(105.8419, 21.0022)));
        assert!(!LonLatBounds::VIETNAM.contains(LonLat::new(100.5, 13.75)));
    }
}
