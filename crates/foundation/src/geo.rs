use crate::geodesy::{Ecef, geodetic_to_ecef};

/// Geographic position in degrees (WGS84).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    pub fn to_ecef(self, alt_m: f64) -> Ecef {
        geodetic_to_ecef(self.lat.to_radians(), self.lon.to_radians(), alt_m)
    }

    /// Position on a unit sphere, Z up, for globe scenes that do not care
    /// about ellipsoid flattening.
    pub fn to_unit_sphere(self) -> [f64; 3] {
        let (sin_lat, cos_lat) = self.lat.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.lon.to_radians().sin_cos();
        [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
    }
}
