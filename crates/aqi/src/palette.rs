use std::fmt;

use serde::{Serialize, Serializer};

use crate::tier::SeverityTier;

/// A palette colour. The hex form is what UIs display; `rgb` feeds renderers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub hex: &'static str,
    pub rgb: [u8; 3],
}

impl Color {
    pub const fn new(hex: &'static str, rgb: [u8; 3]) -> Self {
        Self { hex, rgb }
    }

    /// Normalised RGBA for GPU style uniforms.
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.rgb[0] as f32 / 255.0,
            self.rgb[1] as f32 / 255.0,
            self.rgb[2] as f32 / 255.0,
            alpha,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex)
    }
}

// Sky blue → green → yellow → orange → red → purple, indexed by tier.
const TIER_COLORS: [Color; 6] = [
    Color::new("#38BDF8", [0x38, 0xBD, 0xF8]),
    Color::new("#4ADE80", [0x4A, 0xDE, 0x80]),
    Color::new("#FACC15", [0xFA, 0xCC, 0x15]),
    Color::new("#FB923C", [0xFB, 0x92, 0x3C]),
    Color::new("#EF4444", [0xEF, 0x44, 0x44]),
    Color::new("#9333EA", [0x93, 0x33, 0xEA]),
];

pub const UNKNOWN_COLOR: Color = Color::new("#CCCCCC", [0xCC, 0xCC, 0xCC]);

pub const fn tier_color(tier: SeverityTier) -> Color {
    TIER_COLORS[tier.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_hex(hex: &str) -> [u8; 3] {
        let h = hex.trim_start_matches('#');
        [
            u8::from_str_radix(&h[0..2], 16).unwrap(),
            u8::from_str_radix(&h[2..4], 16).unwrap(),
            u8::from_str_radix(&h[4..6], 16).unwrap(),
        ]
    }

    #[test]
    fn rgb_bytes_agree_with_hex() {
        for tier in SeverityTier::ALL {
            let c = tier_color(tier);
            assert_eq!(parse_hex(c.hex), c.rgb, "{tier:?}");
        }
        assert_eq!(parse_hex(UNKNOWN_COLOR.hex), UNKNOWN_COLOR.rgb);
    }

    #[test]
    fn palette_is_one_to_one() {
        let mut hexes: Vec<_> = SeverityTier::ALL.iter().map(|t| tier_color(*t).hex).collect();
        hexes.sort();
        hexes.dedup();
        assert_eq!(hexes.len(), 6);
    }

    #[test]
    fn rgba_is_normalised() {
        let rgba = tier_color(SeverityTier::Hazardous).to_rgba(0.5);
        assert!((rgba[0] - 0x93 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(rgba[3], 0.5);
    }
}
