use aqi::Color;
use serde::Serialize;

/// Fill for provinces with no reading.
pub const DEFAULT_PROVINCE_COLOR: Color = Color::new("#CCCCCC", [0xCC, 0xCC, 0xCC]);
/// Fill for provinces dimmed by an active band filter.
pub const INACTIVE_PROVINCE_COLOR: Color = Color::new("#808080", [0x80, 0x80, 0x80]);

pub const LABEL_LIGHT: Color = Color::new("#FFFFFF", [0xFF, 0xFF, 0xFF]);
pub const LABEL_DARK: Color = Color::new("#111111", [0x11, 0x11, 0x11]);

/// Lift of a hovered or selected province, in globe radii.
pub const HOVER_ELEVATION: f32 = 0.02;
pub const DEFAULT_ELEVATION: f32 = 0.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LayerStyle {
    pub visible: bool,
    pub color: [f32; 4],
    /// Lift as a fraction of the globe radius.
    pub lift: f32,
}

impl LayerStyle {
    pub const fn new(visible: bool, color: [f32; 4], lift: f32) -> Self {
        Self {
            visible,
            color,
            lift,
        }
    }

    pub fn filled(color: Color) -> Self {
        Self::new(true, color.to_rgba(1.0), DEFAULT_ELEVATION)
    }

    pub fn lifted(mut self, lift: f32) -> Self {
        self.lift = lift;
        self
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: [1.0, 1.0, 1.0, 1.0],
            lift: 0.0,
        }
    }
}
