use std::collections::HashSet;

use aqi::Pollutant;
use serde::Serialize;

use crate::layer::{Layer, LayerId};
use crate::provinces::ProvinceFeature;
use crate::symbology::{LABEL_DARK, LABEL_LIGHT};

/// `Ha_Noi` -> `Ha Noi`.
pub fn format_province_name(key: &str) -> String {
    key.replace('_', " ")
}

/// One decimal place, e.g. `12.4 µg/m³`.
pub fn format_concentration(value: f64) -> String {
    format!("{value:.1} µg/m³")
}

/// Second label line, e.g. `PM2.5: 60.0 µg/m³ · AQI 270 - Unhealthy`.
pub fn pollution_text(pollutant: Pollutant, value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return "No data available".to_string();
    };
    let classification = aqi::classify(pollutant, value);
    format!(
        "{}: {} · AQI {} - {}",
        pollutant.label(),
        format_concentration(value),
        aqi::approximate_index(pollutant, value),
        classification.label
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelStyle {
    pub font_size_px: f32,
    pub color: [f32; 4],
    pub halo_color: [f32; 4],
    pub halo_width_px: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size_px: 14.0,
            color: LABEL_LIGHT.to_rgba(1.0),
            halo_color: [0.0, 0.0, 0.0, 0.85],
            halo_width_px: 2.0,
        }
    }
}

impl LabelStyle {
    /// Dark text on the raised, selected province.
    pub fn active() -> Self {
        Self {
            color: LABEL_DARK.to_rgba(1.0),
            halo_color: [1.0, 1.0, 1.0, 0.85],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelAnchor {
    pub key: String,
    pub title: String,
    pub detail: String,
    pub position: [f64; 3],
    pub priority: f32,
    pub style: LabelStyle,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LabelsLayerSnapshot {
    pub labels: Vec<LabelAnchor>,
}

/// Province name plus pollution line, anchored above each province.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelsLayer {
    id: LayerId,
    pollutant: Pollutant,
    pub max_labels: usize,
}

impl LabelsLayer {
    pub fn new(id: u64, pollutant: Pollutant) -> Self {
        Self {
            id: LayerId(id),
            pollutant,
            max_labels: 400,
        }
    }

    /// Highest concentration first; the active province always leads.
    pub fn extract(
        &self,
        features: &[ProvinceFeature],
        active: Option<&str>,
    ) -> LabelsLayerSnapshot {
        let mut labels: Vec<LabelAnchor> = features
            .iter()
            .map(|f| {
                let is_active = active == Some(f.key.as_str());
                let priority = if is_active {
                    f32::MAX
                } else if f.value.is_finite() {
                    f.value as f32
                } else {
                    0.0
                };
                LabelAnchor {
                    key: f.key.clone(),
                    title: format_province_name(&f.key),
                    detail: pollution_text(self.pollutant, Some(f.value)),
                    position: f.globe_position,
                    priority,
                    style: if is_active {
                        LabelStyle::active()
                    } else {
                        LabelStyle::default()
                    },
                }
            })
            .collect();

        labels.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        labels.truncate(self.max_labels);
        LabelsLayerSnapshot { labels }
    }
}

impl Layer for LabelsLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "labels"
    }
}

pub trait LabelProjector {
    fn project(&self, world: [f64; 3]) -> Option<[f32; 2]>;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LabelLayoutConfig {
    pub viewport_px: [f32; 2],
    pub cell_px: f32,
    pub padding_px: f32,
    pub max_labels: usize,
}

impl Default for LabelLayoutConfig {
    fn default() -> Self {
        Self {
            viewport_px: [1.0, 1.0],
            cell_px: 32.0,
            padding_px: 4.0,
            max_labels: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel2D {
    pub key: String,
    pub text: String,
    pub screen_pos_px: [f32; 2],
    pub size_px: [f32; 2],
    pub priority: f32,
}

/// Greedy screen-space placement in priority order. Labels whose padded box
/// touches an occupied grid cell are dropped.
pub fn layout_labels_2d<P: LabelProjector>(
    labels: &[LabelAnchor],
    projector: &P,
    config: LabelLayoutConfig,
) -> Vec<PlacedLabel2D> {
    let mut out = Vec::new();
    let mut occupied: HashSet<(i32, i32)> = HashSet::new();

    for label in labels {
        if out.len() >= config.max_labels {
            break;
        }

        let Some(screen) = projector.project(label.position) else {
            continue;
        };
        if !screen[0].is_finite() || !screen[1].is_finite() {
            continue;
        }

        let size = estimate_text_size(&label.title, &label.style);
        let half_w = size[0] * 0.5 + config.padding_px;
        let half_h = size[1] * 0.5 + config.padding_px;

        if screen[0] + half_w < 0.0
            || screen[1] + half_h < 0.0
            || screen[0] - half_w > config.viewport_px[0]
            || screen[1] - half_h > config.viewport_px[1]
        {
            continue;
        }

        if !try_place_label(&mut occupied, screen, [half_w, half_h], config.cell_px) {
            continue;
        }

        out.push(PlacedLabel2D {
            key: label.key.clone(),
            text: label.title.clone(),
            screen_pos_px: screen,
            size_px: size,
            priority: label.priority,
        });
    }

    out
}

fn estimate_text_size(text: &str, style: &LabelStyle) -> [f32; 2] {
    let count = text.chars().count().max(1) as f32;
    [style.font_size_px * 0.6 * count, style.font_size_px]
}

fn try_place_label(
    occupied: &mut HashSet<(i32, i32)>,
    screen: [f32; 2],
    half_size: [f32; 2],
    cell_px: f32,
) -> bool {
    let min_x = ((screen[0] - half_size[0]) / cell_px).floor() as i32;
    let max_x = ((screen[0] + half_size[0]) / cell_px).floor() as i32;
    let min_y = ((screen[1] - half_size[1]) / cell_px).floor() as i32;
    let max_y = ((screen[1] + half_size[1]) / cell_px).floor() as i32;

    let cells: Vec<(i32, i32)> = (min_y..=max_y)
        .flat_map(|cy| (min_x..=max_x).map(move |cx| (cx, cy)))
        .collect();
    if cells.iter().any(|c| occupied.contains(c)) {
        return false;
    }
    occupied.extend(cells);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provinces::{ProvinceLayer, ProvinceView};
    use catalog::Dataset;
    use pretty_assertions::assert_eq;

    struct FlatProjector;

    impl LabelProjector for FlatProjector {
        fn project(&self, world: [f64; 3]) -> Option<[f32; 2]> {
            Some([world[0] as f32, world[1] as f32])
        }
    }

    #[test]
    fn formats_names_and_values() {
        assert_eq!(format_province_name("Thua_Thien_Hue"), "Thua Thien Hue");
        assert_eq!(format_concentration(12.44), "12.4 µg/m³");
        assert_eq!(format_concentration(7.0), "7.0 µg/m³");
    }

    #[test]
    fn pollution_text_includes_index_and_tier() {
        assert_eq!(
            pollution_text(Pollutant::Pm25, Some(48.6)),
            "PM2.5: 48.6 µg/m³ · AQI 219 - Unhealthy for Sensitive Groups"
        );
        assert_eq!(
            pollution_text(Pollutant::No2, Some(12.0)),
            "NO₂: 12.0 µg/m³ · AQI 10 - Good"
        );
        assert_eq!(pollution_text(Pollutant::O3, None), "No data available");
        assert_eq!(pollution_text(Pollutant::O3, Some(f64::NAN)), "No data available");
    }

    #[test]
    fn active_label_leads_with_dark_text() {
        let points = Dataset::sample().unwrap().readings;
        let provinces = ProvinceLayer::new(1, Pollutant::Pm25);
        let features = provinces.extract(&points, &ProvinceView::default()).features;
        let layer = LabelsLayer::new(2, Pollutant::Pm25);

        let snap = layer.extract(&features, Some("Ca_Mau"));
        assert_eq!(snap.labels.len(), features.len());
        assert_eq!(snap.labels[0].key, "Ca_Mau");
        assert_eq!(snap.labels[0].title, "Ca Mau");
        assert_eq!(snap.labels[0].style, LabelStyle::active());
        // Bac Ninh has the highest PM2.5 in the sample.
        assert_eq!(snap.labels[1].key, "Bac_Ninh");
        assert_eq!(snap.labels[1].style.color, LABEL_LIGHT.to_rgba(1.0));
    }

    #[test]
    fn layout_rejects_overlapping_labels() {
        let anchor = |key: &str, priority: f32| LabelAnchor {
            key: key.to_string(),
            title: key.to_string(),
            detail: String::new(),
            position: [50.0, 50.0, 0.0],
            priority,
            style: LabelStyle::default(),
        };
        let labels = vec![anchor("A", 2.0), anchor("B", 1.0)];

        let placed = layout_labels_2d(
            &labels,
            &FlatProjector,
            LabelLayoutConfig {
                viewport_px: [100.0, 100.0],
                cell_px: 24.0,
                padding_px: 2.0,
                max_labels: 10,
            },
        );

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].key, "A");
    }
}
