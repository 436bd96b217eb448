use std::f64::consts::TAU;

use aqi::{Color, Pollutant, SeverityTier, tier_color};
use catalog::{PollutionDataPoint, Summary};
use serde::Serialize;

pub const CHART_HEIGHT: f64 = 4.0;
pub const BAR_WIDTH: f64 = 0.8;
/// Horizontal room per bar; the chart never shrinks below `MIN_CHART_WIDTH`.
pub const BAR_PITCH: f64 = 1.5;
pub const MIN_CHART_WIDTH: f64 = 6.0;
/// Headroom over the largest value when no explicit maximum is given.
pub const AUTO_MAX_HEADROOM: f64 = 1.2;
/// Slice label distance as a fraction of the radius.
pub const PIE_LABEL_RADIUS: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDatum {
    pub label: String,
    pub value: f64,
    pub color: Color,
}

impl ChartDatum {
    pub fn new(label: impl Into<String>, value: f64, color: Color) -> Self {
        Self {
            label: label.into(),
            value,
            color,
        }
    }

    /// One datum per location, coloured by its tier for `pollutant`.
    pub fn from_points(points: &[PollutionDataPoint], pollutant: Pollutant) -> Vec<ChartDatum> {
        points
            .iter()
            .map(|p| {
                ChartDatum::new(
                    p.location.name.clone(),
                    p.value(pollutant),
                    p.classify(pollutant).color,
                )
            })
            .collect()
    }

    /// Number of locations in each tier for `pollutant`. Empty tiers are left out.
    pub fn tier_distribution(
        points: &[PollutionDataPoint],
        pollutant: Pollutant,
    ) -> Vec<ChartDatum> {
        SeverityTier::ALL
            .into_iter()
            .filter_map(|tier| {
                let count = points
                    .iter()
                    .filter(|p| p.classify(pollutant).tier == Some(tier))
                    .count();
                (count > 0).then(|| ChartDatum::new(tier.label(), count as f64, tier_color(tier)))
            })
            .collect()
    }

    /// Pollutant averages, coloured by the tier of each average.
    pub fn from_summary(summary: &Summary) -> Vec<ChartDatum> {
        summary
            .pollutants
            .iter()
            .map(|s| ChartDatum::new(s.label, s.stats.avg, s.classification.color))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: Color,
    /// Bar centre, with the chart centred on x = 0.
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub max_value: f64,
    pub width: f64,
    pub height: f64,
    pub bars: Vec<Bar>,
}

/// Lays out bars evenly across the chart. Heights are relative to
/// `max_value`, or to `1.2 × max(values)` when it is absent or not positive.
pub fn bar_chart(data: &[ChartDatum], max_value: Option<f64>) -> BarChart {
    let n = data.len() as f64;
    let max_value = match max_value {
        Some(m) if m > 0.0 => m,
        _ => data.iter().map(|d| d.value).fold(0.0, f64::max) * AUTO_MAX_HEADROOM,
    };
    let width = (n * BAR_PITCH).max(MIN_CHART_WIDTH);
    let spacing = (width - n * BAR_WIDTH) / (n + 1.0);

    let bars = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let height = if max_value > 0.0 {
                d.value / max_value * CHART_HEIGHT
            } else {
                0.0
            };
            Bar {
                label: d.label.clone(),
                value: d.value,
                color: d.color,
                x: -width / 2.0 + spacing + BAR_WIDTH / 2.0 + i as f64 * (BAR_WIDTH + spacing),
                width: BAR_WIDTH,
                height,
            }
        })
        .collect();

    BarChart {
        max_value,
        width,
        height: CHART_HEIGHT,
        bars,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Color,
    pub fraction: f64,
    /// Radians, counter-clockwise from +x.
    pub start_angle: f64,
    pub sweep: f64,
    /// Label anchor on the unit-radius pie.
    pub label_position: [f64; 2],
    /// e.g. `37.5%`.
    pub percentage: String,
}

/// Slices in input order. A zero or non-finite total yields no slices.
pub fn pie_chart(data: &[ChartDatum]) -> Vec<PieSlice> {
    let total: f64 = data.iter().map(|d| d.value).sum();
    if !total.is_finite() || total <= 0.0 {
        return Vec::new();
    }

    let mut angle = 0.0;
    data.iter()
        .map(|d| {
            let fraction = d.value / total;
            let sweep = fraction * TAU;
            let mid = angle + sweep / 2.0;
            let slice = PieSlice {
                label: d.label.clone(),
                value: d.value,
                color: d.color,
                fraction,
                start_angle: angle,
                sweep,
                label_position: [PIE_LABEL_RADIUS * mid.cos(), PIE_LABEL_RADIUS * mid.sin()],
                percentage: format!("{:.1}%", fraction * 100.0),
            };
            angle += sweep;
            slice
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn data(values: &[f64]) -> Vec<ChartDatum> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ChartDatum::new(format!("d{i}"), *v, tier_color(SeverityTier::Good)))
            .collect()
    }

    #[test]
    fn bar_heights_use_headroom_over_max() {
        let chart = bar_chart(&data(&[10.0, 20.0, 5.0]), None);
        assert!((chart.max_value - 24.0).abs() < 1e-9);
        assert_eq!(chart.width, MIN_CHART_WIDTH);
        let tallest = chart.bars.iter().map(|b| b.height).fold(0.0, f64::max);
        assert!((tallest - 20.0 / 24.0 * CHART_HEIGHT).abs() < 1e-9);
    }

    #[test]
    fn explicit_max_and_wide_charts() {
        let values = vec![50.0; 8];
        let chart = bar_chart(&data(&values), Some(100.0));
        assert_eq!(chart.max_value, 100.0);
        assert_eq!(chart.width, 12.0);
        assert!(chart.bars.iter().all(|b| (b.height - 2.0).abs() < 1e-9));
        // Symmetric about the origin.
        let first = chart.bars.first().unwrap().x;
        let last = chart.bars.last().unwrap().x;
        assert!((first + last).abs() < 1e-9);
    }

    #[test]
    fn all_zero_bars_are_flat() {
        let chart = bar_chart(&data(&[0.0, 0.0]), None);
        assert!(chart.bars.iter().all(|b| b.height == 0.0));
        assert!(bar_chart(&[], None).bars.is_empty());
    }

    #[test]
    fn pie_fractions_cover_the_circle() {
        let slices = pie_chart(&data(&[1.0, 3.0]));
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].percentage, "25.0%");
        assert_eq!(slices[1].percentage, "75.0%");
        assert!((slices[1].start_angle - TAU / 4.0).abs() < 1e-9);
        let swept: f64 = slices.iter().map(|s| s.sweep).sum();
        assert!((swept - TAU).abs() < 1e-9);
    }

    #[test]
    fn zero_total_has_no_slices() {
        assert!(pie_chart(&data(&[0.0, 0.0])).is_empty());
        assert!(pie_chart(&[]).is_empty());
    }

    #[test]
    fn summary_chart_has_one_bar_per_pollutant() {
        let dataset = catalog::Dataset::sample().unwrap();
        let summary = catalog::summary(&dataset.readings);
        let chart = ChartDatum::from_summary(&summary);
        let labels: Vec<&str> = chart.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["PM2.5", "PM10", "NO₂", "O₃"]);
    }

    #[test]
    fn tier_distribution_counts_every_location() {
        let points = catalog::Dataset::sample().unwrap().readings;
        let dist = ChartDatum::tier_distribution(&points, Pollutant::Pm25);
        let total: f64 = dist.iter().map(|d| d.value).sum();
        assert_eq!(total, points.len() as f64);
        assert!(dist.iter().all(|d| d.value > 0.0));
        assert_eq!(dist[0].label, "Good");
    }
}
