use aqi::{Classification, Pollutant};
use serde::Serialize;

use crate::model::PollutionDataPoint;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PollutantStats {
    pub min: f64,
    pub max: f64,
    /// Mean rounded to one decimal place, as shown on the dashboard cards.
    pub avg: f64,
}

pub struct Statistics;

impl Statistics {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mut sum = 0.0;
        for &v in values {
            sum += v;
        }
        Some(sum / values.len() as f64)
    }

    pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        let first = *values.first()?;
        let mut min = first;
        let mut max = first;
        for &v in values.iter().skip(1) {
            min = min.min(v);
            max = max.max(v);
        }
        Some((min, max))
    }

    pub fn round1(v: f64) -> f64 {
        (v * 10.0).round() / 10.0
    }
}

pub fn pollutant_stats(
    points: &[PollutionDataPoint],
    pollutant: Pollutant,
) -> Option<PollutantStats> {
    let values: Vec<f64> = points.iter().map(|p| p.value(pollutant)).collect();
    let (min, max) = Statistics::min_max(&values)?;
    let avg = Statistics::round1(Statistics::mean(&values)?);
    Some(PollutantStats { min, max, avg })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantSummary {
    pub pollutant: Pollutant,
    pub label: &'static str,
    pub stats: PollutantStats,
    /// Classification of the average.
    pub classification: Classification,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub pollutants: Vec<PollutantSummary>,
    /// Worst tier among the pollutant averages.
    pub overall: Classification,
}

pub fn summary(points: &[PollutionDataPoint]) -> Summary {
    let pollutants: Vec<PollutantSummary> = Pollutant::ALL
        .into_iter()
        .filter_map(|p| {
            let stats = pollutant_stats(points, p)?;
            Some(PollutantSummary {
                pollutant: p,
                label: p.label(),
                stats,
                classification: aqi::classify(p, stats.avg),
                index: aqi::approximate_index(p, stats.avg),
            })
        })
        .collect();

    let overall = aqi::overall(pollutants.iter().map(|s| (s.pollutant, s.stats.avg)));

    Summary {
        count: points.len(),
        pollutants,
        overall,
    }
}
