//! Plain-text renderings used by the `aqi` command line tool.

use std::fmt::Write;

use aqi::{Classification, Pollutant};
use catalog::{PollutionDataPoint, Rankings, Summary};
use layers::labels::format_concentration;
use layers::legend::Legend;

pub fn render_classification(pollutant: Pollutant, value: f64, c: &Classification) -> String {
    let head = format!(
        "{}: {} -> {} ({})",
        pollutant.label(),
        format_concentration(value),
        c.label,
        c.color
    );
    if c.is_unknown() {
        return head;
    }
    format!("{head}, AQI ~{}", aqi::approximate_index(pollutant, value))
}

/// One row per point. The last column is the tier for `pollutant`.
pub fn render_table(points: &[PollutionDataPoint], pollutant: Pollutant) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<20} {:>7} {:>7} {:>7} {:>7}  {}",
        "ID", "Location", "PM2.5", "PM10", "NO₂", "O₃", pollutant.label()
    );
    for p in points {
        let r = &p.readings;
        let _ = writeln!(
            out,
            "{:<4} {:<20} {:>7.1} {:>7.1} {:>7.1} {:>7.1}  {}",
            p.id,
            p.location.name,
            r.pm25,
            r.pm10,
            r.no2,
            r.o3,
            p.classify(pollutant).label
        );
    }
    out
}

pub fn render_rankings(rankings: &Rankings) -> String {
    let p = rankings.pollutant;
    let mut out = String::new();
    for (title, rows) in [
        ("Most polluted", &rankings.most_polluted),
        ("Cleanest", &rankings.cleanest),
    ] {
        let _ = writeln!(out, "{title} ({}):", p.label());
        for (i, point) in rows.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. {:<20} {}",
                i + 1,
                point.location.name,
                format_concentration(point.value(p))
            );
        }
    }
    out
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} locations", summary.count);
    for s in &summary.pollutants {
        let _ = writeln!(
            out,
            "{:<6} avg {:>7.1}  min {:>7.1}  max {:>7.1}  {}",
            s.label, s.stats.avg, s.stats.min, s.stats.max, s.classification.label
        );
    }
    let _ = writeln!(out, "Overall: {}", summary.overall.label);
    out
}

pub fn render_legend(legend: &Legend) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", legend.title);
    for e in &legend.entries {
        let _ = writeln!(out, "  {}  {:<32} {}", e.color, e.label, e.range);
    }
    out
}
