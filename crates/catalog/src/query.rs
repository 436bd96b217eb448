use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use aqi::Pollutant;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::{PollutionDataPoint, Readings};

/// Default number of rows in each top-cities table.
pub const DEFAULT_RANK_LIMIT: usize = 10;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Name,
    Id,
}

impl SortBy {
    pub fn toggled(self) -> Self {
        match self {
            SortBy::Name => SortBy::Id,
            SortBy::Id => SortBy::Name,
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::Name => f.write_str("name"),
            SortBy::Id => f.write_str("id"),
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortBy::Name),
            "id" => Ok(SortBy::Id),
            other => Err(format!("unknown sort key: {other:?} (expected name or id)")),
        }
    }
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Primary collation key for a place name: diacritics stripped, `đ` folded
/// to `d`, lowercased. "Đà Nẵng" becomes "da nang".
pub fn name_sort_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' | 'Đ' => 'd',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Sorts in place. Numeric ids compare numerically and precede non-numeric
/// ones. Names compare on [`name_sort_key`], then on the raw name.
pub fn sort_points(points: &mut [PollutionDataPoint], sort_by: SortBy) {
    match sort_by {
        SortBy::Id => points.sort_by(|a, b| compare_ids(&a.id, &b.id)),
        SortBy::Name => points.sort_by_cached_key(|p| {
            (name_sort_key(&p.location.name), p.location.name.clone())
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rankings {
    pub pollutant: Pollutant,
    /// Highest concentration first.
    pub most_polluted: Vec<PollutionDataPoint>,
    /// Lowest concentration first.
    pub cleanest: Vec<PollutionDataPoint>,
}

/// Orders by `pollutant` descending and takes `limit` rows from each end.
/// With fewer than `2 * limit` points the two tables overlap.
pub fn rank(points: &[PollutionDataPoint], pollutant: Pollutant, limit: usize) -> Rankings {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| b.value(pollutant).total_cmp(&a.value(pollutant)));

    let most_polluted = sorted.iter().take(limit).cloned().collect();
    let cleanest = sorted.iter().rev().take(limit).cloned().collect();

    Rankings {
        pollutant,
        most_polluted,
        cleanest,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSeries {
    pub key: String,
    pub name: String,
    pub readings: Vec<Readings>,
}

impl LocationSeries {
    /// Most recent reading by instant. See [`Readings::cmp_observed`].
    pub fn latest(&self) -> Option<&Readings> {
        self.readings.iter().max_by(|a, b| a.cmp_observed(b))
    }
}

/// Groups points by location key, in first-seen order.
pub fn group_by_location(points: &[PollutionDataPoint]) -> Vec<LocationSeries> {
    let mut out: Vec<LocationSeries> = Vec::new();
    for point in points {
        match out.iter_mut().find(|s| s.key == point.location.key) {
            Some(series) => series.readings.push(point.readings.clone()),
            None => out.push(LocationSeries {
                key: point.location.key.clone(),
                name: point.location.name.clone(),
                readings: vec![point.readings.clone()],
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use pretty_assertions::assert_eq;

    fn point(id: &str, name: &str, pm25: f64, timestamp: &str) -> PollutionDataPoint {
        PollutionDataPoint {
            id: id.to_string(),
            location: Location {
                key: name.replace(' ', "_"),
                name: name.to_string(),
                lat: 16.0,
                lng: 108.0,
            },
            readings: Readings {
                pm25,
                pm10: 0.0,
                no2: 0.0,
                o3: 0.0,
                timestamp: timestamp.to_string(),
            },
        }
    }

    const T0: &str = "2025-04-29T10:30:00Z";

    fn ids(points: &[PollutionDataPoint]) -> Vec<&str> {
        points.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn sorts_ids_numerically() {
        let mut pts = vec![
            point("10", "a", 1.0, T0),
            point("2", "b", 1.0, T0),
            point("x", "c", 1.0, T0),
            point("1", "d", 1.0, T0),
        ];
        sort_points(&mut pts, SortBy::Id);
        assert_eq!(ids(&pts), vec!["1", "2", "10", "x"]);
    }

    #[test]
    fn sorts_names_case_insensitively() {
        let mut pts = vec![
            point("1", "hue", 1.0, T0),
            point("2", "Da Nang", 1.0, T0),
            point("3", "Can Tho", 1.0, T0),
        ];
        sort_points(&mut pts, SortBy::Name);
        assert_eq!(ids(&pts), vec!["3", "2", "1"]);
    }

    #[test]
    fn name_key_folds_vietnamese_diacritics() {
        assert_eq!(name_sort_key("Đà Nẵng"), "da nang");
        assert_eq!(name_sort_key("Thừa Thiên Huế"), "thua thien hue");
        assert_eq!(name_sort_key("Bắc Ninh"), "bac ninh");
    }

    #[test]
    fn sorts_sample_names_alphabetically() {
        let mut pts = crate::Dataset::sample().unwrap().readings;
        sort_points(&mut pts, SortBy::Name);
        let names: Vec<&str> = pts.iter().map(|p| p.location.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Bắc Ninh",
                "Bình Dương",
                "Cà Mau",
                "Cần Thơ",
                "Đà Nẵng",
                "Đồng Nai",
                "Hà Nội",
                "Hải Phòng",
                "Hồ Chí Minh",
                "Khánh Hòa",
                "Lâm Đồng",
                "Lào Cai",
                "Nghệ An",
                "Quảng Ninh",
                "Thái Nguyên",
                "Thừa Thiên Huế",
            ]
        );
    }

    #[test]
    fn latest_uses_instant_not_text() {
        let pts = vec![
            point("1", "Ha Noi", 40.0, "2025-04-29T10:30:00Z"),
            point("2", "Ha Noi", 55.0, "2025-04-29T17:00:00+07:00"),
        ];
        let groups = group_by_location(&pts);
        assert_eq!(groups[0].latest().unwrap().pm25, 40.0);
    }

    #[test]
    fn sort_key_parses_and_toggles() {
        assert_eq!("ID".parse::<SortBy>(), Ok(SortBy::Id));
        assert!("size".parse::<SortBy>().is_err());
        assert_eq!(SortBy::Name.toggled(), SortBy::Id);
    }

    #[test]
    fn ranks_both_ends() {
        let pts: Vec<_> = [5.0, 50.0, 20.0, 80.0, 1.0]
            .iter()
            .enumerate()
            .map(|(i, v)| point(&i.to_string(), &format!("p{i}"), *v, T0))
            .collect();
        let r = rank(&pts, Pollutant::Pm25, 2);
        assert_eq!(ids(&r.most_polluted), vec!["3", "1"]);
        assert_eq!(ids(&r.cleanest), vec!["4", "0"]);
    }

    #[test]
    fn rank_limit_larger_than_input() {
        let pts = vec![point("1", "a", 3.0, T0), point("2", "b", 9.0, T0)];
        let r = rank(&pts, Pollutant::Pm25, DEFAULT_RANK_LIMIT);
        assert_eq!(ids(&r.most_polluted), vec!["2", "1"]);
        assert_eq!(ids(&r.cleanest), vec!["1", "2"]);
    }

    #[test]
    fn groups_by_location_in_first_seen_order() {
        let pts = vec![
            point("1", "Ha Noi", 40.0, "2025-04-29T10:30:00Z"),
            point("2", "Da Nang", 12.0, T0),
            point("3", "Ha Noi", 55.0, "2025-04-29T11:30:00Z"),
        ];
        let groups = group_by_location(&pts);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Ha_Noi");
        assert_eq!(groups[0].readings.len(), 2);
        assert_eq!(groups[0].latest().unwrap().pm25, 55.0);
    }
}
