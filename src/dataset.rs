// 🥾 Trail Dataset - immutable joined trails + read-only queries
// Built once by the pipeline, then only filtered

use crate::join::JoinedTrail;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// QUERY TYPES
// ============================================================================

/// Selector state sent by the dashboard; None = nothing selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrailFilter {
    pub region_name: Option<String>,
    pub city: Option<String>,
    pub difficulty: Option<String>,
}

impl TrailFilter {
    pub fn region(region_name: &str) -> Self {
        TrailFilter {
            region_name: Some(region_name.to_string()),
            ..Default::default()
        }
    }

    /// Builder pattern: narrow to a city
    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    /// Builder pattern: narrow to a difficulty
    pub fn with_difficulty(mut self, difficulty: &str) -> Self {
        self.difficulty = Some(difficulty.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.region_name.is_none() && self.city.is_none() && self.difficulty.is_none()
    }

    /// Region gates city: a city without a region does not narrow anything
    pub fn matches(&self, trail: &JoinedTrail) -> bool {
        let place = match (&self.region_name, &self.city) {
            (None, _) => true,
            (Some(region), None) => &trail.region_name == region,
            (Some(region), Some(city)) => &trail.region_name == region && &trail.city == city,
        };

        place
            && self
                .difficulty
                .as_ref()
                .map_or(true, |d| &trail.difficulty == d)
    }
}

/// One line of the dashboard table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    #[serde(rename = "Trail Name")]
    pub name: String,

    #[serde(rename = "State")]
    pub region_name: String,

    #[serde(rename = "City")]
    pub city: String,

    #[serde(rename = "Difficulty")]
    pub difficulty: String,

    #[serde(rename = "Length (km)")]
    pub length_km: f64,

    #[serde(rename = "Review Score")]
    pub review_score: f64,

    #[serde(rename = "Number of reviews")]
    pub number_of_reviews: u32,

    #[serde(rename = "More info")]
    pub trail_url: String,
}

impl TableRow {
    pub const HEADERS: [&'static str; 8] = [
        "Trail Name",
        "State",
        "City",
        "Difficulty",
        "Length (km)",
        "Review Score",
        "Number of reviews",
        "More info",
    ];
}

impl From<&JoinedTrail> for TableRow {
    fn from(trail: &JoinedTrail) -> Self {
        TableRow {
            name: trail.name.clone(),
            region_name: trail.region_name.clone(),
            city: trail.city.clone(),
            difficulty: trail.difficulty.clone(),
            length_km: trail.length_km,
            review_score: trail.review_score,
            number_of_reviews: trail.number_of_reviews,
            trail_url: trail.trail_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    pub region_name: String,
    pub trail_count: usize,
    pub mean_review_score: f64,
}

// ============================================================================
// DATASET
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailDataset {
    trails: Vec<JoinedTrail>,
}

impl TrailDataset {
    pub fn new(trails: Vec<JoinedTrail>) -> Self {
        TrailDataset { trails }
    }

    pub fn trails(&self) -> &[JoinedTrail] {
        &self.trails
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    /// Distinct region names, sorted
    pub fn region_names(&self) -> Vec<String> {
        distinct(self.trails.iter().map(|t| t.region_name.as_str()))
    }

    /// Distinct difficulty values, sorted
    pub fn difficulties(&self) -> Vec<String> {
        distinct(self.trails.iter().map(|t| t.difficulty.as_str()))
    }

    /// Distinct cities of a region; nothing until a region is chosen
    pub fn cities_in(&self, region_name: Option<&str>) -> Vec<String> {
        match region_name {
            None => Vec::new(),
            Some(region) => distinct(
                self.trails
                    .iter()
                    .filter(|t| t.region_name == region)
                    .map(|t| t.city.as_str()),
            ),
        }
    }

    /// Trails matching the filter, dataset order
    pub fn filter(&self, filter: &TrailFilter) -> Vec<&JoinedTrail> {
        self.trails.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn table_rows(trails: &[&JoinedTrail]) -> Vec<TableRow> {
        trails.iter().map(|t| TableRow::from(*t)).collect()
    }

    /// Trail count and mean review score per region, busiest first
    pub fn region_summary(&self) -> Vec<RegionSummary> {
        let mut summary: HashMap<&str, (usize, f64)> = HashMap::new();

        for trail in &self.trails {
            let entry = summary.entry(trail.region_name.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += trail.review_score;
        }

        let mut result: Vec<RegionSummary> = summary
            .into_iter()
            .map(|(region, (count, total))| RegionSummary {
                region_name: region.to_string(),
                trail_count: count,
                mean_review_score: total / count as f64,
            })
            .collect();

        // Name as tie-break keeps the listing stable across runs
        result.sort_by(|a, b| {
            b.trail_count
                .cmp(&a.trail_count)
                .then_with(|| a.region_name.cmp(&b.region_name))
        });
        result
    }

    /// SHA-256 over every field of every trail, in order
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for t in &self.trails {
            let line = format!(
                "{}\x1f{}\x1f{}\x1f{}\x1f{:?}\x1f{:?}\x1f{:?}\x1f{}\x1f{:?}\x1f{}\x1f{}\n",
                t.name,
                t.region_code,
                t.region_name,
                t.city,
                t.lat,
                t.lng,
                t.length_km,
                t.difficulty,
                t.review_score,
                t.number_of_reviews,
                t.trail_url
            );
            hasher.update(line.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(|v| v.to_string())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn trail(name: &str, region: &str, city: &str, difficulty: &str, score: f64) -> JoinedTrail {
        JoinedTrail {
            name: name.to_string(),
            region_code: region[..2].to_uppercase(),
            region_name: region.to_string(),
            city: city.to_string(),
            lat: 38.6,
            lng: -78.2,
            length_km: 10.0,
            difficulty: difficulty.to_string(),
            review_score: score,
            number_of_reviews: 100,
            trail_url: format!("https://example.com/{}", name),
        }
    }

    fn create_test_dataset() -> TrailDataset {
        TrailDataset::new(vec![
            trail("Old Rag", "Virginia", "Sperryville", "hard", 4.8),
            trail("Whiteoak Canyon", "Virginia", "Syria", "moderate", 4.7),
            trail("Stony Man", "Virginia", "Luray", "easy", 4.6),
            trail("Mount Si", "Washington", "North Bend", "hard", 4.5),
            trail("Rattlesnake Ledge", "Washington", "North Bend", "moderate", 4.4),
        ])
    }

    #[test]
    fn test_option_lists() {
        let dataset = create_test_dataset();

        assert_eq!(dataset.region_names(), vec!["Virginia", "Washington"]);
        assert_eq!(dataset.difficulties(), vec!["easy", "hard", "moderate"]);
        assert_eq!(
            dataset.cities_in(Some("Virginia")),
            vec!["Luray", "Sperryville", "Syria"]
        );
        assert_eq!(dataset.cities_in(Some("Washington")), vec!["North Bend"]);
        assert!(dataset.cities_in(Some("Oregon")).is_empty());
    }

    #[test]
    fn test_cities_empty_without_region() {
        let dataset = create_test_dataset();
        assert!(dataset.cities_in(None).is_empty());
    }

    #[test]
    fn test_filter_region_only_returns_all_cities() {
        let dataset = create_test_dataset();

        let result = dataset.filter(&TrailFilter::region("Virginia"));

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|t| t.region_name == "Virginia"));
    }

    #[test]
    fn test_filter_region_and_city() {
        let dataset = create_test_dataset();

        let result = dataset.filter(&TrailFilter::region("Washington").with_city("North Bend"));
        assert_eq!(result.len(), 2);

        let result = dataset.filter(&TrailFilter::region("Virginia").with_city("North Bend"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_city_ignored_without_region() {
        let dataset = create_test_dataset();

        let filter = TrailFilter {
            city: Some("Luray".to_string()),
            ..Default::default()
        };

        assert_eq!(dataset.filter(&filter).len(), dataset.len());
    }

    #[test]
    fn test_filter_difficulty_combines() {
        let dataset = create_test_dataset();

        let filter = TrailFilter {
            difficulty: Some("hard".to_string()),
            ..Default::default()
        };
        let names: Vec<&str> = dataset.filter(&filter).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Old Rag", "Mount Si"]);

        let result = dataset.filter(&TrailFilter::region("Virginia").with_difficulty("hard"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Old Rag");
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let dataset = create_test_dataset();
        let filter = TrailFilter::default();

        assert!(filter.is_empty());
        let result = dataset.filter(&filter);
        let all: Vec<&JoinedTrail> = dataset.trails().iter().collect();
        assert_eq!(result, all);
    }

    #[test]
    fn test_table_rows_projection() {
        let dataset = create_test_dataset();
        let selected = dataset.filter(&TrailFilter::region("Washington"));

        let rows = TrailDataset::table_rows(&selected);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Mount Si");
        assert_eq!(rows[0].region_name, "Washington");
        assert_eq!(rows[0].trail_url, "https://example.com/Mount Si");

        let json = serde_json::to_value(&rows[0]).unwrap();
        for header in TableRow::HEADERS {
            assert!(json.get(header).is_some(), "missing {}", header);
        }
    }

    #[test]
    fn test_region_summary() {
        let dataset = create_test_dataset();

        let summary = dataset.region_summary();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].region_name, "Virginia");
        assert_eq!(summary[0].trail_count, 3);
        assert!((summary[0].mean_review_score - 4.7).abs() < 1e-9);
        assert_eq!(summary[1].trail_count, 2);
    }

    #[test]
    fn test_fingerprint_stable_and_order_sensitive() {
        let dataset = create_test_dataset();
        assert_eq!(dataset.fingerprint(), create_test_dataset().fingerprint());
        assert_eq!(dataset.fingerprint().len(), 64);

        let mut reversed = dataset.trails().to_vec();
        reversed.reverse();
        assert_ne!(dataset.fingerprint(), TrailDataset::new(reversed).fingerprint());
    }

    #[test]
    fn test_fingerprint_covers_every_trail() {
        let dataset = create_test_dataset();
        let mut trails = dataset.trails().to_vec();

        trails[0].lat += 0.001;
        assert_ne!(dataset.fingerprint(), TrailDataset::new(trails.clone()).fingerprint());

        // Dropping the last trail changes the hash too
        trails.pop();
        let shorter = TrailDataset::new(trails);
        assert_ne!(shorter.fingerprint(), create_test_dataset().fingerprint());
        assert_ne!(TrailDataset::default().fingerprint(), dataset.fingerprint());
    }
}
