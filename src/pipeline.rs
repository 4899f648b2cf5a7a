// 🔗 Pipeline - load → normalize → partition → join, fail-fast
// Runs once at startup and hands an immutable dataset to the dashboard

use crate::config::PipelineConfig;
use crate::dataset::TrailDataset;
use crate::error::{JoinIntegrityError, Result};
use crate::join::join;
use crate::loader::{load_cities, load_trails, CityReference, RawTrail, Table};
use crate::normalize::normalize;
use crate::partition::partition;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// What each stage kept and dropped during one run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    pub raw_count: usize,
    pub normalized_count: usize,
    pub dropped_null_difficulty: usize,
    pub domestic_count: usize,
    pub world_count: usize,
    pub excluded_count: usize,
    pub reference_count: usize,
    pub joined_count: usize,
    pub unmatched_count: usize,

    /// SHA-256 of the joined sequence
    pub fingerprint: String,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        format!(
            "Loaded {} trails ({} without difficulty), {} domestic ({} excluded), {} joined, {} unmatched",
            self.raw_count,
            self.dropped_null_difficulty,
            self.domestic_count,
            self.excluded_count,
            self.joined_count,
            self.unmatched_count
        )
    }
}

/// Read both input files, then build the dataset
pub fn run(config: &PipelineConfig) -> Result<(TrailDataset, PipelineReport)> {
    info!(path = %config.trails_path.display(), "Loading trail dataset");
    let trails = load_trails(&config.trails_path)?;

    info!(path = %config.cities_path.display(), "Loading city reference");
    let cities = load_cities(&config.cities_path)?;

    build(trails, &cities, config)
}

/// In-memory part of the pipeline
pub fn run_tables(
    trails: Vec<RawTrail>,
    cities: &[CityReference],
    config: &PipelineConfig,
) -> Result<(TrailDataset, PipelineReport)> {
    let table = Table {
        rows: trails,
        skipped: 0,
    };
    build(table, cities, config)
}

fn build(
    trails: Table<RawTrail>,
    cities: &[CityReference],
    config: &PipelineConfig,
) -> Result<(TrailDataset, PipelineReport)> {
    let started_at = Utc::now();
    let run_id = uuid::Uuid::new_v4().to_string();

    // Rows the loader skipped had no difficulty either
    let raw_count = trails.rows.len() + trails.skipped;
    let records = normalize(trails.rows);
    let normalized_count = records.len();
    let dropped_null_difficulty = raw_count - normalized_count;
    if dropped_null_difficulty > 0 {
        warn!(dropped = dropped_null_difficulty, "Dropped trails without difficulty");
    }

    let split = partition(records, config)?;
    info!(
        domestic = split.domestic.len(),
        world = split.world.len(),
        excluded = split.excluded,
        "Partitioned trails"
    );

    let outcome = join(&split.domestic, cities);
    if outcome.unmatched > 0 {
        warn!(
            unmatched = outcome.unmatched,
            "Domestic trails without a reference city were dropped"
        );
    }

    if outcome.trails.is_empty() && config.require_matches {
        return Err(JoinIntegrityError::NoMatches {
            domestic: split.domestic.len(),
            references: cities.len(),
        }
        .into());
    }

    let dataset = TrailDataset::new(outcome.trails);
    let fingerprint = dataset.fingerprint();

    let report = PipelineReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        raw_count,
        normalized_count,
        dropped_null_difficulty,
        domestic_count: split.domestic.len(),
        world_count: split.world.len(),
        excluded_count: split.excluded,
        reference_count: cities.len(),
        joined_count: dataset.len(),
        unmatched_count: outcome.unmatched,
        fingerprint,
    };

    info!(joined = report.joined_count, fingerprint = %report.fingerprint, "Dataset ready");

    Ok((dataset, report))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TrailFilter;
    use crate::error::{DataLoadError, PipelineError};
    use std::fs;
    use tempfile::TempDir;

    const TRAILS_CSV: &str = "\
,name,city,difficulty,length (km),review score,number of reviews,trail url
0,Old Rag Trail##,\"Sperryville, VA\",hard,14.5,4.8,5123,https://example.com/old-rag
1,Whiteoak Canyon #2,\"Syria, VA\",moderate,7.4,4.7,2100,https://example.com/whiteoak
2,Stony Man,\"Luray, VA\",easy,2.6,4.6,3300,https://example.com/stony-man
3,No Difficulty Loop,\"Luray, VA\",,3.0,4.0,10,https://example.com/no-diff
4,Capitol Walk,\"Washington, D.C., DC\",easy,3.1,4.2,800,https://example.com/capitol
5,Mystery Path,\"Nowhere, unknown\",easy,1.0,3.9,5,https://example.com/mystery
6,Lost Trail,\"Atlantis, VA\",hard,9.0,4.1,20,https://example.com/lost
7,Mount Si,\"North Bend, WA\",hard,12.2,4.5,9000,https://example.com/mount-si
8,Konispol Ridge,\"Konispol, Albania\",moderate,6.0,4.3,40,https://example.com/konispol
9,Llogara Pass,\"Vlore, Albania\",hard,8.0,4.6,70,https://example.com/llogara
";

    const CITIES_CSV: &str = "\
city,city_ascii,state_id,state_name,lat,lng,population
Sperryville,Sperryville,VA,Virginia,38.6,-78.2,350
Syria,Syria,VA,Virginia,38.5,-78.3,200
Luray,Luray,VA,Virginia,38.66,-78.46,4900
Washington,Washington,DC,District of Columbia,38.9,-77.0,5379184
North Bend,North Bend,WA,Washington,47.49,-121.78,7400
";

    fn write_inputs(trails: &str, cities: &str) -> (TempDir, PipelineConfig) {
        let dir = TempDir::new().unwrap();
        let trails_path = dir.path().join("all_hiking_places.csv");
        let cities_path = dir.path().join("uscities.csv");
        fs::write(&trails_path, trails).unwrap();
        fs::write(&cities_path, cities).unwrap();

        let config = PipelineConfig {
            trails_path,
            cities_path,
            ..Default::default()
        };
        (dir, config)
    }

    #[test]
    fn test_end_to_end() {
        let (_dir, config) = write_inputs(TRAILS_CSV, CITIES_CSV);

        let (dataset, report) = run(&config).unwrap();

        let names: Vec<&str> = dataset.trails().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Old Rag Trail", "Whiteoak Canyon", "Stony Man", "Mount Si"]);

        let old_rag = &dataset.trails()[0];
        assert_eq!(old_rag.region_code, "VA");
        assert_eq!(old_rag.region_name, "Virginia");
        assert_eq!(old_rag.city, "Sperryville");
        assert_eq!(old_rag.lat, 38.6);
        assert_eq!(old_rag.lng, -78.2);
        assert_eq!(old_rag.difficulty, "hard");

        assert_eq!(report.raw_count, 10);
        assert_eq!(report.dropped_null_difficulty, 1);
        assert_eq!(report.normalized_count, 9);
        assert_eq!(report.world_count, 2);
        // D.C. and unknown rows are excluded before the join
        assert_eq!(report.excluded_count, 2);
        assert_eq!(report.domestic_count, 5);
        assert_eq!(report.unmatched_count, 1);
        assert_eq!(report.joined_count, 4);
        assert!(report.finished_at >= report.started_at);
        assert!(!report.summary().is_empty());
    }

    #[test]
    fn test_null_difficulty_row_with_blank_numbers() {
        let trails = "\
,name,city,difficulty,length (km),review score,number of reviews,trail url
0,Old Rag Trail##,\"Sperryville, VA\",hard,14.5,4.8,5123,https://example.com/old-rag
1,Stub,\"Luray, VA\",,,,,u
2,Konispol Ridge,\"Konispol, Albania\",moderate,6.0,4.3,40,https://example.com/konispol
";
        let (_dir, config) = write_inputs(trails, CITIES_CSV);

        let (dataset, report) = run(&config).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.trails()[0].name, "Old Rag Trail");
        assert_eq!(report.raw_count, 3);
        assert_eq!(report.dropped_null_difficulty, 1);
        assert_eq!(report.normalized_count, 2);
    }

    #[test]
    fn test_excluded_region_never_joined() {
        let (_dir, config) = write_inputs(TRAILS_CSV, CITIES_CSV);

        let (dataset, _) = run(&config).unwrap();

        // The DC reference row exists, but the trail carried the excluded "D.C., DC" code
        assert!(dataset
            .trails()
            .iter()
            .all(|t| t.region_name != "District of Columbia"));
    }

    #[test]
    fn test_filter_virginia() {
        let (_dir, config) = write_inputs(TRAILS_CSV, CITIES_CSV);
        let (dataset, _) = run(&config).unwrap();

        let virginia = dataset.filter(&TrailFilter::region("Virginia"));

        assert_eq!(virginia.len(), 3);
        assert_eq!(
            dataset.cities_in(Some("Virginia")),
            vec!["Luray", "Sperryville", "Syria"]
        );
    }

    #[test]
    fn test_rerun_is_identical() {
        let (_dir, config) = write_inputs(TRAILS_CSV, CITIES_CSV);

        let (first, first_report) = run(&config).unwrap();
        let (second, second_report) = run(&config).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_report.fingerprint, second_report.fingerprint);
        assert_ne!(first_report.run_id, second_report.run_id);
    }

    #[test]
    fn test_missing_trail_file() {
        let (dir, mut config) = write_inputs(TRAILS_CSV, CITIES_CSV);
        config.trails_path = dir.path().join("missing.csv");

        let result = run(&config);

        assert!(matches!(
            result,
            Err(PipelineError::DataLoad(DataLoadError::Open { .. }))
        ));
    }

    #[test]
    fn test_missing_sentinel_aborts() {
        let trails: String = TRAILS_CSV
            .lines()
            .filter(|line| !line.contains("Albania"))
            .map(|line| format!("{}\n", line))
            .collect();
        let (_dir, config) = write_inputs(&trails, CITIES_CSV);

        let result = run(&config);

        assert!(matches!(result, Err(PipelineError::Partition(_))));
    }

    #[test]
    fn test_no_matches_integrity() {
        let cities = "city,state_id,state_name,lat,lng\nSpringfield,IL,Illinois,39.8,-89.6\n";
        let (_dir, mut config) = write_inputs(TRAILS_CSV, cities);

        let result = run(&config);
        assert!(matches!(result, Err(PipelineError::JoinIntegrity(_))));

        config.require_matches = false;
        let (dataset, report) = run(&config).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(report.unmatched_count, report.domestic_count);
    }

    #[test]
    fn test_joined_rows_have_coordinates() {
        let (_dir, config) = write_inputs(TRAILS_CSV, CITIES_CSV);
        let (dataset, report) = run(&config).unwrap();

        assert!(dataset
            .trails()
            .iter()
            .all(|t| t.lat.is_finite() && t.lng.is_finite() && !t.region_name.is_empty()));
        assert!(report.joined_count <= report.domestic_count);
    }
}
