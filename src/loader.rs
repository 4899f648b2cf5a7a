// 📂 Record Loader - CSV → typed tables
// Reads the trail dataset and the US city reference table

use crate::error::DataLoadError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Trail columns the dataset must carry (the leading index column is ignored)
pub const TRAIL_COLUMNS: [&str; 7] = [
    "name",
    "city",
    "difficulty",
    "length (km)",
    "review score",
    "number of reviews",
    "trail url",
];

/// Reference columns used by the join; the rest of the table is ignored
pub const CITY_COLUMNS: [&str; 5] = ["city", "state_id", "state_name", "lat", "lng"];

/// RawTrail - one row of the trail dataset as found on disk
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTrail {
    pub name: String,

    /// Composite "City, RegionCode" field
    #[serde(rename = "city")]
    pub city_raw: String,

    /// Empty cell = null difficulty
    pub difficulty: Option<String>,

    #[serde(rename = "length (km)")]
    pub length_km: f64,

    #[serde(rename = "review score")]
    pub review_score: f64,

    #[serde(rename = "number of reviews")]
    pub number_of_reviews: u32,

    #[serde(rename = "trail url")]
    pub trail_url: String,
}

/// CityReference - one row of the reference table, never mutated
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityReference {
    pub city: String,

    #[serde(rename = "state_id")]
    pub region_code: String,

    #[serde(rename = "state_name")]
    pub region_name: String,

    pub lat: f64,
    pub lng: f64,
}

// ============================================================================
// LOADERS
// ============================================================================

/// Rows read from a table, plus rows dropped before parsing
#[derive(Debug, Clone)]
pub struct Table<T> {
    pub rows: Vec<T>,

    /// Rows whose required cell was empty
    pub skipped: usize,
}

/// Rows with an empty difficulty are skipped unparsed
pub fn load_trails(path: &Path) -> Result<Table<RawTrail>, DataLoadError> {
    read_table(path, &TRAIL_COLUMNS, Some("difficulty"))
}

pub fn load_cities(path: &Path) -> Result<Vec<CityReference>, DataLoadError> {
    Ok(read_table(path, &CITY_COLUMNS, None)?.rows)
}

/// Read a headed CSV into `T`, checking the header before any row
///
/// Columns outside `expected` are skipped by name-based deserialization,
/// which is how the unnamed index column gets dropped. A row whose
/// `required` cell is empty is counted and never deserialized.
fn read_table<T: DeserializeOwned>(
    path: &Path,
    expected: &[&str],
    required: Option<&str>,
) -> Result<Table<T>, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| DataLoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| DataLoadError::Row {
            path: path.to_path_buf(),
            line: 1,
            source,
        })?
        .clone();

    if headers.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let missing: Vec<String> = expected
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let required = required.and_then(|column| headers.iter().position(|h| h == column));
    let mut table = Table {
        rows: Vec::new(),
        skipped: 0,
    };

    for result in reader.records() {
        let record = result.map_err(|source| DataLoadError::Row {
            path: path.to_path_buf(),
            line: source.position().map(|p| p.line()).unwrap_or(0),
            source,
        })?;

        if let Some(index) = required {
            if record.get(index).map_or(true, str::is_empty) {
                table.skipped += 1;
                continue;
            }
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row: T = record
            .deserialize(Some(&headers))
            .map_err(|source| DataLoadError::Row {
                path: path.to_path_buf(),
                line,
                source,
            })?;

        table.rows.push(row);
    }

    if table.rows.is_empty() && table.skipped == 0 {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(table)
}

// ============================================================================
// TESTS
// ============================================================================
