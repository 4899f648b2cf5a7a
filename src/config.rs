// ⚙️ Pipeline configuration - file paths and data-quality constants as data

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// First non-US city in the source ordering
pub const DEFAULT_SENTINEL_CITY: &str = "Konispol";

/// Region codes known to be malformed or ambiguous in the trail dataset
pub const DEFAULT_EXCLUDED_CODES: [&str; 3] = ["D.C., DC", "Los Angeles, CA", "unknown"];

/// Environment variable that points at a config file
pub const CONFIG_ENV_VAR: &str = "TRAIL_ATLAS_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "trail_atlas.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Trail dataset (leading index column + trail columns)
    pub trails_path: PathBuf,

    /// US city reference table
    pub cities_path: PathBuf,

    /// City that opens the rest-of-world block
    pub sentinel_city: String,

    /// Domestic region codes dropped before the join
    pub excluded_codes: BTreeSet<String>,

    /// Fail when no trail survives the join
    pub require_matches: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            trails_path: PathBuf::from("all_hiking_places.csv"),
            cities_path: PathBuf::from("uscities.csv"),
            sentinel_city: DEFAULT_SENTINEL_CITY.to_string(),
            excluded_codes: DEFAULT_EXCLUDED_CODES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            require_matches: true,
        }
    }
}

impl PipelineConfig {
    /// Load config from JSON file; missing keys fall back to defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: PipelineConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Resolve config: env var, then ./trail_atlas.json, then defaults
    pub fn discover() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }

        Ok(Self::default())
    }

    pub fn is_excluded(&self, code: &str) -> bool {
        self.excluded_codes.contains(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_constants() {
        let config = PipelineConfig::default();

        assert_eq!(config.sentinel_city, "Konispol");
        assert!(config.is_excluded("unknown"));
        assert!(config.is_excluded("D.C., DC"));
        assert!(config.is_excluded("Los Angeles, CA"));
        assert!(!config.is_excluded("VA"));
        assert!(config.require_matches);
    }

    #[test]
    fn test_from_file_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "trails_path": "data/trails.csv", "require_matches": false }}"#
        )
        .unwrap();

        let config = PipelineConfig::from_file(file.path()).unwrap();

        assert_eq!(config.trails_path, PathBuf::from("data/trails.csv"));
        assert!(!config.require_matches);
        // Untouched keys keep their defaults
        assert_eq!(config.cities_path, PathBuf::from("uscities.csv"));
        assert_eq!(config.sentinel_city, DEFAULT_SENTINEL_CITY);
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(PipelineConfig::from_file(file.path()).is_err());
    }
}
