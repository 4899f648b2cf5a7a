// 🧹 Field Normalizer - clean trail names, split "City, Code"

use crate::loader::RawTrail;

/// TrailRecord - a trail after cleaning
#[derive(Debug, Clone, PartialEq)]
pub struct TrailRecord {
    pub name: String,
    pub city: String,

    /// Region code (domestic) or region name (world); None when the raw field had no comma
    pub code: Option<String>,

    pub difficulty: String,
    pub length_km: f64,
    pub review_score: f64,
    pub number_of_reviews: u32,
    pub trail_url: String,
}

/// Drop null-difficulty rows and normalize the rest, order preserved
pub fn normalize(raw: Vec<RawTrail>) -> Vec<TrailRecord> {
    raw.into_iter().filter_map(normalize_record).collect()
}

/// Normalize one row; None when its difficulty is null
pub fn normalize_record(raw: RawTrail) -> Option<TrailRecord> {
    let difficulty = raw.difficulty?;
    let (city, code) = split_city(&raw.city_raw);

    Some(TrailRecord {
        name: clean_name(&raw.name),
        city,
        code,
        difficulty,
        length_km: raw.length_km,
        review_score: raw.review_score,
        number_of_reviews: raw.number_of_reviews,
        trail_url: raw.trail_url,
    })
}

/// Split on the first comma only: "Washington, D.C., DC" → ("Washington", Some("D.C., DC"))
pub fn split_city(city_raw: &str) -> (String, Option<String>) {
    match city_raw.split_once(',') {
        Some((city, code)) => (city.trim().to_string(), Some(code.trim().to_string())),
        None => (city_raw.trim().to_string(), None),
    }
}

/// Keep ASCII letters and whitespace, then trim: "Old Rag Trail##" → "Old Rag Trail"
pub fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}
