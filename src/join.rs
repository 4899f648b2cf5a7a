// 📍 Coordinate Joiner - attach lat/lng and region names to domestic trails

use crate::loader::CityReference;
use crate::normalize::TrailRecord;
use std::collections::HashMap;

/// JoinedTrail - a domestic trail with its reference city attached
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedTrail {
    pub name: String,
    pub region_code: String,
    pub region_name: String,
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    pub length_km: f64,
    pub difficulty: String,
    pub review_score: f64,
    pub number_of_reviews: u32,
    pub trail_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    pub trails: Vec<JoinedTrail>,

    /// Domestic records without any reference match
    pub unmatched: usize,
}

/// Inner join on (code, city) == (region_code, city), exact and case-sensitive
///
/// Output follows domestic order; a domestic record matching several
/// reference rows yields one trail per row, in reference order.
pub fn join(domestic: &[TrailRecord], references: &[CityReference]) -> JoinOutcome {
    let mut index: HashMap<(&str, &str), Vec<&CityReference>> = HashMap::new();
    for reference in references {
        index
            .entry((reference.region_code.as_str(), reference.city.as_str()))
            .or_default()
            .push(reference);
    }

    let mut outcome = JoinOutcome::default();

    for record in domestic {
        let matches = record
            .code
            .as_deref()
            .and_then(|code| index.get(&(code, record.city.as_str())));

        match matches {
            Some(matches) => {
                for reference in matches {
                    outcome.trails.push(joined(record, reference));
                }
            }
            None => outcome.unmatched += 1,
        }
    }

    outcome
}

fn joined(record: &TrailRecord, reference: &CityReference) -> JoinedTrail {
    JoinedTrail {
        name: record.name.clone(),
        region_code: reference.region_code.clone(),
        region_name: reference.region_name.clone(),
        city: record.city.clone(),
        lat: reference.lat,
        lng: reference.lng,
        length_km: record.length_km,
        difficulty: record.difficulty.clone(),
        review_score: record.review_score,
        number_of_reviews: record.number_of_reviews,
        trail_url: record.trail_url.clone(),
    }
}
