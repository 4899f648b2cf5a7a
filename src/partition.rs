// 🗺️ Region Partitioner - domestic / world split by boundary city

use crate::config::PipelineConfig;
use crate::error::PartitionError;
use crate::normalize::TrailRecord;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Records before the boundary, excluded codes removed
    pub domestic: Vec<TrailRecord>,

    /// Boundary record and everything after it
    pub world: Vec<TrailRecord>,

    /// Domestic records removed by the exclusion set
    pub excluded: usize,
}

/// Split at the first record whose city is the sentinel
///
/// Domestic rows must precede world rows in the input; a missing sentinel
/// means that ordering cannot be trusted and is an error.
pub fn partition(
    mut records: Vec<TrailRecord>,
    config: &PipelineConfig,
) -> Result<Partition, PartitionError> {
    let boundary = records
        .iter()
        .position(|r| r.city == config.sentinel_city)
        .ok_or_else(|| PartitionError::SentinelNotFound {
            sentinel: config.sentinel_city.clone(),
            records: records.len(),
        })?;

    let world = records.split_off(boundary);
    let before = records.len();

    let domestic: Vec<TrailRecord> = records
        .into_iter()
        .filter(|r| match &r.code {
            Some(code) => !config.is_excluded(code),
            None => true,
        })
        .collect();

    let excluded = before - domestic.len();
    debug!(boundary, excluded, "Partitioned at {:?}", config.sentinel_city);

    Ok(Partition {
        domestic,
        world,
        excluded,
    })
}
