// Trail Atlas - Core Library
// Exposes the data pipeline and dataset queries for the dashboard and tests

pub mod config;
pub mod dataset;
pub mod error;
pub mod join;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod partition;
pub mod pipeline;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use dataset::{RegionSummary, TableRow, TrailDataset, TrailFilter};
pub use error::{DataLoadError, JoinIntegrityError, PartitionError, PipelineError};
pub use join::{join, JoinOutcome, JoinedTrail};
pub use loader::{load_cities, load_trails, CityReference, RawTrail, Table};
pub use normalize::{clean_name, normalize, split_city, TrailRecord};
pub use partition::{partition, Partition};
pub use pipeline::{run, run_tables, PipelineReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
