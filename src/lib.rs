pub mod config;
pub mod error;
pub mod fieldmap;
pub mod logging;
pub mod matching;
pub mod models;
pub mod normalize;
pub mod reconcile;

pub use config::{BaseConfig, DedupPolicy, FieldMap, NameColumns, ReconcileConfig, SourceConfig};
pub use error::ReconcileError;
pub use models::{EnrichedRecord, Row, UnmatchedEntry};
pub use reconcile::{reconcile, EnrichmentSource};
