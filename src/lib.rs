//! Red List species pipeline
//!
//! Picks a random region from the IUCN Red List catalog, loads its species,
//! enriches the critically endangered subset with conservation-measure
//! summaries fetched concurrently per species, and intersects the full
//! regional list with the mammal comparative group. Intermediate state is
//! published as consistent snapshots for a rendering layer to observe.

pub mod catalog;
pub mod config;
pub mod models;
pub mod pipeline;

// Re-exports for convenience
pub use catalog::http::RedListClient;
pub use catalog::CatalogClient;
pub use config::Config;
pub use models::{Category, SpeciesRecord};
pub use pipeline::{Coordinator, PipelineError, PipelineSnapshot, StageState};
