//! Dependent multi-stage enrichment pipeline
//!
//! Four stages wired by the [`Coordinator`]: region selection, regional
//! species loading, concurrent measure enrichment of the critically
//! endangered subset, and the mammal-group filter over the full list.

pub mod coordinator;
pub mod enricher;
pub mod error;
pub mod loader;
pub mod mammals;
pub mod region;
pub mod state;

pub use coordinator::Coordinator;
pub use error::{PipelineError, StageResult};
pub use state::{PipelineSnapshot, RegionalSpecies, StageState};
