//! Typed stage failures
//!
//! Stages return these to the coordinator instead of logging and swallowing;
//! the coordinator decides what lands in the published snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PipelineError {
    /// The remote catalog could not be reached, returned an error status, or
    /// sent a body we could not decode.
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The catalog's region list had no entries to pick from.
    #[error("catalog returned an empty region list")]
    EmptyCatalog,

    /// A species fetch was attempted before a region was selected. The
    /// coordinator prevents this; the loader still guards against it.
    #[error("no region selected for species fetch")]
    InvalidRegion,
}

impl PipelineError {
    /// Wrap a transport-level failure, keeping the full context chain.
    pub fn unavailable(err: anyhow::Error) -> Self {
        Self::CatalogUnavailable(format!("{err:#}"))
    }
}

pub type StageResult<T> = Result<T, PipelineError>;
