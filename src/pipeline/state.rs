//! Observable pipeline state
//!
//! Each stage owns one [`StageState`] slot in the [`PipelineSnapshot`] the
//! coordinator publishes. A failed stage lands in `Failed` with its error
//! kind, so "fetch failed" is never conflated with "genuinely empty".

use serde::{Deserialize, Serialize};

use crate::models::SpeciesRecord;
use crate::pipeline::error::PipelineError;

/// Lifecycle of one stage's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum StageState<T> {
    NotFetched,
    Fetching,
    Fetched(T),
    Failed(PipelineError),
}

impl<T> Default for StageState<T> {
    fn default() -> Self {
        StageState::NotFetched
    }
}

impl<T> StageState<T> {
    pub fn is_fetching(&self) -> bool {
        matches!(self, StageState::Fetching)
    }

    pub fn fetched(&self) -> Option<&T> {
        match self {
            StageState::Fetched(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            StageState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// The species loader's paired output: the full regional list and its
/// critically endangered sub-sequence, both in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalSpecies {
    pub all: Vec<SpeciesRecord>,
    pub critically_endangered: Vec<SpeciesRecord>,
}

/// Everything the presentation boundary may read, published as one value so
/// observers never see a half-updated pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    /// The randomly selected region identifier.
    pub region: StageState<String>,
    /// Regional species, full list plus the CR subset.
    pub species: StageState<RegionalSpecies>,
    /// The CR subset with conservation measures merged in. `Fetching` here
    /// is the "enriching" flag; it only flips back once every per-species
    /// sub-request has resolved.
    pub enrichment: StageState<Vec<SpeciesRecord>>,
    /// The regional species that belong to the mammal comparative group.
    pub mammals: StageState<Vec<SpeciesRecord>>,
}

impl PipelineSnapshot {
    pub fn is_selecting_region(&self) -> bool {
        self.region.is_fetching()
    }

    pub fn is_enriching(&self) -> bool {
        self.enrichment.is_fetching()
    }

    /// The critically endangered list to display: the enriched copy when the
    /// enricher has committed, otherwise the loader's unenriched subset.
    pub fn cr_species(&self) -> &[SpeciesRecord] {
        if let Some(enriched) = self.enrichment.fetched() {
            return enriched;
        }
        self.species
            .fetched()
            .map(|s| s.critically_endangered.as_slice())
            .unwrap_or(&[])
    }

    /// The mammal subset, empty while unavailable. Callers that need to tell
    /// "none found" from "fetch failed" inspect `mammals` directly.
    pub fn mammal_species(&self) -> &[SpeciesRecord] {
        self.mammals.fetched().map(Vec::as_slice).unwrap_or(&[])
    }
}
