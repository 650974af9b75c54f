//! Pipeline Coordinator
//!
//! Sequences the stages in dependency order, re-runs a stage only when its
//! declared input changed, and publishes every intermediate snapshot to the
//! presentation boundary over a watch channel. Each pass carries a
//! generation number; commits from a superseded pass are discarded instead
//! of overwriting fresher state.

use std::sync::Arc;

use rand::Rng;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::catalog::CatalogClient;
use crate::models::SpeciesRecord;
use crate::pipeline::error::PipelineError;
use crate::pipeline::state::{PipelineSnapshot, StageState};
use crate::pipeline::{enricher, loader, mammals, region};

type RegionPicker = dyn Fn(usize) -> usize + Send + Sync;

struct Inner {
    /// Bumped once per region selection; stage commits from an older
    /// generation are dropped.
    generation: u64,
    snapshot: PipelineSnapshot,
    /// Region used by the last species load.
    species_input: Option<String>,
    /// CR taxon ids used by the last enrichment run.
    enrichment_input: Option<Vec<u64>>,
    /// Full taxon id list used by the last mammal filter run.
    mammal_input: Option<Vec<u64>>,
}

pub struct Coordinator<C: CatalogClient> {
    catalog: Arc<C>,
    picker: Arc<RegionPicker>,
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<PipelineSnapshot>,
}

impl<C: CatalogClient> Coordinator<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        let (snapshot_tx, _) = watch::channel(PipelineSnapshot::default());
        Self {
            catalog,
            picker: Arc::new(|len| rand::thread_rng().gen_range(0..len)),
            inner: Mutex::new(Inner {
                generation: 0,
                snapshot: PipelineSnapshot::default(),
                species_input: None,
                enrichment_input: None,
                mammal_input: None,
            }),
            snapshot_tx,
        }
    }

    /// Replace the random region draw, e.g. to pin it in tests.
    pub fn with_region_picker(
        mut self,
        picker: impl Fn(usize) -> usize + Send + Sync + 'static,
    ) -> Self {
        self.picker = Arc::new(picker);
        self
    }

    /// Observe the live snapshot. The receiver always holds the latest
    /// published value.
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> PipelineSnapshot {
        self.inner.lock().await.snapshot.clone()
    }

    /// Run one full pass: draw a region, then propagate through every
    /// dependent stage. A stage failure is recorded in its own slot and
    /// never aborts the pass or clears other stages' state.
    pub async fn run(&self) -> PipelineSnapshot {
        let generation = self.begin_region_selection().await;

        match region::select_region_with(self.catalog.as_ref(), |len| (self.picker)(len)).await {
            Ok(selected) => self.commit_region(generation, selected).await,
            Err(err) => {
                warn!("Region selection failed: {err}");
                self.fail_region(generation, err).await;
            }
        }

        self.propagate(generation).await;
        self.snapshot().await
    }

    /// Discard the current region, draw a new one, and re-run the pass.
    /// In-flight work from the previous pass is not cancelled; its commits
    /// are discarded by the generation guard.
    pub async fn reselect_region(&self) -> PipelineSnapshot {
        self.run().await
    }

    /// Re-evaluate the dependency graph without reselecting the region.
    /// Stages whose input value matches their last completed run are
    /// skipped, so a refresh against unchanged data issues no requests.
    pub async fn refresh(&self) -> PipelineSnapshot {
        let generation = self.inner.lock().await.generation;
        self.propagate(generation).await;
        self.snapshot().await
    }

    async fn propagate(&self, generation: u64) {
        self.run_species_stage(generation).await;
        // Both consumers of the loader output run concurrently once it is
        // available; neither blocks the other.
        tokio::join!(
            self.run_enrichment_stage(generation),
            self.run_mammal_stage(generation),
        );
    }

    async fn begin_region_selection(&self) -> u64 {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.snapshot.region = StageState::Fetching;
        // Downstream output belongs to the outgoing region; drop it now so
        // observers never see a new region paired with old species.
        inner.snapshot.species = StageState::NotFetched;
        inner.snapshot.enrichment = StageState::NotFetched;
        inner.snapshot.mammals = StageState::NotFetched;
        self.publish(&inner);
        inner.generation
    }

    async fn commit_region(&self, generation: u64, selected: String) {
        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(region = %selected, "Discarding stale region selection");
            return;
        }
        inner.snapshot.region = StageState::Fetched(selected);
        self.publish(&inner);
    }

    async fn fail_region(&self, generation: u64, err: PipelineError) {
        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            return;
        }
        inner.snapshot.region = StageState::Failed(err);
        self.publish(&inner);
    }

    async fn run_species_stage(&self, generation: u64) {
        let selected = {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                return;
            }
            // The loader never runs without a selected region.
            let Some(selected) = inner.snapshot.region.fetched().cloned() else {
                return;
            };
            if inner.species_input.as_deref() == Some(selected.as_str())
                && inner.snapshot.species.fetched().is_some()
            {
                return;
            }
            inner.snapshot.species = StageState::Fetching;
            self.publish(&inner);
            selected
        };

        let result = loader::load_species(self.catalog.as_ref(), &selected).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(region = %selected, "Discarding stale species load");
            return;
        }
        match result {
            Ok(species) => {
                inner.species_input = Some(selected);
                inner.snapshot.species = StageState::Fetched(species);
            }
            Err(err) => {
                warn!(region = %selected, "Species load failed: {err}");
                inner.snapshot.species = StageState::Failed(err);
            }
        }
        self.publish(&inner);
    }

    async fn run_enrichment_stage(&self, generation: u64) {
        let (selected, cr_subset) = {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                return;
            }
            let Some(selected) = inner.snapshot.region.fetched().cloned() else {
                return;
            };
            let Some(species) = inner.snapshot.species.fetched() else {
                return;
            };
            let cr_subset = species.critically_endangered.clone();
            if inner.enrichment_input.as_deref() == Some(taxon_ids(&cr_subset).as_slice())
                && inner.snapshot.enrichment.fetched().is_some()
            {
                return;
            }
            inner.snapshot.enrichment = StageState::Fetching;
            self.publish(&inner);
            (selected, cr_subset)
        };

        let result = enricher::enrich(self.catalog.as_ref(), &selected, &cr_subset).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!(region = %selected, "Discarding stale enrichment");
            return;
        }
        match result {
            Ok(enriched) => {
                inner.enrichment_input = Some(taxon_ids(&cr_subset));
                inner.snapshot.enrichment = StageState::Fetched(enriched);
            }
            Err(err) => {
                warn!(region = %selected, "Enrichment failed: {err}");
                inner.snapshot.enrichment = StageState::Failed(err);
            }
        }
        self.publish(&inner);
    }

    async fn run_mammal_stage(&self, generation: u64) {
        let all_species = {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                return;
            }
            let Some(species) = inner.snapshot.species.fetched() else {
                return;
            };
            let all_species = species.all.clone();
            if inner.mammal_input.as_deref() == Some(taxon_ids(&all_species).as_slice())
                && inner.snapshot.mammals.fetched().is_some()
            {
                return;
            }
            inner.snapshot.mammals = StageState::Fetching;
            self.publish(&inner);
            all_species
        };

        let result = mammals::filter_mammals(self.catalog.as_ref(), &all_species).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!("Discarding stale mammal filter result");
            return;
        }
        match result {
            Ok(filtered) => {
                inner.mammal_input = Some(taxon_ids(&all_species));
                inner.snapshot.mammals = StageState::Fetched(filtered);
            }
            Err(err) => {
                warn!("Mammal filter failed: {err}");
                inner.snapshot.mammals = StageState::Failed(err);
            }
        }
        self.publish(&inner);
    }

    fn publish(&self, inner: &Inner) {
        let _ = self.snapshot_tx.send_replace(inner.snapshot.clone());
    }
}

/// Fingerprint of a stage input: the record ids in order.
fn taxon_ids(species: &[SpeciesRecord]) -> Vec<u64> {
    species.iter().map(|s| s.id).collect()
}
