//! Region Species Loader stage
//!
//! Fetches page 0 of a region's species, normalizes the records, and splits
//! off the critically endangered sub-sequence in catalog order.

use tracing::debug;

use crate::catalog::CatalogClient;
use crate::models::SpeciesRecord;
use crate::pipeline::error::{PipelineError, StageResult};
use crate::pipeline::state::RegionalSpecies;

pub async fn load_species<C>(catalog: &C, region: &str) -> StageResult<RegionalSpecies>
where
    C: CatalogClient + ?Sized,
{
    // Guards against issuing a request for a placeholder region. The
    // coordinator already refuses to run this stage without one.
    if region.trim().is_empty() {
        return Err(PipelineError::InvalidRegion);
    }

    let raw = catalog
        .species_by_region(region, 0)
        .await
        .map_err(PipelineError::unavailable)?;

    let all: Vec<SpeciesRecord> = raw.into_iter().map(SpeciesRecord::from).collect();
    let critically_endangered: Vec<SpeciesRecord> = all
        .iter()
        .filter(|species| species.is_critically_endangered())
        .cloned()
        .collect();

    debug!(
        region,
        total = all.len(),
        cr = critically_endangered.len(),
        "Loaded regional species"
    );

    Ok(RegionalSpecies {
        all,
        critically_endangered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GroupSpecies, MeasureEntry, RawSpecies, RegionEntry};
    use crate::models::Category;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SpeciesPageCatalog {
        species: Vec<(u64, Category)>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl SpeciesPageCatalog {
        fn new(species: Vec<(u64, Category)>) -> Self {
            Self {
                species,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CatalogClient for SpeciesPageCatalog {
        async fn list_regions(&self) -> Result<Vec<RegionEntry>> {
            unreachable!()
        }

        async fn species_by_region(&self, _: &str, page: u32) -> Result<Vec<RawSpecies>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(page, 0);
            if self.fail {
                return Err(anyhow!("503 service unavailable"));
            }
            Ok(self
                .species
                .iter()
                .map(|(id, category)| RawSpecies {
                    taxonid: *id,
                    kingdom_name: None,
                    phylum_name: None,
                    class_name: None,
                    order_name: None,
                    family_name: None,
                    genus_name: None,
                    scientific_name: Some(format!("species-{id}")),
                    category: *category,
                })
                .collect())
        }

        async fn measures_by_species(&self, _: u64, _: &str) -> Result<Vec<MeasureEntry>> {
            unreachable!()
        }

        async fn species_by_group(&self, _: &str) -> Result<Vec<GroupSpecies>> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_cr_subset_is_exact_and_order_preserving() {
        let catalog = SpeciesPageCatalog::new(vec![
            (1, Category::LeastConcern),
            (2, Category::CriticallyEndangered),
            (3, Category::Endangered),
            (4, Category::CriticallyEndangered),
        ]);

        let loaded = load_species(&catalog, "mediterranean").await.unwrap();
        assert_eq!(loaded.all.len(), 4);

        let cr_ids: Vec<u64> = loaded.critically_endangered.iter().map(|s| s.id).collect();
        assert_eq!(cr_ids, vec![2, 4]);
        assert!(loaded.critically_endangered.len() <= loaded.all.len());
        assert!(loaded
            .all
            .iter()
            .all(|s| s.conservation_measures.is_none()));
    }

    #[tokio::test]
    async fn test_empty_region_is_rejected_without_a_request() {
        let catalog = SpeciesPageCatalog::new(vec![(1, Category::LeastConcern)]);

        let err = load_species(&catalog, "  ").await.unwrap_err();
        assert_eq!(err, PipelineError::InvalidRegion);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_catalog_unavailable() {
        let mut catalog = SpeciesPageCatalog::new(vec![]);
        catalog.fail = true;

        let err = load_species(&catalog, "mediterranean").await.unwrap_err();
        assert!(matches!(err, PipelineError::CatalogUnavailable(_)));
    }
}
