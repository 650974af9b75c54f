//! Region Selector stage
//!
//! Fetches the catalog's region list and draws one identifier uniformly at
//! random. The draw is injectable so callers and tests can pin it.

use rand::Rng;
use tracing::info;

use crate::catalog::CatalogClient;
use crate::pipeline::error::{PipelineError, StageResult};

/// Pick a random region from the catalog.
pub async fn select_region<C>(catalog: &C) -> StageResult<String>
where
    C: CatalogClient + ?Sized,
{
    select_region_with(catalog, |len| rand::thread_rng().gen_range(0..len)).await
}

/// Same as [`select_region`], with `pick` mapping the region count to the
/// chosen index. Out-of-range picks clamp to the last entry.
pub async fn select_region_with<C>(
    catalog: &C,
    pick: impl FnOnce(usize) -> usize,
) -> StageResult<String>
where
    C: CatalogClient + ?Sized,
{
    let regions = catalog
        .list_regions()
        .await
        .map_err(PipelineError::unavailable)?;

    if regions.is_empty() {
        return Err(PipelineError::EmptyCatalog);
    }

    let index = pick(regions.len()).min(regions.len() - 1);
    let region = regions[index].identifier.clone();
    info!(%region, candidates = regions.len(), "Selected random region");
    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GroupSpecies, MeasureEntry, RawSpecies, RegionEntry};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    struct RegionListCatalog {
        regions: Vec<&'static str>,
        fail: bool,
    }

    #[async_trait]
    impl CatalogClient for RegionListCatalog {
        async fn list_regions(&self) -> Result<Vec<RegionEntry>> {
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(self
                .regions
                .iter()
                .map(|id| RegionEntry {
                    name: None,
                    identifier: id.to_string(),
                })
                .collect())
        }

        async fn species_by_region(&self, _: &str, _: u32) -> Result<Vec<RawSpecies>> {
            unreachable!("region selection never fetches species")
        }

        async fn measures_by_species(&self, _: u64, _: &str) -> Result<Vec<MeasureEntry>> {
            unreachable!()
        }

        async fn species_by_group(&self, _: &str) -> Result<Vec<GroupSpecies>> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_selected_region_is_always_in_the_list() {
        let catalog = RegionListCatalog {
            regions: vec!["africa", "europe", "mediterranean"],
            fail: false,
        };

        for _ in 0..20 {
            let region = select_region(&catalog).await.unwrap();
            assert!(catalog.regions.contains(&region.as_str()));
        }
    }

    #[tokio::test]
    async fn test_pinned_draw_selects_that_index() {
        let catalog = RegionListCatalog {
            regions: vec!["africa", "mediterranean"],
            fail: false,
        };

        let region = select_region_with(&catalog, |_| 1).await.unwrap();
        assert_eq!(region, "mediterranean");
    }

    #[tokio::test]
    async fn test_empty_region_list_fails() {
        let catalog = RegionListCatalog {
            regions: vec![],
            fail: false,
        };

        let err = select_region(&catalog).await.unwrap_err();
        assert_eq!(err, PipelineError::EmptyCatalog);
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_catalog_unavailable() {
        let catalog = RegionListCatalog {
            regions: vec!["africa"],
            fail: true,
        };

        let err = select_region(&catalog).await.unwrap_err();
        assert!(matches!(err, PipelineError::CatalogUnavailable(_)));
    }
}
