//! Mammal Filter stage
//!
//! Fetches the mammal comparative group once and keeps the regional species
//! whose taxon ids are members, preserving catalog order.

use std::collections::HashSet;

use tracing::debug;

use crate::catalog::CatalogClient;
use crate::models::SpeciesRecord;
use crate::pipeline::error::{PipelineError, StageResult};

/// Comparative group name the catalog uses for the mammal class.
pub const MAMMAL_GROUP: &str = "mammals";

pub async fn filter_mammals<C>(
    catalog: &C,
    all_species: &[SpeciesRecord],
) -> StageResult<Vec<SpeciesRecord>>
where
    C: CatalogClient + ?Sized,
{
    if all_species.is_empty() {
        return Ok(Vec::new());
    }

    let group = catalog
        .species_by_group(MAMMAL_GROUP)
        .await
        .map_err(PipelineError::unavailable)?;

    let mammal_ids: HashSet<u64> = group.iter().map(|member| member.taxonid).collect();
    let mammals: Vec<SpeciesRecord> = all_species
        .iter()
        .filter(|species| mammal_ids.contains(&species.id))
        .cloned()
        .collect();

    debug!(
        group_size = mammal_ids.len(),
        regional = all_species.len(),
        mammals = mammals.len(),
        "Intersected regional species with mammal group"
    );
    Ok(mammals)
}
