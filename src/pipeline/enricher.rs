//! Measure Enricher stage
//!
//! Fans out one concurrent measures request per critically endangered
//! species, then merges the joined titles back into a fresh copy of the
//! input. The batch commits as a unit: one failed sub-request fails the
//! whole stage and none of the partial results are applied.

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::catalog::CatalogClient;
use crate::models::SpeciesRecord;
use crate::pipeline::error::{PipelineError, StageResult};

/// Separator between measure titles in the merged summary field.
pub const MEASURE_SEPARATOR: &str = "; ";

pub async fn enrich<C>(
    catalog: &C,
    region: &str,
    critically_endangered: &[SpeciesRecord],
) -> StageResult<Vec<SpeciesRecord>>
where
    C: CatalogClient + ?Sized,
{
    if critically_endangered.is_empty() {
        return Ok(Vec::new());
    }

    let fetches = critically_endangered.iter().map(|species| async move {
        let measures = catalog.measures_by_species(species.id, region).await?;
        let joined = measures
            .iter()
            .map(|measure| measure.title.as_str())
            .collect::<Vec<_>>()
            .join(MEASURE_SEPARATOR);
        Ok::<String, anyhow::Error>(joined)
    });

    // join_all keeps input order and resolves every sub-request before we
    // look at any result, so a late failure still cancels the whole batch.
    let results = join_all(fetches).await;

    let mut enriched = Vec::with_capacity(critically_endangered.len());
    for (species, result) in critically_endangered.iter().zip(results) {
        match result {
            Ok(measures) => {
                let mut record = species.clone();
                record.conservation_measures = Some(measures);
                enriched.push(record);
            }
            Err(err) => {
                warn!(taxon_id = species.id, region, "Measure fetch failed: {err:#}");
                return Err(PipelineError::unavailable(err));
            }
        }
    }

    debug!(region, enriched = enriched.len(), "Merged conservation measures");
    Ok(enriched)
}
