//! Remote catalog capability
//!
//! The pipeline consumes the Red List catalog through the [`CatalogClient`]
//! trait so the stages stay independent of the HTTP transport. The concrete
//! REST implementation lives in [`http`]; tests substitute scripted fakes.

pub mod http;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::Category;

/// One entry of the catalog's region list.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionEntry {
    #[serde(default)]
    pub name: Option<String>,
    pub identifier: String,
}

/// A raw species record exactly as the catalog returns it. Taxonomy fields
/// are nullable on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpecies {
    pub taxonid: u64,
    #[serde(default)]
    pub kingdom_name: Option<String>,
    #[serde(default)]
    pub phylum_name: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub order_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub genus_name: Option<String>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub category: Category,
}

/// A conservation measure attached to a species within a region.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasureEntry {
    #[serde(default)]
    pub code: Option<String>,
    pub title: String,
}

/// A member of a comparative species group (only the taxon id is used).
#[derive(Debug, Clone, Deserialize)]
pub struct GroupSpecies {
    pub taxonid: u64,
}

/// Access to the remote biodiversity catalog.
///
/// Every operation is a single authenticated GET returning parsed JSON.
/// Implementations own their transport; the pipeline only sees collections
/// of raw records or an error.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// List all regions the catalog knows about.
    async fn list_regions(&self) -> Result<Vec<RegionEntry>>;

    /// List the species assessed for a region, one page at a time.
    async fn species_by_region(&self, region: &str, page: u32) -> Result<Vec<RawSpecies>>;

    /// List the conservation measures for one species within a region.
    async fn measures_by_species(&self, taxon_id: u64, region: &str) -> Result<Vec<MeasureEntry>>;

    /// List the members of a comparative group, e.g. `"mammals"`.
    async fn species_by_group(&self, group: &str) -> Result<Vec<GroupSpecies>>;
}
