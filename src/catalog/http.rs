//! Red List v3 REST client
//!
//! Thin reqwest wrapper implementing [`CatalogClient`]. The access token is
//! passed as a query parameter on every request, which is how the v3 API
//! authenticates.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{CatalogClient, GroupSpecies, MeasureEntry, RawSpecies, RegionEntry};
use crate::config::Config;

// The region list nests under "results"; every other endpoint uses "result".
#[derive(Deserialize)]
struct RegionListResponse {
    #[serde(default)]
    results: Vec<RegionEntry>,
}

#[derive(Deserialize)]
struct SpeciesPageResponse {
    #[serde(default)]
    result: Vec<RawSpecies>,
}

#[derive(Deserialize)]
struct MeasureListResponse {
    #[serde(default)]
    result: Vec<MeasureEntry>,
}

#[derive(Deserialize)]
struct GroupSpeciesResponse {
    #[serde(default)]
    result: Vec<GroupSpecies>,
}

pub struct RedListClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RedListClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        debug!(%url, "Catalog request");

        let response = self
            .client
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .context("Failed to send catalog request")?
            .error_for_status()
            .context("Catalog returned an error status")?;

        response
            .json::<T>()
            .await
            .context("Failed to decode catalog response")
    }
}

#[async_trait]
impl CatalogClient for RedListClient {
    async fn list_regions(&self) -> Result<Vec<RegionEntry>> {
        let url = self.endpoint("region/list");
        Ok(self.get_json::<RegionListResponse>(url).await?.results)
    }

    async fn species_by_region(&self, region: &str, page: u32) -> Result<Vec<RawSpecies>> {
        let url = self.endpoint(&format!(
            "species/region/{}/page/{}",
            urlencoding::encode(region),
            page
        ));
        Ok(self.get_json::<SpeciesPageResponse>(url).await?.result)
    }

    async fn measures_by_species(&self, taxon_id: u64, region: &str) -> Result<Vec<MeasureEntry>> {
        let url = self.endpoint(&format!(
            "measures/species/id/{}/region/{}",
            taxon_id,
            urlencoding::encode(region)
        ));
        Ok(self.get_json::<MeasureListResponse>(url).await?.result)
    }

    async fn species_by_group(&self, group: &str) -> Result<Vec<GroupSpecies>> {
        let url = self.endpoint(&format!(
            "comp-group/getspecies/{}",
            urlencoding::encode(group)
        ));
        Ok(self.get_json::<GroupSpeciesResponse>(url).await?.result)
    }
}
