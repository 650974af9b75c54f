//! Species domain model
//!
//! Normalized taxonomic entries plus the IUCN category enumeration.

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::RawSpecies;

/// IUCN Red List category codes, including the legacy Lower Risk codes the
/// catalog still emits for assessments that predate the current scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    #[serde(rename = "EX")]
    Extinct,
    #[serde(rename = "EW")]
    ExtinctInTheWild,
    #[serde(rename = "CR")]
    CriticallyEndangered,
    #[serde(rename = "EN")]
    Endangered,
    #[serde(rename = "VU")]
    Vulnerable,
    #[serde(rename = "NT")]
    NearThreatened,
    #[serde(rename = "LC")]
    LeastConcern,
    #[serde(rename = "DD")]
    DataDeficient,
    #[serde(rename = "NE")]
    NotEvaluated,
    #[serde(rename = "LR/lc")]
    LowerRiskLeastConcern,
    #[serde(rename = "LR/nt")]
    LowerRiskNearThreatened,
    #[serde(rename = "LR/cd")]
    LowerRiskConservationDependent,
    /// Any code the catalog emits that we do not recognize. Kept so a single
    /// odd record does not fail a whole species page.
    Unknown,
}

impl Category {
    pub fn from_code(code: &str) -> Self {
        match code {
            "EX" => Category::Extinct,
            "EW" => Category::ExtinctInTheWild,
            "CR" => Category::CriticallyEndangered,
            "EN" => Category::Endangered,
            "VU" => Category::Vulnerable,
            "NT" => Category::NearThreatened,
            "LC" => Category::LeastConcern,
            "DD" => Category::DataDeficient,
            "NE" => Category::NotEvaluated,
            "LR/lc" => Category::LowerRiskLeastConcern,
            "LR/nt" => Category::LowerRiskNearThreatened,
            "LR/cd" => Category::LowerRiskConservationDependent,
            _ => Category::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(Category::from_code(&code))
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Unknown
    }
}

/// One normalized taxonomic entry from the catalog.
///
/// `conservation_measures` is `None` until the enrichment stage has run for
/// this record; an enriched record with zero known measures carries
/// `Some(String::new())`, which is a different statement than "not enriched".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: u64,
    pub kingdom: String,
    pub phylum: String,
    pub class: String,
    pub order: String,
    pub family: String,
    pub genus: String,
    pub scientific_name: String,
    pub category: Category,
    pub conservation_measures: Option<String>,
}

impl SpeciesRecord {
    pub fn is_critically_endangered(&self) -> bool {
        self.category == Category::CriticallyEndangered
    }
}

impl From<RawSpecies> for SpeciesRecord {
    fn from(raw: RawSpecies) -> Self {
        Self {
            id: raw.taxonid,
            kingdom: raw.kingdom_name.unwrap_or_default(),
            phylum: raw.phylum_name.unwrap_or_default(),
            class: raw.class_name.unwrap_or_default(),
            order: raw.order_name.unwrap_or_default(),
            family: raw.family_name.unwrap_or_default(),
            genus: raw.genus_name.unwrap_or_default(),
            scientific_name: raw.scientific_name.unwrap_or_default(),
            category: raw.category,
            conservation_measures: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes_roundtrip() {
        let cr: Category = serde_json::from_str("\"CR\"").unwrap();
        assert_eq!(cr, Category::CriticallyEndangered);

        let legacy: Category = serde_json::from_str("\"LR/cd\"").unwrap();
        assert_eq!(legacy, Category::LowerRiskConservationDependent);

        let odd: Category = serde_json::from_str("\"??\"").unwrap();
        assert_eq!(odd, Category::Unknown);
    }

    #[test]
    fn test_normalization_from_raw() {
        let raw = RawSpecies {
            taxonid: 100,
            kingdom_name: Some("PLANTAE".to_string()),
            phylum_name: Some("TRACHEOPHYTA".to_string()),
            class_name: None,
            order_name: Some("ALISMATALES".to_string()),
            family_name: Some("POSIDONIACEAE".to_string()),
            genus_name: Some("Posidonia".to_string()),
            scientific_name: Some("Posidonia oceanica".to_string()),
            category: Category::CriticallyEndangered,
        };

        let record = SpeciesRecord::from(raw);
        assert_eq!(record.id, 100);
        assert_eq!(record.class, "");
        assert_eq!(record.scientific_name, "Posidonia oceanica");
        assert!(record.is_critically_endangered());
        assert_eq!(record.conservation_measures, None);
    }
}
