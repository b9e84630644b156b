//! Search configuration

use crate::search::facets::FacetSpec;
use crate::search::fields::SolrField;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Defaults applied by the query compiler and suggestion aggregator
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchConfig {
    /// Page size used when a request gives no (or zero) rows
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_rows")]
    pub default_rows: usize,

    /// Fields returned for business documents
    #[validate(length(min = 1))]
    #[serde(default = "default_business_fields")]
    pub business_fields: Vec<String>,

    /// Fields returned for party documents
    #[validate(length(min = 1))]
    #[serde(default = "default_party_fields")]
    pub party_fields: Vec<String>,

    /// Facet fields counted on business search
    #[serde(default = "default_business_facets")]
    pub business_facets: Vec<String>,

    /// Facet fields counted on party search
    #[serde(default = "default_party_facets")]
    pub party_facets: Vec<String>,

    /// Maximum buckets returned per facet field
    #[validate(range(min = 1))]
    #[serde(default = "default_facet_limit")]
    pub facet_limit: usize,

    /// Party roles accepted by party search
    #[validate(length(min = 1))]
    #[serde(default = "default_party_roles")]
    pub party_roles: Vec<String>,
}

impl SearchConfig {
    pub fn business_facet_spec(&self) -> FacetSpec {
        FacetSpec::new(self.business_facets.clone(), self.facet_limit)
    }

    pub fn party_facet_spec(&self) -> FacetSpec {
        FacetSpec::new(self.party_facets.clone(), self.facet_limit)
    }

    /// Rows to request: `rows` unless unset or zero
    pub fn rows_or_default(&self, rows: Option<usize>) -> usize {
        match rows {
            Some(rows) if rows > 0 => rows,
            _ => self.default_rows,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_rows: default_rows(),
            business_fields: default_business_fields(),
            party_fields: default_party_fields(),
            business_facets: default_business_facets(),
            party_facets: default_party_facets(),
            facet_limit: default_facet_limit(),
            party_roles: default_party_roles(),
        }
    }
}

fn default_rows() -> usize {
    10
}

fn default_business_fields() -> Vec<String> {
    [
        SolrField::BN,
        SolrField::IDENTIFIER,
        SolrField::TYPE,
        SolrField::NAME,
        SolrField::STATE,
    ]
    .iter()
    .map(|f| f.to_string())
    .collect()
}

fn default_party_fields() -> Vec<String> {
    [
        SolrField::PARENT_BN,
        SolrField::PARENT_IDENTIFIER,
        SolrField::PARENT_TYPE,
        SolrField::PARENT_NAME,
        SolrField::PARENT_STATE,
        SolrField::PARTY_NAME,
        SolrField::PARTY_ROLE,
        "partyType",
    ]
    .iter()
    .map(|f| f.to_string())
    .collect()
}

fn default_business_facets() -> Vec<String> {
    vec![SolrField::TYPE.to_string(), SolrField::STATE.to_string()]
}

fn default_party_facets() -> Vec<String> {
    vec![
        SolrField::PARENT_TYPE.to_string(),
        SolrField::PARENT_STATE.to_string(),
        SolrField::PARTY_ROLE.to_string(),
    ]
}

fn default_facet_limit() -> usize {
    100
}

fn default_party_roles() -> Vec<String> {
    vec!["partner".to_string(), "proprietor".to_string()]
}
