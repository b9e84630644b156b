//! Facet request specification and facet tree shaping

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Name of the query facet that wraps every terms facet
pub const FACET_BUCKET: &str = "categories";

/// Facet counts: field -> value -> document count
pub type FacetTree = BTreeMap<String, BTreeMap<String, u64>>;

/// Terms facets requested alongside a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetSpec {
    /// Fields to count values of
    pub fields: Vec<String>,
    /// Maximum buckets per field
    pub limit: usize,
}

impl FacetSpec {
    pub fn new(fields: Vec<String>, limit: usize) -> Self {
        Self { fields, limit }
    }

    /// Render as a Solr JSON Facet API request
    pub fn to_json(&self) -> Value {
        let mut facets = Map::new();
        for field in &self.fields {
            facets.insert(
                field.clone(),
                json!({"type": "terms", "field": field, "limit": self.limit}),
            );
        }

        json!({
            FACET_BUCKET: {
                "type": "query",
                "q": "*:*",
                "facet": Value::Object(facets),
            }
        })
    }
}

/// Flatten the engine's nested facet response into a [`FacetTree`].
///
/// Every field named by `spec` is present in the result, with an empty mapping
/// when the engine returned no buckets for it. Other bucketed fields found under
/// the wrapper are kept as well.
pub fn shape_facets(raw_facets: Option<&Value>, spec: &FacetSpec) -> FacetTree {
    let mut tree: FacetTree = spec
        .fields
        .iter()
        .map(|field| (field.clone(), BTreeMap::new()))
        .collect();

    let Some(categories) = raw_facets
        .and_then(|facets| facets.get(FACET_BUCKET))
        .and_then(Value::as_object)
    else {
        return tree;
    };

    for (field, facet) in categories {
        let Some(buckets) = facet.get("buckets").and_then(Value::as_array) else {
            continue;
        };

        let counts = tree.entry(field.clone()).or_default();
        for bucket in buckets {
            let value = match bucket.get("val") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => continue,
                Some(other) => other.to_string(),
            };
            let count = bucket.get("count").and_then(Value::as_u64).unwrap_or(0);
            counts.insert(value, count);
        }
    }

    tree
}
