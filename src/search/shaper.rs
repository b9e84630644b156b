//! Client-facing search envelope

use crate::search::facets::{shape_facets, FacetSpec, FacetTree};
use crate::search::transport::RawResponse;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Faceted search response returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnvelope {
    pub facets: FacetTree,
    pub search_results: SearchResults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query_info: QueryInfo,
    pub total_results: u64,
    /// Engine documents, untouched
    pub results: Vec<Value>,
}

/// Echo of the request that produced the results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryInfo {
    pub rows: usize,
    pub query: BTreeMap<String, String>,
    pub categories: BTreeMap<String, Value>,
    pub start: u64,
}

/// Echo form of a category filter: the values, or `""` when unset
pub fn category_echo(values: Option<&[String]>) -> Value {
    match values {
        Some(values) => Value::from(values.to_vec()),
        None => Value::String(String::new()),
    }
}

/// Map a raw engine response into a [`SearchEnvelope`].
///
/// `start` is only used when the engine does not report one.
pub fn shape_search_envelope(
    raw: RawResponse,
    query: BTreeMap<String, String>,
    categories: BTreeMap<String, Value>,
    start: usize,
    rows: usize,
    facet_spec: &FacetSpec,
) -> SearchEnvelope {
    let facets = shape_facets(raw.facets.as_ref(), facet_spec);
    let body = raw.response;

    SearchEnvelope {
        facets,
        search_results: SearchResults {
            query_info: QueryInfo {
                rows,
                query,
                categories,
                start: body.start.unwrap_or(start as u64),
            },
            total_results: body.num_found,
            results: body.docs,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> FacetSpec {
        FacetSpec::new(vec!["legalType".to_string(), "status".to_string()], 100)
    }

    #[test]
    fn test_envelope_shape() {
        let raw: RawResponse = serde_json::from_value(json!({
            "response": {
                "numFound": 42,
                "start": 20,
                "docs": [{"identifier": "BC1", "name": "ACME", "score": 1.5}]
            },
            "facets": {
                "count": 42,
                "categories": {
                    "count": 42,
                    "legalType": {"buckets": [{"val": "BC", "count": 30}, {"val": "CP", "count": 12}]}
                }
            }
        }))
        .unwrap();

        let mut query = BTreeMap::new();
        query.insert("value".to_string(), "ACME".to_string());
        let mut categories = BTreeMap::new();
        categories.insert("legalType".to_string(), category_echo(Some(&["BC".to_string()][..])));
        categories.insert("status".to_string(), category_echo(None));

        let envelope = shape_search_envelope(raw, query, categories, 0, 10, &spec());
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["facets"]["legalType"]["BC"], 30);
        assert_eq!(value["facets"]["status"], json!({}));
        assert_eq!(value["searchResults"]["totalResults"], 42);
        assert_eq!(value["searchResults"]["queryInfo"]["start"], 20);
        assert_eq!(value["searchResults"]["queryInfo"]["rows"], 10);
        assert_eq!(value["searchResults"]["queryInfo"]["categories"]["status"], "");
        assert_eq!(value["searchResults"]["queryInfo"]["categories"]["legalType"], json!(["BC"]));
        assert_eq!(value["searchResults"]["results"][0]["score"], 1.5);
    }

    #[test]
    fn test_requested_start_used_when_engine_omits_it() {
        let envelope = shape_search_envelope(
            RawResponse::default(),
            BTreeMap::new(),
            BTreeMap::new(),
            30,
            10,
            &spec(),
        );

        assert_eq!(envelope.search_results.query_info.start, 30);
        assert_eq!(envelope.search_results.total_results, 0);
        assert!(envelope.search_results.results.is_empty());
        assert_eq!(envelope.facets.len(), 2);
    }
}
