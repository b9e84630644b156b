//! Contract between the query core and the search engine

use crate::search::error::SearchResult;
use crate::search::query::CompiledQuery;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Executes compiled queries against the search engine
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Run a compiled select query
    async fn execute(&self, query: CompiledQuery) -> SearchResult<RawResponse>;

    /// Engine-native name suggestions for `term`, best first
    async fn suggest(&self, term: &str, rows: usize) -> SearchResult<Vec<String>>;
}

/// Select response as returned by the engine.
///
/// Missing sections deserialize to their empty defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResponse {
    #[serde(default)]
    pub response: ResponseBody,

    /// JSON Facet API output, absent when no facets were requested
    #[serde(default)]
    pub facets: Option<Value>,
}

/// Matched documents and paging information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseBody {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,

    #[serde(default)]
    pub start: Option<u64>,

    #[serde(default)]
    pub docs: Vec<Value>,
}

impl RawResponse {
    pub fn docs(&self) -> &[Value] {
        &self.response.docs
    }

    /// String value of `field` in each document, skipping documents without it
    pub fn field_values<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.response
            .docs
            .iter()
            .filter_map(move |doc| doc.get(field).and_then(Value::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparse_response_defaults() {
        let raw: RawResponse = serde_json::from_value(json!({"responseHeader": {"status": 0}})).unwrap();
        assert_eq!(raw.response.num_found, 0);
        assert!(raw.response.start.is_none());
        assert!(raw.docs().is_empty());
        assert!(raw.facets.is_none());
    }

    #[test]
    fn test_field_values_skips_missing() {
        let raw: RawResponse = serde_json::from_value(json!({
            "response": {
                "numFound": 3,
                "start": 0,
                "docs": [{"name": "ACME LTD"}, {"identifier": "BC1"}, {"name": "ACME CO"}]
            }
        }))
        .unwrap();

        let names: Vec<&str> = raw.field_values("name").collect();
        assert_eq!(names, vec!["ACME LTD", "ACME CO"]);
        assert_eq!(raw.response.start, Some(0));
    }

    #[test]
    fn test_malformed_docs_rejected() {
        let raw = serde_json::from_value::<RawResponse>(json!({"response": {"docs": "oops"}}));
        assert!(raw.is_err());
    }
}
