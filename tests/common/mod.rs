//! Common test utilities
//!
//! A scripted [`SearchTransport`] that serves canned engine responses and
//! records what the service sent.

#![allow(dead_code)]

use async_trait::async_trait;
use registry_search_api::search::{
    CompiledQuery, RawResponse, SearchError, SearchResult, SearchService, SearchTransport,
    SearchConfig,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<SearchResult<RawResponse>>>,
    suggestions: Mutex<Vec<String>>,
    executed: Mutex<Vec<CompiledQuery>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a select response
    pub fn respond(self, body: Value) -> Self {
        let raw = serde_json::from_value(body).expect("valid canned response");
        self.responses.lock().unwrap().push_back(Ok(raw));
        self
    }

    /// Queue a transport failure
    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(SearchError::transport(message)));
        self
    }

    pub fn with_suggestions(self, names: &[&str]) -> Self {
        *self.suggestions.lock().unwrap() = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn executed(&self) -> Vec<CompiledQuery> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTransport for StubTransport {
    async fn execute(&self, query: CompiledQuery) -> SearchResult<RawResponse> {
        self.executed.lock().unwrap().push(query);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::default()))
    }

    async fn suggest(&self, _term: &str, rows: usize) -> SearchResult<Vec<String>> {
        Ok(self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .take(rows)
            .cloned()
            .collect())
    }
}

/// Service over `transport` with default search settings
pub fn service(transport: Arc<StubTransport>) -> SearchService {
    SearchService::new(transport, SearchConfig::default())
}

/// Select response with the given documents
pub fn docs_response(num_found: u64, start: u64, docs: Value) -> Value {
    json!({
        "responseHeader": {"status": 0, "QTime": 3},
        "response": {"numFound": num_found, "start": start, "docs": docs}
    })
}

/// Select response carrying facet buckets under the categories wrapper
pub fn faceted_response(num_found: u64, docs: Value, facets: Value) -> Value {
    json!({
        "response": {"numFound": num_found, "start": 0, "docs": docs},
        "facets": {"count": num_found, "categories": facets}
    })
}
