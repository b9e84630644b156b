//! HTTP transport to a Solr core

use crate::config::SolrConfig;
use crate::search::error::{SearchError, SearchResult};
use crate::search::query::CompiledQuery;
use crate::search::suggest::{HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN};
use crate::search::transport::{RawResponse, SearchTransport};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Solr client for the select and suggest handlers
#[derive(Clone)]
pub struct SolrClient {
    client: Client,
    select_url: String,
    suggest_url: String,
    dictionary: String,
}

impl SolrClient {
    /// Create a new client for the configured core
    pub fn new(config: &SolrConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SearchError::InvalidConfiguration(format!("Failed to create HTTP client: {}", e))
            })?;

        let core_url = format!("{}/{}", config.base_url.trim_end_matches('/'), config.core);

        Ok(Self {
            client,
            select_url: format!("{}/{}", core_url, config.query_handler),
            suggest_url: format!("{}/{}", core_url, config.suggest_handler),
            dictionary: config.suggest_dictionary.clone(),
        })
    }

    /// Send a request and parse the JSON body
    async fn send(&self, request: RequestBuilder) -> SearchResult<Value> {
        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                return SearchError::UnexpectedFailure(format!("Invalid Solr request: {}", e));
            }
            warn!(error = %e, timeout = e.is_timeout(), "Solr request failed");
            SearchError::transport(format!("Solr request failed: {}", e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::transport(format!("Failed to read Solr response: {}", e)))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Solr returned an error status");
            return Err(SearchError::TransportFailure {
                message: format!("Solr returned HTTP {}", status.as_u16()),
                status: Some(status.as_u16()),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SearchTransport for SolrClient {
    async fn execute(&self, query: CompiledQuery) -> SearchResult<RawResponse> {
        let params = query.to_params();
        debug!(url = %self.select_url, ?params, "Executing Solr query");

        let request = self
            .client
            .post(&self.select_url)
            .query(&[("wt", "json")])
            .form(&params);

        let body = self.send(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn suggest(&self, term: &str, rows: usize) -> SearchResult<Vec<String>> {
        debug!(url = %self.suggest_url, term = %term, rows, "Requesting Solr suggestions");

        let count = rows.to_string();
        let request = self.client.get(&self.suggest_url).query(&[
            ("wt", "json"),
            ("suggest.q", term),
            ("suggest.count", count.as_str()),
            ("suggest.build", "false"),
        ]);

        let body = self.send(request).await?;
        Ok(parse_suggestions(&body, &self.dictionary, rows))
    }
}

/// Suggestion terms under `suggest.<dictionary>.<term>.suggestions`, with the
/// suggester's own markup removed, upper-cased and de-duplicated
fn parse_suggestions(body: &Value, dictionary: &str, rows: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    let entries = body
        .get("suggest")
        .and_then(|s| s.get(dictionary))
        .and_then(Value::as_object);

    for entry in entries.into_iter().flat_map(|e| e.values()) {
        let suggestions = entry
            .get("suggestions")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for term in suggestions.iter().filter_map(|s| s.get("term").and_then(Value::as_str)) {
            let name = term
                .replace(HIGHLIGHT_OPEN, "")
                .replace(HIGHLIGHT_CLOSE, "")
                .to_uppercase();
            if names.len() < rows && !names.contains(&name) {
                names.push(name);
            }
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::clause::Clause;
    use mockito::Matcher;
    use serde_json::json;

    fn config(base_url: &str) -> SolrConfig {
        SolrConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            ..SolrConfig::default()
        }
    }

    #[test]
    fn test_parse_suggestions() {
        let body = json!({
            "suggest": {
                "name": {
                    "acme": {
                        "numFound": 3,
                        "suggestions": [
                            {"term": "<b>ACME</b> LTD", "weight": 0},
                            {"term": "acme ltd", "weight": 0},
                            {"term": "<b>ACME</b> TRADING", "weight": 0}
                        ]
                    }
                }
            }
        });

        assert_eq!(parse_suggestions(&body, "name", 10), vec!["ACME LTD", "ACME TRADING"]);
        assert_eq!(parse_suggestions(&body, "name", 1), vec!["ACME LTD"]);
        assert!(parse_suggestions(&body, "other", 10).is_empty());
        assert!(parse_suggestions(&json!({}), "name", 10).is_empty());
    }

    #[tokio::test]
    async fn test_execute_posts_compiled_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search/select")
            .match_query(Matcher::UrlEncoded("wt".into(), "json".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("q=name_q%3A%28ACME%29".into()),
                Matcher::Regex("rows=7".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"response": {"numFound": 1, "start": 0, "docs": [{"name": "ACME"}]}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = SolrClient::new(&config(&server.url())).unwrap();
        let query = CompiledQuery::builder(Clause::term("name_q", "ACME"))
            .paging(0, 7)
            .build();

        let raw = client.execute(query).await.unwrap();
        assert_eq!(raw.response.num_found, 1);
        assert_eq!(raw.field_values("name").collect::<Vec<_>>(), vec!["ACME"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/search/select")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = SolrClient::new(&config(&server.url())).unwrap();
        let result = client
            .execute(CompiledQuery::builder(Clause::MatchAll).build())
            .await;

        match result {
            Err(SearchError::TransportFailure { status, .. }) => assert_eq!(status, Some(500)),
            other => panic!("Expected transport failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/search/select")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = SolrClient::new(&config(&server.url())).unwrap();
        let result = client
            .execute(CompiledQuery::builder(Clause::MatchAll).build())
            .await;

        assert!(matches!(result, Err(SearchError::TransportFailure { status: None, .. })));
    }

    #[tokio::test]
    async fn test_suggest_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/suggest")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("suggest.q".into(), "acme".into()),
                Matcher::UrlEncoded("suggest.count".into(), "5".into()),
                Matcher::UrlEncoded("suggest.build".into(), "false".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "suggest": {"name": {"acme": {"numFound": 1, "suggestions": [{"term": "<b>Acme</b> Ltd"}]}}}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = SolrClient::new(&config(&server.url())).unwrap();
        let names = client.suggest("acme", 5).await.unwrap();

        assert_eq!(names, vec!["ACME LTD"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let client = SolrClient::new(&config("http://127.0.0.1:1")).unwrap();
        let result = client.suggest("acme", 5).await;
        assert!(matches!(result, Err(SearchError::TransportFailure { .. })));
    }

    #[tokio::test]
    async fn test_unbuildable_request_is_unexpected_failure() {
        let client = SolrClient::new(&config("not a url")).unwrap();
        let result = client.suggest("acme", 5).await;
        assert!(matches!(result, Err(SearchError::UnexpectedFailure(_))));
    }
}
