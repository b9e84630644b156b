//! Main search service implementation

use crate::search::config::SearchConfig;
use crate::search::error::SearchResult;
use crate::search::facets::FacetSpec;
use crate::search::fields::PRIMARY_TERM_KEY;
use crate::search::query::{CompiledQuery, QueryCompiler, SearchFlavor, SearchParams, BUSINESS, PARTY};
use crate::search::shaper::{category_echo, shape_search_envelope, SearchEnvelope};
use crate::search::suggest::{SuggestQueryInfo, SuggestResponse, SuggestionAggregator};
use crate::search::transport::SearchTransport;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Composes compilation, execution and shaping for each request flow
pub struct SearchService {
    transport: Arc<dyn SearchTransport>,
    config: SearchConfig,
}

impl SearchService {
    /// Create a new search service
    pub fn new(transport: Arc<dyn SearchTransport>, config: SearchConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Faceted business search
    pub async fn business_search(&self, params: &SearchParams) -> SearchResult<SearchEnvelope> {
        let query = QueryCompiler::new(&self.config).compile_business_query(params)?;
        self.run("business", query, params, &BUSINESS, self.config.business_facet_spec())
            .await
    }

    /// Faceted party search
    pub async fn party_search(&self, params: &SearchParams) -> SearchResult<SearchEnvelope> {
        let query = QueryCompiler::new(&self.config).compile_party_query(params)?;
        self.run("party", query, params, &PARTY, self.config.party_facet_spec())
            .await
    }

    /// Typeahead suggestions for business names, identifiers and business numbers
    pub async fn business_suggest(
        &self,
        term: &str,
        highlight: bool,
        rows: Option<usize>,
    ) -> SearchResult<SuggestResponse> {
        let start_time = Instant::now();

        let results = SuggestionAggregator::new(self.transport.as_ref(), &self.config)
            .aggregate(term, highlight, rows)
            .await
            .map_err(|e| {
                warn!(term = %term, error = %e, "Suggestion request failed");
                e
            })?;

        info!(
            term = %term,
            results = results.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Suggestions served"
        );

        Ok(SuggestResponse {
            query_info: SuggestQueryInfo {
                rows,
                highlight,
                query: term.to_string(),
            },
            results,
        })
    }

    async fn run(
        &self,
        flavor_name: &str,
        query: CompiledQuery,
        params: &SearchParams,
        flavor: &SearchFlavor,
        facets: FacetSpec,
    ) -> SearchResult<SearchEnvelope> {
        let start_time = Instant::now();
        let (start, rows) = (query.start(), query.rows());

        let raw = self.transport.execute(query).await.map_err(|e| {
            warn!(flavor = flavor_name, error = %e, "Search request failed");
            e
        })?;

        info!(
            flavor = flavor_name,
            total = raw.response.num_found,
            returned = raw.docs().len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Search served"
        );

        Ok(shape_search_envelope(
            raw,
            query_echo(params, flavor),
            categories_echo(params, flavor),
            start,
            rows,
            &facets,
        ))
    }
}

/// Primary term plus every sub-term the flavor accepts, empty when not supplied
fn query_echo(params: &SearchParams, flavor: &SearchFlavor) -> BTreeMap<String, String> {
    std::iter::once(PRIMARY_TERM_KEY)
        .chain(flavor.query_keys())
        .map(|key| (key.to_string(), params.term(key).to_string()))
        .collect()
}

fn categories_echo(
    params: &SearchParams,
    flavor: &SearchFlavor,
) -> BTreeMap<String, serde_json::Value> {
    flavor
        .filters
        .iter()
        .map(|filter| {
            (
                filter.field.to_string(),
                category_echo(params.category(filter.category)),
            )
        })
        .collect()
}
