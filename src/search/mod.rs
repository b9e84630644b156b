//! Business registry search over a Solr index
//!
//! This module turns loosely structured search parameters into weighted,
//! faceted, filtered Solr requests and shapes the raw responses into the
//! client-facing envelopes:
//!
//! - **Normalization**: user text is cleaned once, escaping happens at serialization
//! - **Query compilation**: business, party, suggestion lookup and identifier queries
//! - **Suggestions**: staged name, extra name and identifier/business number matches
//! - **Shaping**: facet trees and the search results envelope
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │           Search Service                         │
//! ├─────────────────────────────────────────────────┤
//! │  - business_search()  - party_search()          │
//! │  - business_suggest()                           │
//! └─────────────────────────────────────────────────┘
//!          │                            │
//!          ▼                            ▼
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │  QueryCompiler        │   │ SuggestionAggregator │
//! │  Clause / Boost       │   │ ResultShaper         │
//! └──────────────────────┘   └──────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────────┐
//! │     SearchTransport (SolrClient over HTTP)       │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use registry_search_api::config::SolrConfig;
//! use registry_search_api::search::{SearchConfig, SearchParams, SearchService, SolrClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = Arc::new(SolrClient::new(&SolrConfig::default())?);
//!     let search = SearchService::new(transport, SearchConfig::default());
//!
//!     let params = SearchParams::new("ACME")
//!         .with_legal_types(vec!["BC", "CP"])
//!         .with_paging(None, Some(20));
//!
//!     let envelope = search.business_search(&params).await?;
//!     println!("Found {} businesses", envelope.search_results.total_results);
//!
//!     Ok(())
//! }
//! ```

mod clause;
mod config;
mod error;
mod facets;
mod fields;
pub mod normalize;
mod query;
mod service;
mod shaper;
mod solr;
mod suggest;
mod transport;

pub use clause::{Boost, Clause};
pub use config::SearchConfig;
pub use error::{SearchError, SearchResult};
pub use facets::{shape_facets, FacetSpec, FacetTree, FACET_BUCKET};
pub use fields::{SolrField, PRIMARY_TERM_KEY};
pub use query::{
    Category, CategoryFilter, CompiledQuery, CompiledQueryBuilder, QueryCompiler, RankingMode,
    SearchFlavor, SearchParams, ValueCase, BOOST_WEIGHTS, BUSINESS, PARTY,
};
pub use service::SearchService;
pub use shaper::{category_echo, shape_search_envelope, QueryInfo, SearchEnvelope, SearchResults};
pub use solr::SolrClient;
pub use suggest::{
    highlight, Stage, SuggestQueryInfo, SuggestResponse, SuggestionAggregator, SuggestionItem,
    SuggestionKind, HIGHLIGHT_CLOSE, HIGHLIGHT_OPEN,
};
pub use transport::{RawResponse, ResponseBody, SearchTransport};
