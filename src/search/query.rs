//! Search parameters and query compilation
//!
//! [`QueryCompiler`] turns normalized [`SearchParams`] into an immutable
//! [`CompiledQuery`]. Business and party search share one skeleton driven by a
//! [`SearchFlavor`] that names the fields each step works on.

use crate::search::clause::{Boost, Clause};
use crate::search::config::SearchConfig;
use crate::search::error::{SearchError, SearchResult};
use crate::search::facets::FacetSpec;
use crate::search::fields::{SolrField, PRIMARY_TERM_KEY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Proximity allowed between tokens in the phrase boosts
const PHRASE_SLOP: u32 = 10;

/// Boost weights, strongest first: exact phrase, stemmed phrase, exact prefix, suggest prefix
pub const BOOST_WEIGHTS: [f32; 4] = [30.0, 20.0, 10.0, 5.0];

/// Category filters a request can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    LegalTypes,
    States,
    PartyRoles,
}

/// Case applied to category values before filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCase {
    Upper,
    Lower,
}

impl ValueCase {
    fn apply(self, value: &str) -> String {
        match self {
            ValueCase::Upper => value.to_uppercase(),
            ValueCase::Lower => value.to_lowercase(),
        }
    }
}

/// A category filter and the index field it applies to
#[derive(Debug, Clone, Copy)]
pub struct CategoryFilter {
    pub category: Category,
    pub field: &'static str,
    pub case: ValueCase,
}

/// Field layout of one search flavor
#[derive(Debug)]
pub struct SearchFlavor {
    /// Fields the primary term is matched against, token by token
    pub match_fields: &'static [&'static str],
    /// Fields that also get a prefix match per token
    pub prefix_fields: &'static [&'static str],
    /// Sub-term keys accepted in the query mapping and the field each one narrows
    pub sub_terms: &'static [(&'static str, &'static str)],
    pub exact_name_field: &'static str,
    pub stemmed_name_field: &'static str,
    pub suggest_field: &'static str,
    /// Filters in the order they are combined
    pub filters: &'static [CategoryFilter],
}

impl SearchFlavor {
    /// Logical keys echoed back in a response's query info
    pub fn query_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sub_terms.iter().map(|(key, _)| *key)
    }
}

pub const BUSINESS: SearchFlavor = SearchFlavor {
    match_fields: &[
        SolrField::IDENTIFIER_Q,
        SolrField::BN_Q,
        SolrField::NAME_STEM_AGRO,
        SolrField::NAME_Q,
    ],
    prefix_fields: &[SolrField::NAME_Q],
    sub_terms: &[
        (SolrField::NAME, SolrField::NAME_Q),
        (SolrField::IDENTIFIER, SolrField::IDENTIFIER_Q),
        (SolrField::BN, SolrField::BN_Q),
    ],
    exact_name_field: SolrField::NAME_Q,
    stemmed_name_field: SolrField::NAME_STEM_AGRO,
    suggest_field: SolrField::NAME_SUGGEST,
    filters: &[
        CategoryFilter {
            category: Category::LegalTypes,
            field: SolrField::TYPE,
            case: ValueCase::Upper,
        },
        CategoryFilter {
            category: Category::States,
            field: SolrField::STATE,
            case: ValueCase::Upper,
        },
    ],
};

pub const PARTY: SearchFlavor = SearchFlavor {
    match_fields: &[SolrField::PARTY_NAME_Q, SolrField::PARTY_NAME_STEM_AGRO],
    prefix_fields: &[SolrField::PARTY_NAME_Q, SolrField::PARENT_NAME_Q],
    sub_terms: &[
        (SolrField::PARTY_NAME, SolrField::PARTY_NAME_Q),
        (SolrField::PARENT_NAME, SolrField::PARENT_NAME_Q),
        (SolrField::PARENT_IDENTIFIER, SolrField::PARENT_IDENTIFIER_Q),
        (SolrField::PARENT_BN, SolrField::PARENT_BN_Q),
    ],
    exact_name_field: SolrField::PARTY_NAME_Q,
    stemmed_name_field: SolrField::PARTY_NAME_STEM_AGRO,
    suggest_field: SolrField::PARTY_NAME_SUGGEST,
    filters: &[
        CategoryFilter {
            category: Category::PartyRoles,
            field: SolrField::PARTY_ROLE,
            case: ValueCase::Lower,
        },
        CategoryFilter {
            category: Category::LegalTypes,
            field: SolrField::PARENT_TYPE,
            case: ValueCase::Upper,
        },
        CategoryFilter {
            category: Category::States,
            field: SolrField::PARENT_STATE,
            case: ValueCase::Upper,
        },
    ],
};

/// Normalized search parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Search text by logical field; `value` holds the primary term
    pub query: BTreeMap<String, String>,

    /// Offset of the first result
    pub start: Option<usize>,

    /// Page size
    pub rows: Option<usize>,

    /// Filter by legal types
    pub legal_types: Option<Vec<String>>,

    /// Filter by states
    pub states: Option<Vec<String>>,

    /// Filter by party roles
    pub party_roles: Option<Vec<String>>,
}

impl SearchParams {
    /// Create parameters with a primary term
    pub fn new(value: impl Into<String>) -> Self {
        let mut query = BTreeMap::new();
        query.insert(PRIMARY_TERM_KEY.to_string(), value.into());
        Self {
            query,
            ..Default::default()
        }
    }

    /// Add a field-specific sub-term
    pub fn with_term(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.query.insert(key.into(), text.into());
        self
    }

    /// Set offset and page size
    pub fn with_paging(mut self, start: Option<usize>, rows: Option<usize>) -> Self {
        self.start = start;
        self.rows = rows;
        self
    }

    /// Filter by legal types
    pub fn with_legal_types(mut self, types: Vec<impl Into<String>>) -> Self {
        self.legal_types = Some(types.into_iter().map(|t| t.into()).collect());
        self
    }

    /// Filter by states
    pub fn with_states(mut self, states: Vec<impl Into<String>>) -> Self {
        self.states = Some(states.into_iter().map(|s| s.into()).collect());
        self
    }

    /// Filter by party roles
    pub fn with_party_roles(mut self, roles: Vec<impl Into<String>>) -> Self {
        self.party_roles = Some(roles.into_iter().map(|r| r.into()).collect());
        self
    }

    /// The primary term, if one was supplied
    pub fn value(&self) -> Option<&str> {
        self.query.get(PRIMARY_TERM_KEY).map(String::as_str)
    }

    /// Sub-term for `key`, empty when not supplied
    pub fn term(&self, key: &str) -> &str {
        self.query.get(key).map(String::as_str).unwrap_or("")
    }

    /// Values of a category filter; an empty set counts as absent
    pub fn category(&self, category: Category) -> Option<&[String]> {
        let values = match category {
            Category::LegalTypes => self.legal_types.as_deref(),
            Category::States => self.states.as_deref(),
            Category::PartyRoles => self.party_roles.as_deref(),
        };
        values.filter(|v| !v.is_empty())
    }
}

/// How the engine parses and scores the main clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankingMode {
    /// Standard Lucene parser
    Standard,
    /// Extended DisMax, applies `bq` boosts on top of the main clause
    ExtendedDisMax,
}

/// Fully built engine request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    main: Clause,
    filter: Option<Clause>,
    boosts: Vec<Boost>,
    facets: Option<FacetSpec>,
    fields: Vec<String>,
    start: usize,
    rows: usize,
    ranking: RankingMode,
}

impl CompiledQuery {
    pub fn builder(main: Clause) -> CompiledQueryBuilder {
        CompiledQueryBuilder::new(main)
    }

    pub fn main(&self) -> &Clause {
        &self.main
    }

    pub fn filter(&self) -> Option<&Clause> {
        self.filter.as_ref()
    }

    pub fn boosts(&self) -> &[Boost] {
        &self.boosts
    }

    pub fn facets(&self) -> Option<&FacetSpec> {
        self.facets.as_ref()
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn ranking(&self) -> RankingMode {
        self.ranking
    }

    /// Serialize to Solr request parameters. Boosts are sent as separate `bq`
    /// parameters so each one is scored on its own.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.main.to_solr())];

        if let Some(filter) = &self.filter {
            params.push(("fq", filter.to_solr()));
        }
        for boost in &self.boosts {
            params.push(("bq", boost.to_solr()));
        }
        if self.ranking == RankingMode::ExtendedDisMax {
            params.push(("defType", "edismax".to_string()));
        }
        if let Some(facets) = &self.facets {
            params.push(("facet", "on".to_string()));
            params.push(("json.facet", facets.to_json().to_string()));
        }
        if !self.fields.is_empty() {
            params.push(("fl", self.fields.join(",")));
        }
        params.push(("start", self.start.to_string()));
        params.push(("rows", self.rows.to_string()));

        params
    }
}

/// Accumulates clause records for a [`CompiledQuery`]
#[derive(Debug)]
pub struct CompiledQueryBuilder {
    main: Clause,
    filters: Vec<Clause>,
    boosts: Vec<Boost>,
    facets: Option<FacetSpec>,
    fields: Vec<String>,
    start: usize,
    rows: usize,
    ranking: RankingMode,
}

impl CompiledQueryBuilder {
    pub fn new(main: Clause) -> Self {
        Self {
            main,
            filters: Vec::new(),
            boosts: Vec::new(),
            facets: None,
            fields: Vec::new(),
            start: 0,
            rows: 0,
            ranking: RankingMode::Standard,
        }
    }

    /// Add a filter, AND-combined with earlier ones in call order
    pub fn filter(mut self, clause: Clause) -> Self {
        self.filters.push(clause);
        self
    }

    pub fn boost(mut self, boost: Boost) -> Self {
        self.boosts.push(boost);
        self
    }

    pub fn facets(mut self, facets: FacetSpec) -> Self {
        self.facets = Some(facets);
        self
    }

    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn paging(mut self, start: usize, rows: usize) -> Self {
        self.start = start;
        self.rows = rows;
        self
    }

    pub fn ranking(mut self, ranking: RankingMode) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn build(self) -> CompiledQuery {
        let filter = if self.filters.is_empty() {
            None
        } else {
            Some(Clause::all(self.filters))
        };

        CompiledQuery {
            main: self.main,
            filter,
            boosts: self.boosts,
            facets: self.facets,
            fields: self.fields,
            start: self.start,
            rows: self.rows,
            ranking: self.ranking,
        }
    }
}

/// Builds engine requests from search parameters
pub struct QueryCompiler<'a> {
    config: &'a SearchConfig,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(config: &'a SearchConfig) -> Self {
        Self { config }
    }

    /// Weighted, faceted, filtered business search
    pub fn compile_business_query(&self, params: &SearchParams) -> SearchResult<CompiledQuery> {
        self.compile(
            params,
            &BUSINESS,
            self.config.business_facet_spec(),
            &self.config.business_fields,
        )
    }

    /// Weighted, faceted, filtered party search
    pub fn compile_party_query(&self, params: &SearchParams) -> SearchResult<CompiledQuery> {
        self.compile(
            params,
            &PARTY,
            self.config.party_facet_spec(),
            &self.config.party_fields,
        )
    }

    /// Plain match of `term` against `fields`, used by the suggestion fallbacks
    pub fn compile_suggest_lookup_query(&self, term: &str, fields: &[&str], rows: usize) -> CompiledQuery {
        CompiledQuery::builder(token_match(term, fields, &[]))
            .fields(self.config.business_fields.clone())
            .paging(0, rows)
            .build()
    }

    /// Exact identifier or business number match
    pub fn compile_identifier_or_business_number_query(&self, term: &str, rows: usize) -> CompiledQuery {
        let main = Clause::any(vec![
            Clause::term(SolrField::IDENTIFIER_Q, term),
            Clause::term(SolrField::BN_Q, term),
        ]);

        CompiledQuery::builder(main)
            .fields(self.config.business_fields.clone())
            .paging(0, rows)
            .build()
    }

    fn compile(
        &self,
        params: &SearchParams,
        flavor: &SearchFlavor,
        facets: FacetSpec,
        fields: &[String],
    ) -> SearchResult<CompiledQuery> {
        let value = params.value().ok_or(SearchError::MissingPrimaryTerm)?;

        // Primary term across the flavor's fields, sub-terms narrowed to their own field
        let mut clauses = vec![token_match(value, flavor.match_fields, flavor.prefix_fields)];
        for (key, field) in flavor.sub_terms {
            let text = params.term(key);
            if !text.is_empty() {
                clauses.push(Clause::all(
                    text.split_whitespace().map(|t| Clause::term(*field, t)).collect(),
                ));
            }
        }

        let mut builder = CompiledQuery::builder(Clause::all(clauses))
            .facets(facets)
            .fields(fields.to_vec())
            .paging(params.start.unwrap_or(0), self.config.rows_or_default(params.rows))
            .ranking(RankingMode::ExtendedDisMax);

        for filter in flavor.filters {
            if let Some(values) = params.category(filter.category) {
                let values = values.iter().map(|v| filter.case.apply(v)).collect();
                builder = builder.filter(Clause::in_set(filter.field, values));
            }
        }

        let first_token = value.split_whitespace().next().unwrap_or("");
        let [exact, stemmed, prefix, suggest] = BOOST_WEIGHTS;
        builder = builder
            .boost(Boost::new(
                Clause::phrase(flavor.exact_name_field, value, Some(PHRASE_SLOP)),
                exact,
            ))
            .boost(Boost::new(
                Clause::phrase(flavor.stemmed_name_field, value, Some(PHRASE_SLOP)),
                stemmed,
            ))
            .boost(Boost::new(
                Clause::prefix(flavor.exact_name_field, first_token),
                prefix,
            ))
            .boost(Boost::new(
                Clause::prefix(flavor.suggest_field, first_token),
                suggest,
            ));

        let query = builder.build();
        tracing::debug!(
            q = %query.main().to_solr(),
            fq = ?query.filter().map(Clause::to_solr),
            start = query.start(),
            rows = query.rows(),
            "Compiled search query"
        );

        Ok(query)
    }
}

/// Conjunction over the tokens of `term`; each token matches any of `fields`
/// or is a prefix of any of `prefix_fields`. No tokens matches everything.
fn token_match(term: &str, fields: &[&str], prefix_fields: &[&str]) -> Clause {
    Clause::all(
        term.split_whitespace()
            .map(|token| {
                Clause::any(
                    fields
                        .iter()
                        .map(|field| Clause::term(*field, token))
                        .chain(prefix_fields.iter().map(|field| Clause::prefix(*field, token)))
                        .collect(),
                )
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'p>(params: &'p [(&'static str, String)], key: &str) -> Vec<&'p str> {
        params
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn test_search_params_builder() {
        let params = SearchParams::new("acme")
            .with_term("name", "trading")
            .with_legal_types(vec!["cp"])
            .with_paging(Some(10), Some(50));

        assert_eq!(params.value(), Some("acme"));
        assert_eq!(params.term("name"), "trading");
        assert_eq!(params.term("bn"), "");
        assert_eq!(params.start, Some(10));
        assert_eq!(params.category(Category::LegalTypes).unwrap().len(), 1);
        assert!(params.category(Category::States).is_none());
    }

    #[test]
    fn test_empty_category_counts_as_absent() {
        let params = SearchParams::new("acme").with_states(Vec::<String>::new());
        assert!(params.category(Category::States).is_none());
    }

    #[test]
    fn test_business_main_clause() {
        let config = SearchConfig::default();
        let query = QueryCompiler::new(&config)
            .compile_business_query(&SearchParams::new("ACME"))
            .unwrap();

        assert_eq!(
            query.main().to_solr(),
            "(identifier_q:(ACME) OR bn_q:(ACME) OR name_stem_agro:(ACME) OR name_q:(ACME) OR name_q:(ACME*))"
        );
        assert_eq!(query.ranking(), RankingMode::ExtendedDisMax);
        assert!(query.filter().is_none());
    }

    #[test]
    fn test_business_sub_terms_are_conjunctive() {
        let config = SearchConfig::default();
        let params = SearchParams::new("ACME").with_term("name", "NORTH STAR");
        let query = QueryCompiler::new(&config).compile_business_query(&params).unwrap();

        let q = query.main().to_solr();
        assert!(q.ends_with(" AND (name_q:(NORTH) AND name_q:(STAR)))"), "{}", q);
    }

    #[test]
    fn test_business_boosts_fixed_order() {
        let config = SearchConfig::default();
        let query = QueryCompiler::new(&config)
            .compile_business_query(&SearchParams::new("ACME TRADING"))
            .unwrap();

        let weights: Vec<f32> = query.boosts().iter().map(|b| b.weight).collect();
        assert_eq!(weights, vec![30.0, 20.0, 10.0, 5.0]);

        let params = query.to_params();
        assert_eq!(
            param(&params, "bq"),
            vec![
                "name_q:(\"ACME TRADING\"~10)^30.0",
                "name_stem_agro:(\"ACME TRADING\"~10)^20.0",
                "name_q:(ACME*)^10.0",
                "name_suggest:(ACME*)^5.0",
            ]
        );
        assert_eq!(param(&params, "defType"), vec!["edismax"]);
    }

    #[test]
    fn test_business_filters_upper_cased_and_ordered() {
        let config = SearchConfig::default();
        let params = SearchParams::new("ACME")
            .with_states(vec!["active"])
            .with_legal_types(vec!["cp", "ben"]);
        let query = QueryCompiler::new(&config).compile_business_query(&params).unwrap();

        assert_eq!(
            query.filter().unwrap().to_solr(),
            "(legalType:(CP OR BEN) AND status:(ACTIVE))"
        );
    }

    #[test]
    fn test_business_single_filter() {
        let config = SearchConfig::default();
        let params = SearchParams::new("ACME").with_legal_types(vec!["cp", "ben"]);
        let query = QueryCompiler::new(&config).compile_business_query(&params).unwrap();

        assert_eq!(
            query.filter(),
            Some(&Clause::in_set("legalType", vec!["CP".to_string(), "BEN".to_string()]))
        );
    }

    #[test]
    fn test_party_filter_order_and_case() {
        let config = SearchConfig::default();
        let params = SearchParams::new("SMITH")
            .with_states(vec!["active"])
            .with_legal_types(vec!["sp"])
            .with_party_roles(vec!["PARTNER"]);
        let query = QueryCompiler::new(&config).compile_party_query(&params).unwrap();

        assert_eq!(
            query.filter().unwrap().to_solr(),
            "(partyRoles:(partner) AND parentLegalType:(SP) AND parentStatus:(ACTIVE))"
        );
        assert_eq!(query.boosts()[3].to_solr(), "partyName_suggest:(SMITH*)^5.0");
        assert_eq!(query.facets().unwrap().fields.len(), 3);
    }

    #[test]
    fn test_party_main_clause_prefixes_parent_name() {
        let config = SearchConfig::default();
        let query = QueryCompiler::new(&config)
            .compile_party_query(&SearchParams::new("SMITH"))
            .unwrap();

        assert_eq!(
            query.main().to_solr(),
            "(partyName_q:(SMITH) OR partyName_stem_agro:(SMITH) OR partyName_q:(SMITH*) OR parentName_q:(SMITH*))"
        );
    }

    #[test]
    fn test_empty_primary_term_degrades_boosts() {
        let config = SearchConfig::default();
        let query = QueryCompiler::new(&config)
            .compile_business_query(&SearchParams::new(""))
            .unwrap();

        assert_eq!(query.main(), &Clause::MatchAll);
        assert_eq!(query.boosts().len(), 4);
        assert_eq!(query.boosts()[2].to_solr(), "name_q:(*)^10.0");
        assert_eq!(query.boosts()[3].to_solr(), "name_suggest:(*)^5.0");
    }

    #[test]
    fn test_missing_primary_term() {
        let config = SearchConfig::default();
        let params = SearchParams::default();
        let result = QueryCompiler::new(&config).compile_business_query(&params);
        assert!(matches!(result, Err(SearchError::MissingPrimaryTerm)));
    }

    #[test]
    fn test_paging_defaults() {
        let config = SearchConfig::default();
        let compiler = QueryCompiler::new(&config);

        let query = compiler.compile_business_query(&SearchParams::new("ACME")).unwrap();
        assert_eq!((query.start(), query.rows()), (0, 10));

        let params = SearchParams::new("ACME").with_paging(Some(20), Some(0));
        let query = compiler.compile_business_query(&params).unwrap();
        assert_eq!((query.start(), query.rows()), (20, 10));
    }

    #[test]
    fn test_to_params_facets_and_fields() {
        let config = SearchConfig::default();
        let query = QueryCompiler::new(&config)
            .compile_business_query(&SearchParams::new("ACME"))
            .unwrap();
        let params = query.to_params();

        assert_eq!(param(&params, "facet"), vec!["on"]);
        let facet: serde_json::Value = serde_json::from_str(param(&params, "json.facet")[0]).unwrap();
        assert!(facet["categories"]["facet"]["legalType"].is_object());
        assert_eq!(param(&params, "fl"), vec!["bn,identifier,legalType,name,status"]);
        assert!(param(&params, "fq").is_empty());
    }

    #[test]
    fn test_suggest_lookup_query() {
        let config = SearchConfig::default();
        let query = QueryCompiler::new(&config).compile_suggest_lookup_query(
            "ACME",
            &[SolrField::NAME_SINGLE],
            5,
        );

        assert_eq!(query.main().to_solr(), "name_single_term:(ACME)");
        assert!(query.boosts().is_empty());
        assert!(query.facets().is_none());
        assert_eq!(query.ranking(), RankingMode::Standard);
        assert_eq!(query.rows(), 5);
    }

    #[test]
    fn test_operator_words_in_user_text_stay_literal() {
        let config = SearchConfig::default();
        let compiler = QueryCompiler::new(&config);

        let lookup = compiler.compile_suggest_lookup_query(
            "SMITH AND SONS",
            &[SolrField::NAME_SINGLE],
            5,
        );
        assert_eq!(
            lookup.main().to_solr(),
            "(name_single_term:(SMITH) AND name_single_term:(\\AND) AND name_single_term:(SONS))"
        );

        let params = SearchParams::new("ACME").with_legal_types(vec!["not"]);
        let query = compiler.compile_business_query(&params).unwrap();
        assert_eq!(param(&query.to_params(), "fq"), vec!["legalType:(\\NOT)"]);
    }

    #[test]
    fn test_identifier_or_business_number_query() {
        let config = SearchConfig::default();
        let query = QueryCompiler::new(&config).compile_identifier_or_business_number_query("BC123", 10);

        assert_eq!(query.main().to_solr(), "(identifier_q:(BC123) OR bn_q:(BC123))");
        assert!(param(&query.to_params(), "defType").is_empty());
    }
}
