//! URL parameter decoding for the search endpoints
//!
//! Search terms and categories travel as `key:value` pairs joined by `::`,
//! for example `query=value:acme::name:trading` and
//! `categories=legalType:BC,CP::status:ACTIVE`.

use crate::error::{AppError, Result};
use crate::search::normalize::prepare;
use crate::search::{Category, SearchError, SearchFlavor, SearchParams, SolrField, BUSINESS, PARTY, PRIMARY_TERM_KEY};
use serde::Deserialize;

const PAIR_SEPARATOR: &str = "::";
const VALUE_SEPARATOR: char = ',';

/// Raw query string of the search endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SearchQueryParams {
    pub query: Option<String>,
    pub categories: Option<String>,
    pub start: Option<String>,
    pub rows: Option<String>,
}

/// Raw query string of the suggest endpoint
#[derive(Debug, Default, Deserialize)]
pub struct SuggestQueryParams {
    pub query: Option<String>,
    pub highlight: Option<String>,
    pub rows: Option<String>,
}

/// Decoded suggestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestRequest {
    pub term: String,
    pub highlight: bool,
    pub rows: Option<usize>,
}

/// Split `a:1::b:2` into `[("a", "1"), ("b", "2")]`, skipping items without a key
pub fn parse_pairs(raw: &str) -> impl Iterator<Item = (&str, &str)> {
    raw.split(PAIR_SEPARATOR)
        .filter_map(|item| item.split_once(':'))
        .filter(|(key, _)| !key.is_empty())
}

/// Non-negative integer, `None` when absent or unparsable
fn parse_number(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|r| r.trim().parse().ok())
}

fn parse_flag(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") => false,
        Some(flag) => !flag.eq_ignore_ascii_case("false") && flag != "0",
    }
}

/// Decode business search parameters
pub fn business_params(raw: &SearchQueryParams) -> Result<SearchParams> {
    search_params(raw, &BUSINESS)
}

/// Decode party search parameters. Party roles are mandatory and limited to `allowed_roles`.
pub fn party_params(raw: &SearchQueryParams, allowed_roles: &[String]) -> Result<SearchParams> {
    let params = search_params(raw, &PARTY)?;

    let roles = params.category(Category::PartyRoles).ok_or_else(|| {
        AppError::Validation(format!(
            "Expected url param 'categories={}:...'",
            SolrField::PARTY_ROLE
        ))
    })?;

    if let Some(role) = roles.iter().find(|role| !allowed_roles.contains(role)) {
        return Err(SearchError::InvalidCategoryValue {
            category: SolrField::PARTY_ROLE.to_string(),
            value: role.clone(),
        }
        .into());
    }

    Ok(params)
}

fn search_params(raw: &SearchQueryParams, flavor: &SearchFlavor) -> Result<SearchParams> {
    let mut params = SearchParams::default();
    let mut value = None;

    for (key, text) in parse_pairs(raw.query.as_deref().unwrap_or("")) {
        if key == PRIMARY_TERM_KEY {
            value = Some(text);
        } else if flavor.query_keys().any(|k| k == key) {
            params.query.insert(key.to_string(), prepare(text));
        }
    }

    let value = value
        .filter(|v| !v.is_empty())
        .ok_or(SearchError::MissingPrimaryTerm)?;
    params
        .query
        .insert(PRIMARY_TERM_KEY.to_string(), prepare(value));

    for (key, text) in parse_pairs(raw.categories.as_deref().unwrap_or("")) {
        let Some(filter) = flavor.filters.iter().find(|f| f.field == key) else {
            continue;
        };

        let values: Vec<String> = text
            .split(VALUE_SEPARATOR)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();

        match filter.category {
            Category::LegalTypes => params.legal_types = Some(values),
            Category::States => params.states = Some(values),
            Category::PartyRoles => {
                params.party_roles = Some(values.iter().map(|v| v.to_lowercase()).collect())
            }
        }
    }

    params.start = parse_number(raw.start.as_deref());
    params.rows = parse_number(raw.rows.as_deref());

    Ok(params)
}

impl SuggestQueryParams {
    /// Decode into a suggestion request; the term is required
    pub fn parse(&self) -> Result<SuggestRequest> {
        let term = self
            .query
            .as_deref()
            .map(prepare)
            .filter(|q| !q.is_empty())
            .ok_or(SearchError::MissingPrimaryTerm)?;

        Ok(SuggestRequest {
            term,
            highlight: parse_flag(self.highlight.as_deref()),
            rows: parse_number(self.rows.as_deref()),
        })
    }
}
