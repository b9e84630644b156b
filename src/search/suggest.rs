//! Typeahead suggestion aggregation
//!
//! Suggestions are gathered by up to three sequential stages. Each stage only
//! runs while the name quota (the requested row count) is unmet:
//!
//! 1. [`Stage::NameMatch`]: engine-native name suggestions
//! 2. [`Stage::ExtraNameMatch`]: single-term name lookup for names the suggester missed
//! 3. [`Stage::IdentifierOrBnMatch`]: identifier and business number lookup
//!
//! Names come first in the output, then identifiers, then business numbers,
//! truncated to the requested rows only once all groups are assembled.

use crate::search::config::SearchConfig;
use crate::search::error::SearchResult;
use crate::search::fields::SolrField;
use crate::search::query::QueryCompiler;
use crate::search::transport::SearchTransport;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const HIGHLIGHT_OPEN: &str = "<b>";
pub const HIGHLIGHT_CLOSE: &str = "</b>";

/// What a suggestion value is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    Name,
    Identifier,
    BusinessNumber,
}

/// A single typeahead candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub value: String,
}

impl SuggestionItem {
    pub fn new(kind: SuggestionKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Suggestion response returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    pub query_info: SuggestQueryInfo,
    pub results: Vec<SuggestionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestQueryInfo {
    pub rows: Option<usize>,
    pub highlight: bool,
    pub query: String,
}

/// Suggestion stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NameMatch,
    ExtraNameMatch,
    IdentifierOrBnMatch,
}

impl Stage {
    pub const ORDER: [Stage; 3] = [
        Stage::NameMatch,
        Stage::ExtraNameMatch,
        Stage::IdentifierOrBnMatch,
    ];
}

/// Wrap every occurrence of `term` in `value` with the highlight markers
pub fn highlight(value: &str, term: &str) -> String {
    if term.is_empty() {
        return value.to_string();
    }
    value.replace(term, &format!("{}{}{}", HIGHLIGHT_OPEN, term, HIGHLIGHT_CLOSE))
}

/// Values collected across stages
#[derive(Debug, Default)]
struct Gathered {
    names: Vec<String>,
    identifiers: Vec<String>,
    business_numbers: Vec<String>,
}

impl Gathered {
    fn push_name(&mut self, name: String) {
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    fn into_items(self, term: &str, highlighted: bool, rows: usize) -> Vec<SuggestionItem> {
        let groups = [
            (SuggestionKind::Name, self.names),
            (SuggestionKind::Identifier, self.identifiers),
            (SuggestionKind::BusinessNumber, self.business_numbers),
        ];

        groups
            .into_iter()
            .flat_map(|(kind, values)| values.into_iter().map(move |value| (kind, value)))
            .take(rows)
            .map(|(kind, value)| {
                let value = if highlighted { highlight(&value, term) } else { value };
                SuggestionItem::new(kind, value)
            })
            .collect()
    }
}

/// Runs the suggestion stages against a transport
pub struct SuggestionAggregator<'a> {
    transport: &'a dyn SearchTransport,
    config: &'a SearchConfig,
}

impl<'a> SuggestionAggregator<'a> {
    pub fn new(transport: &'a dyn SearchTransport, config: &'a SearchConfig) -> Self {
        Self { transport, config }
    }

    /// Gather suggestions for `term`. A failing stage fails the whole request.
    ///
    /// An empty term yields no suggestions and never reaches the engine.
    pub async fn aggregate(
        &self,
        term: &str,
        highlighted: bool,
        rows: Option<usize>,
    ) -> SearchResult<Vec<SuggestionItem>> {
        if term.trim().is_empty() {
            tracing::debug!("Empty suggestion term, nothing to look up");
            return Ok(Vec::new());
        }

        let rows = self.config.rows_or_default(rows);
        let upper_term = term.to_uppercase();
        let mut gathered = Gathered::default();

        for stage in Stage::ORDER {
            if gathered.names.len() >= rows {
                tracing::debug!(?stage, rows, "Name quota met, skipping remaining stages");
                break;
            }
            self.run_stage(stage, term, &upper_term, rows, &mut gathered)
                .await?;
        }

        tracing::debug!(
            names = gathered.names.len(),
            identifiers = gathered.identifiers.len(),
            business_numbers = gathered.business_numbers.len(),
            "Suggestions gathered"
        );

        Ok(gathered.into_items(&upper_term, highlighted, rows))
    }

    async fn run_stage(
        &self,
        stage: Stage,
        term: &str,
        upper_term: &str,
        rows: usize,
        gathered: &mut Gathered,
    ) -> SearchResult<()> {
        let compiler = QueryCompiler::new(self.config);

        match stage {
            Stage::NameMatch => {
                for name in self.transport.suggest(term, rows).await? {
                    if gathered.names.len() >= rows {
                        break;
                    }
                    gathered.push_name(name.to_uppercase());
                }
            }
            Stage::ExtraNameMatch => {
                let query = compiler.compile_suggest_lookup_query(term, &[SolrField::NAME_SINGLE], rows);
                let raw = self.transport.execute(query).await?;
                for name in raw.field_values(SolrField::NAME) {
                    gathered.push_name(name.to_uppercase());
                }
            }
            Stage::IdentifierOrBnMatch => {
                let query = compiler.compile_identifier_or_business_number_query(upper_term, rows);
                let raw = self.transport.execute(query).await?;
                for doc in raw.docs() {
                    if let Some(identifier) = contains_term(doc, SolrField::IDENTIFIER, upper_term) {
                        gathered.identifiers.push(identifier.to_string());
                    }
                    if let Some(bn) = contains_term(doc, SolrField::BN, upper_term) {
                        gathered.business_numbers.push(bn.to_string());
                    }
                }
            }
        }

        Ok(())
    }
}

/// `field` of `doc` when present and containing `term`; a missing field never matches
fn contains_term<'d>(doc: &'d Value, field: &str, term: &str) -> Option<&'d str> {
    doc.get(field)
        .and_then(Value::as_str)
        .filter(|value| value.contains(term))
}
