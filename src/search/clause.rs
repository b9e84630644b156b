//! Typed clause algebra for Solr queries
//!
//! Clauses are plain data until [`Clause::to_solr`] renders them in the Solr
//! standard query syntax:
//!
//! ```text
//! field:(token)              - Term match
//! field:("some text"~10)     - Phrase match with optional slop
//! field:(tok*)               - Prefix match
//! field:(A OR B)             - Set membership
//! *:*                        - Match all
//! (c1 AND c2)                - Conjunction
//! (c1 OR c2)                 - Disjunction
//! clause^10.0                - Boost (bq only)
//! ```

use crate::search::normalize::{escape_phrase, escape_term};
use serde::{Deserialize, Serialize};

/// Query clause node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clause {
    /// Single token match
    Term { field: String, text: String },
    /// Phrase match, `slop` allows that many positions between tokens
    Phrase {
        field: String,
        text: String,
        slop: Option<u32>,
    },
    /// Prefix match; an empty prefix matches any value of the field
    Prefix { field: String, prefix: String },
    /// Field value is one of `values`
    InSet { field: String, values: Vec<String> },
    /// Every document
    MatchAll,
    /// All children must match
    And(Vec<Clause>),
    /// Any child may match
    Or(Vec<Clause>),
}

impl Clause {
    pub fn term(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
            text: text.into(),
        }
    }

    pub fn phrase(field: impl Into<String>, text: impl Into<String>, slop: Option<u32>) -> Self {
        Self::Phrase {
            field: field.into(),
            text: text.into(),
            slop,
        }
    }

    pub fn prefix(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::Prefix {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    pub fn in_set(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::InSet {
            field: field.into(),
            values,
        }
    }

    /// Conjunction of `clauses`, collapsing the trivial cases
    pub fn all(mut clauses: Vec<Clause>) -> Self {
        match clauses.len() {
            0 => Self::MatchAll,
            1 => clauses.remove(0),
            _ => Self::And(clauses),
        }
    }

    /// Disjunction of `clauses`, collapsing the trivial cases
    pub fn any(mut clauses: Vec<Clause>) -> Self {
        match clauses.len() {
            0 => Self::MatchAll,
            1 => clauses.remove(0),
            _ => Self::Or(clauses),
        }
    }

    /// Render in Solr standard query syntax
    pub fn to_solr(&self) -> String {
        match self {
            Self::Term { field, text } => format!("{}:({})", field, escape_term(text)),
            Self::Phrase { field, text, slop } => match slop {
                Some(slop) => format!("{}:(\"{}\"~{})", field, escape_phrase(text), slop),
                None => format!("{}:(\"{}\")", field, escape_phrase(text)),
            },
            Self::Prefix { field, prefix } => format!("{}:({}*)", field, escape_term(prefix)),
            Self::InSet { field, values } => {
                let values = values
                    .iter()
                    .map(|v| escape_term(v))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                format!("{}:({})", field, values)
            }
            Self::MatchAll => "*:*".to_string(),
            Self::And(clauses) => Self::join(clauses, " AND "),
            Self::Or(clauses) => Self::join(clauses, " OR "),
        }
    }

    fn join(clauses: &[Clause], operator: &str) -> String {
        let parts: Vec<String> = clauses.iter().map(Clause::to_solr).collect();
        if parts.len() == 1 {
            parts[0].clone()
        } else {
            format!("({})", parts.join(operator))
        }
    }
}

/// Ranking-only clause: adjusts the score of matching documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    pub clause: Clause,
    pub weight: f32,
}

impl Boost {
    pub fn new(clause: Clause, weight: f32) -> Self {
        Self { clause, weight }
    }

    pub fn to_solr(&self) -> String {
        format!("{}^{:.1}", self.clause.to_solr(), self.weight)
    }
}
