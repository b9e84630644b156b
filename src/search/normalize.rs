//! Query text normalization and Solr escaping
//!
//! `prepare` is applied to user input at the boundary. The escape helpers are
//! only called by the clause serializer, so every escaping rule of the query
//! syntax lives in this file.

/// Characters that carry query structure and have no literal use in registry names
const STRIPPED: &[char] = &['"', '*', '?', '~', '^', '\\', '{', '}', '[', ']'];

/// Characters with special meaning in the Solr standard query parser
const SPECIAL: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/',
];

/// Operator keywords of the standard query parser, matched case-sensitively
const KEYWORDS: &[&str] = &["AND", "OR", "NOT"];

/// Clean raw user text for inclusion in a query.
///
/// Removes quote, wildcard, fuzzy, boost and range characters, drops control
/// characters and collapses whitespace. Everything else is kept verbatim so the
/// result can still be compared against stored values.
pub fn prepare(text: &str) -> String {
    text.chars()
        .filter(|c| !STRIPPED.contains(c))
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape a single token for a term or prefix match.
///
/// A bare operator keyword gets its first character escaped so it is read as
/// a literal word.
pub fn escape_term(token: &str) -> String {
    let mut escaped = String::with_capacity(token.len() + 1);
    if KEYWORDS.contains(&token) {
        escaped.push('\\');
    }
    for c in token.chars() {
        if SPECIAL.contains(&c) || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape text for use inside a quoted phrase
pub fn escape_phrase(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
