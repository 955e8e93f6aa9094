//! Escaping rules shared by the query builder and the NerdGraph executor.
//!
//! Literal escaping is applied while rendering NRQL; envelope escaping is
//! applied exactly once, last, when the rendered query is embedded in the
//! GraphQL document.

/// Escapes a value interpolated inside a single-quoted NRQL literal.
///
/// Replaces `'` with `\'` and `%` with `\%`.
pub fn escape_string_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' => escaped.push_str("\\'"),
            '%' => escaped.push_str("\\%"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escapes a rendered NRQL string for the double-quoted `query` argument of
/// the NerdGraph envelope.
pub fn escape_for_envelope(nrql: &str) -> String {
    nrql.replace('"', "\\\"")
}
