use crate::filter::expand::ExclusionSet;

/// Build one boolean FTS5 match expression from the free-text intent and the
/// exclusion set.
///
/// Each excluded term becomes a quoted negated clause; clauses are joined by
/// spaces (implicit AND in the FTS5 grammar) behind the verbatim free text.
/// Both inputs empty yields the empty string, which the executor treats as
/// "no full-text constraint" rather than a wildcard match.
///
/// User text is forwarded unsanitized: an allergen or query carrying the
/// grammar's own operators produces an expression the engine rejects, and
/// that surfaces as a query error on the request.
pub fn build_expression(free_text: &str, exclusions: &ExclusionSet) -> String {
    let include = free_text.trim();

    let exclude = exclusions
        .iter()
        .map(|term| format!("NOT \"{term}\""))
        .collect::<Vec<_>>()
        .join(" ");

    match (include.is_empty(), exclude.is_empty()) {
        (false, false) => format!("{include} {exclude}"),
        (false, true) => include.to_string(),
        (true, false) => exclude,
        (true, true) => String::new(),
    }
}
