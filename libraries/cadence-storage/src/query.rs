//! Shared search and paging helpers for the vertical slices.

use cadence_core::types::PageRequest;

/// Keeps a pattern from matching across two fields of a `search_text` value
const FIELD_SEPARATOR: &str = "\u{1f}";

/// Lowercased copy of the searchable fields, stored in `search_text`
///
/// SQLite's `LIKE` folds ASCII only. Folding here with Unicode rules and
/// matching a pattern from [`like_pattern`] against the stored value makes
/// `"été"`, `"Été"` and `"ÉTÉ"` equivalent.
pub(crate) fn search_text<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

/// Wrap free text into a lowercased `LIKE` pattern matching it as a substring
///
/// Wildcards in the input are escaped; queries must use `ESCAPE '\'` and
/// match against a `search_text` column.
pub(crate) fn like_pattern(search: &str) -> String {
    let search = search.to_lowercase();
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars().filter(|c| !FIELD_SEPARATOR.contains(*c)) {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `(LIMIT, OFFSET)` bind values for a page window
pub(crate) fn limit_offset(request: PageRequest) -> (i64, i64) {
    (
        i64::from(request.limit),
        i64::try_from(request.offset()).unwrap_or(i64::MAX),
    )
}
