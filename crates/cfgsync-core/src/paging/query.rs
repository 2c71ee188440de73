//! Insert a `SKIP n FIRST m` clause after the leading `SELECT` of a raw query.

use std::borrow::Cow;

use super::PageWindow;

const SELECT: &str = "SELECT";

/// Byte offset just past a leading `SELECT` keyword (after any leading
/// whitespace), or `None` if the statement does not start with one.
fn leading_select_end(query: &str) -> Option<usize> {
    let start = query.len() - query.trim_start().len();
    let end = start + SELECT.len();
    let keyword = query.get(start..end)?;
    if !keyword.eq_ignore_ascii_case(SELECT) {
        return None;
    }
    // Reject identifiers that merely start with "select" (e.g. `selection`).
    match query[end..].chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(end),
    }
}

/// True if the query starts with `SELECT` (case-insensitive) and can be paged.
pub fn is_pageable_query(query: &str) -> bool {
    leading_select_end(query).is_some()
}

/// Rewrite `query` to fetch only `window`. Only the leading `SELECT` is
/// touched; everything after it is passed through as is. Queries that do not
/// start with `SELECT` come back unchanged.
pub fn rewrite_query(query: &str, window: PageWindow) -> Cow<'_, str> {
    match leading_select_end(query) {
        Some(end) => Cow::Owned(format!(
            "{} SKIP {} FIRST {}{}",
            &query[..end],
            window.skip,
            window.first,
            &query[end..]
        )),
        None => Cow::Borrowed(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(skip: u64, first: u64) -> PageWindow {
        PageWindow { skip, first }
    }

    #[test]
    fn inserts_clause_after_select() {
        assert_eq!(
            rewrite_query("SELECT a FROM t", window(20, 10)),
            "SELECT SKIP 20 FIRST 10 a FROM t"
        );
    }

    #[test]
    fn select_match_is_case_insensitive_and_keeps_original_case() {
        assert_eq!(
            rewrite_query("select name, pkid from device", window(0, 50)),
            "select SKIP 0 FIRST 50 name, pkid from device"
        );
    }

    #[test]
    fn only_the_leading_select_is_rewritten() {
        let q = "SELECT a FROM t WHERE b IN (SELECT b FROM u)";
        assert_eq!(
            rewrite_query(q, window(10, 10)),
            "SELECT SKIP 10 FIRST 10 a FROM t WHERE b IN (SELECT b FROM u)"
        );
    }

    #[test]
    fn non_select_query_is_unchanged() {
        let q = "UPDATE t SET a = 1 WHERE b IN (SELECT b FROM u)";
        let rewritten = rewrite_query(q, window(20, 10));
        assert!(matches!(rewritten, Cow::Borrowed(_)));
        assert_eq!(rewritten, q);
        assert!(!is_pageable_query(q));
    }

    #[test]
    fn identifier_starting_with_select_is_not_a_keyword() {
        assert!(!is_pageable_query("selection_count"));
        assert!(is_pageable_query("  SELECT * FROM t"));
        assert!(is_pageable_query("SELECT*FROM t"));
    }

    #[test]
    fn leading_whitespace_is_preserved() {
        assert_eq!(
            rewrite_query("\n  SELECT a FROM t", window(0, 5)),
            "\n  SELECT SKIP 0 FIRST 5 a FROM t"
        );
    }

    #[test]
    fn short_or_multibyte_input_does_not_panic() {
        assert!(!is_pageable_query("SEL"));
        assert!(!is_pageable_query("SELEC\u{e9}T a"));
        assert_eq!(rewrite_query("", window(0, 1)), "");
    }
}
