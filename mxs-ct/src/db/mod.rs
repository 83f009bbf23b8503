//! Catalog database queries

pub mod playlists;
pub mod songs;

/// Escape SQL LIKE wildcards in a user-supplied substring.
///
/// Callers pair the result with `ESCAPE '\'` so that `%` and `_` in a
/// search query match themselves.
pub(crate) fn escape_like(fragment: &str) -> String {
    fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("lo-fi"), "lo-fi");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
