use std::sync::LazyLock;

use regex::Regex;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*?\)").expect("valid parenthetical pattern"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Canonical form of a destination name used as a join key.
///
/// Parenthetical annotations and all whitespace are removed, so
/// `"해운대 (부산)"` and `"해운대"` compare equal.
pub fn normalize_destination(name: &str) -> String {
    let stripped = PARENTHETICAL.replace_all(name, "");
    WHITESPACE.replace_all(&stripped, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_parenthetical_suffix() {
        assert_eq!(normalize_destination("Name(extra)"), "Name");
        assert_eq!(normalize_destination("해운대(부산)"), "해운대");
    }

    #[test]
    fn test_removes_whitespace() {
        assert_eq!(normalize_destination("  감천 문화\t마을 "), "감천문화마을");
    }

    #[test]
    fn test_multiple_annotations_are_removed_lazily() {
        assert_eq!(normalize_destination("A(x) B (y)C"), "ABC");
    }

    #[test]
    fn test_plain_name_is_unchanged() {
        assert_eq!(normalize_destination("Gwangalli"), "Gwangalli");
    }
}
