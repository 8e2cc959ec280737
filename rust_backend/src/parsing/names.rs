//! Agent name normalization.
//!
//! Dialer accounts and roster identifiers are free text: emails, nicknames with
//! annotations like `"bob (temp contractor)"`, stray separators. Both sides are
//! reduced to the same comparable key before matching.

use once_cell::sync::Lazy;
use regex::Regex;

/// `@` up to the next whitespace: the domain part of an email-style account.
static EMAIL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\S*").expect("EMAIL_SUFFIX should compile"));

/// A parenthetical group without nested parentheses.
static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^()]*\)").expect("PARENTHETICAL should compile"));

/// Everything from the first remaining `@` or `;` to the end.
static TRAILING_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[@;].*$").expect("TRAILING_SEGMENT should compile"));

/// Email local-part separators.
static NAME_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[._]").expect("NAME_SEPARATORS should compile"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN should compile"));

/// Normalizes an agent identifier into its comparison key.
///
/// Missing or blank input yields an empty string. The transform is pure and
/// idempotent.
///
/// # Examples
///
/// ```
/// use cre_dialer::parsing::names::normalize_name;
///
/// assert_eq!(normalize_name("  Jane.Doe@co.com "), "jane doe");
/// assert_eq!(normalize_name("Bob (temp contractor)"), "bob");
/// assert_eq!(normalize_name("Ravi Kumar; ext 22"), "ravi kumar");
/// assert_eq!(normalize_name(""), "");
/// ```
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut name = EMAIL_SUFFIX.replace_all(lowered.trim(), " ").into_owned();

    // Removing an inner group can expose an outer one: "((x))" -> "()"
    while PARENTHETICAL.is_match(&name) {
        name = PARENTHETICAL.replace_all(&name, " ").into_owned();
    }

    let name = TRAILING_SEGMENT.replace(&name, "");
    let name = NAME_SEPARATORS.replace_all(&name, " ");
    WHITESPACE_RUN.replace_all(&name, " ").trim().to_string()
}

/// Normalizes an optional identifier, mapping `None` to the empty key.
pub fn normalize_optional_name(raw: Option<&str>) -> String {
    raw.map(normalize_name).unwrap_or_default()
}

/// Whitespace tokens of a normalized name.
pub fn name_tokens(normalized: &str) -> Vec<String> {
    normalized.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_email_is_stripped_but_trailing_tokens_kept() {
        assert_eq!(normalize_name("jane.doe@co.com"), "jane doe");
        assert_eq!(normalize_name("JANE.DOE@CO.COM"), "jane doe");
        assert_eq!(normalize_name("agent7@stringee.com sales"), "agent7 sales");
    }

    #[test]
    fn test_parentheticals_removed() {
        assert_eq!(normalize_name("bob (temp contractor)"), "bob");
        assert_eq!(normalize_name("bob(x)smith"), "bob smith");
        assert_eq!(normalize_name("((nested)) amy"), "amy");
        assert_eq!(normalize_name("amy ()"), "amy");
    }

    #[test]
    fn test_unbalanced_parenthesis_kept() {
        assert_eq!(normalize_name("amy (night"), "amy (night");
    }

    #[test]
    fn test_semicolon_tail_removed() {
        assert_eq!(normalize_name("ravi kumar;backup"), "ravi kumar");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(normalize_name("  ravi \t  kumar\n"), "ravi kumar");
        assert_eq!(normalize_name("ravi_kumar"), "ravi kumar");
    }

    #[test]
    fn test_missing_input() {
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_optional_name(None), "");
        assert_eq!(normalize_optional_name(Some("Amy")), "amy");
    }

    #[test]
    fn test_tokens() {
        assert_eq!(name_tokens("ram kumar"), vec!["ram", "kumar"]);
        assert!(name_tokens("").is_empty());
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in "\\PC{0,40}") {
            let once = normalize_name(&raw);
            prop_assert_eq!(normalize_name(&once), once.clone());
        }

        #[test]
        fn prop_normalize_is_idempotent_on_name_like_input(
            raw in "[A-Za-z .@_;()]{0,30}"
        ) {
            let once = normalize_name(&raw);
            prop_assert_eq!(normalize_name(&once), once);
        }
    }
}
