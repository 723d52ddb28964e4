use crate::{rule::Rule, transaction::collapse_whitespace};

/// Check if a transaction name contains a rule substring (case-sensitive).
///
/// Runs of whitespace in `name` are collapsed to a single space first.
pub fn matches_rule(name: &str, substring: &str) -> bool {
    collapse_whitespace(name).contains(substring)
}

/// Find the rule that decides the category of `name`.
///
/// `rules` must be in creation order. The last rule that matches wins, so a
/// newer rule overrides an older one.
pub fn rule_for_name<'a>(name: &str, rules: &'a [Rule]) -> Option<&'a Rule> {
    let name = collapse_whitespace(name);

    rules
        .iter()
        .rev()
        .find(|rule| name.contains(rule.substring.as_str()))
}
