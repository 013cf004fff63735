//! Placeholder extraction and substitution.
//!
//! Recognized tokens: `%1`..`%99` (positional arguments), `%n` (the plural
//! count), and their localized spellings `%L1`, `%Ln`. Substitution is a
//! single pass; tokens without a matching argument are left as-is.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Digit runs are matched whole so `%100` is rejected rather than read as `%10`.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"%(L?)([1-9][0-9]*|n)").expect("placeholder pattern is valid")
});

/// The argument or count token of a match, if it is in range.
fn token<'t>(caps: &'t Captures<'_>) -> Option<&'t str> {
    let token = caps.get(2)?.as_str();
    (token.len() <= 2).then_some(token)
}

/// Collect the placeholder tokens of `text` in canonical spelling.
///
/// `%L1` and `%1` are the same argument and both canonicalize to `%1`.
pub fn placeholders(text: &str) -> BTreeSet<String> {
    PLACEHOLDER_RE
        .captures_iter(text)
        .filter_map(|caps| token(&caps).map(|t| format!("%{t}")))
        .collect()
}

/// Whether `text` contains the plural count token.
pub fn has_count(text: &str) -> bool {
    placeholders(text).contains("%n")
}

/// Substitute positional arguments and, when given, the plural count.
pub fn substitute(template: &str, args: &[&str], count: Option<i64>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| {
            let replacement = match token(caps) {
                None => None,
                Some("n") => count.map(|n| n.to_string()),
                Some(token) => token
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| index.checked_sub(1))
                    .and_then(|index| args.get(index))
                    .map(|arg| (*arg).to_string()),
            };
            replacement.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
