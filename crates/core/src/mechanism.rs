//! Mechanism-name normalization shared by the name registries.
//!
//! Names are compared case-insensitively with `_` and `/` treated as `-`, so
//! `"sha3_256"`, `"SHA3/256"` and `"SHA3-256"` all resolve identically.

/// Uppercases and folds `_` and `/` into `-`.
pub fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '_' | '/' => '-',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Uppercases and folds `_` into `-`, leaving `/` separators in place.
///
/// Used by registries that need to see a `/MAC` or `/HMAC` suffix before the
/// remaining separators are folded.
pub fn normalize_keep_slash(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '_' => '-',
            other => other.to_ascii_uppercase(),
        })
        .collect()
}

/// Removes the first matching suffix, trying candidates in order.
pub fn strip_any_suffix<'a>(name: &'a str, suffixes: &[&str]) -> &'a str {
    suffixes
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

/// Removes the first matching prefix, trying candidates in order.
pub fn strip_any_prefix<'a>(name: &'a str, prefixes: &[&str]) -> &'a str {
    prefixes
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name)
}
