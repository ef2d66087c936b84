//! String manipulation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Decorations Terraform adds to graph names and labels
static ANNOTATIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s*\(expand\)|\s*\(close\)|\[root\]\s*|""#)
        .expect("annotation pattern is a valid regex")
});

/// Remove `(expand)`, `(close)`, `[root] ` and quote characters
pub fn strip_annotations(raw: &str) -> String {
    ANNOTATIONS.replace_all(raw, "").into_owned()
}

/// Pluralize a word based on count
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
