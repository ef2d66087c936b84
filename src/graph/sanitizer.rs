//! Mermaid identifier sanitization
//!
//! Terraform node names contain brackets, quotes, slashes and whitespace,
//! none of which may appear in a Mermaid node id. [`clean_id`] maps any raw
//! name onto `^[A-Za-z_][A-Za-z0-9_]*$` deterministically, so the same raw
//! endpoint always yields the same identifier.

use crate::utils::string::strip_annotations;

/// Identifier used when nothing survives sanitization
pub const EMPTY_ID: &str = "node_";

/// Prefix for identifiers that would otherwise start with a digit
const ID_PREFIX: &str = "node_";

const PROVIDER_PREFIX: &str = "provider[";

/// Characters with a meaning in Mermaid syntax. Each maximal run of these
/// (together with underscores) collapses to a single `_`.
const UNSAFE_CHARS: &[char] = &[
    '(', ')', '[', ']', '{', '}', '<', '>', '-', ':', ';', ',', '!', '@', '#', '$', '%', '^', '&',
    '*', '+', '=', '|', '\\', '?', '\'', '"', '`', '~', '.', '/',
];

/// Turn a raw node or edge endpoint name into a Mermaid-safe identifier
pub fn clean_id(raw: &str) -> String {
    let stripped = strip_annotations(raw);
    if stripped == EMPTY_ID {
        return stripped;
    }

    let id = match stripped.strip_prefix(PROVIDER_PREFIX) {
        Some(rest) => {
            let address = rest.replace(']', "").replace(['/', '.'], "_");
            format!("provider_{address}")
        }
        None => stripped.replace(['.', '/'], "_"),
    };

    sanitize(&id)
}

fn is_separator(c: char) -> bool {
    c == '_' || c.is_whitespace() || UNSAFE_CHARS.contains(&c) || !c.is_ascii_alphanumeric()
}

/// Single pass over `id`: runs of separators become one underscore, leading
/// and trailing runs are dropped, and a leading digit gets [`ID_PREFIX`].
fn sanitize(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + ID_PREFIX.len());
    let mut pending_separator = false;

    for c in id.chars() {
        if is_separator(c) {
            pending_separator = true;
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('_');
        }
        pending_separator = false;
        out.push(c);
    }

    match out.chars().next() {
        None => EMPTY_ID.to_string(),
        Some(first) if first.is_ascii_alphabetic() => out,
        Some(_) => format!("{ID_PREFIX}{out}"),
    }
}
