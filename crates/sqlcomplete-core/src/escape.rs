//! Identifier quoting.

use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::Lexicon;

/// Names that may appear unquoted. There is no case-insensitive flag: any
/// uppercase character forces quoting.
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[_a-z][_a-z0-9$]*$").expect("Invalid regex pattern"));

/// Returns true if `name` must be quoted to be used as an identifier.
pub fn needs_quoting(name: &str, lexicon: &Lexicon) -> bool {
    !name.is_empty()
        && (!NAME_PATTERN.is_match(name) || lexicon.is_reserved(name) || lexicon.is_function(name))
}

/// Wraps `name` in backticks unless it is a plain, non-reserved identifier.
pub fn escape_name(name: &str, lexicon: &Lexicon) -> String {
    if needs_quoting(name, lexicon) {
        format!("`{name}`")
    } else {
        name.to_string()
    }
}

/// Strips one pair of surrounding double quotes.
///
/// Backtick quoting produced by [`escape_name`] is left alone. A lone `"` both
/// starts and ends the name and unescapes to the empty string.
pub fn unescape_name(name: &str) -> &str {
    if !(name.starts_with('"') && name.ends_with('"')) {
        return name;
    }
    name.get(1..name.len() - 1).unwrap_or_default()
}
