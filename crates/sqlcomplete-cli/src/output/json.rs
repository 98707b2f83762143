//! JSON output formatting.

use sqlcomplete_core::CompletionEntry;

/// Format completion entries as a JSON array.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_json(entries: &[CompletionEntry], compact: bool) -> String {
    if compact {
        serde_json::to_string(entries).expect("serialization cannot fail")
    } else {
        serde_json::to_string_pretty(entries).expect("serialization cannot fail")
    }
}
