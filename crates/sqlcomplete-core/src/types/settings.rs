//! Settings for a completion session.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// How completion text is capitalized.
///
/// `Auto` is resolved on the first match request of a session and then stays
/// fixed for the session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCasing {
    Upper,
    Lower,
    #[default]
    Auto,
}

impl KeywordCasing {
    /// Parses a casing name case-insensitively. Unrecognized names become `Auto`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "upper" => KeywordCasing::Upper,
            "lower" => KeywordCasing::Lower,
            _ => KeywordCasing::Auto,
        }
    }
}

impl<'de> Deserialize<'de> for KeywordCasing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&value))
    }
}

/// Settings for a [`crate::Completer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleterSettings {
    /// Classify the cursor context before matching (default: true).
    /// When off, every known identifier is prefix-matched.
    #[serde(default = "default_smart_completion")]
    pub smart_completion: bool,

    /// Capitalization of returned completions (default: auto).
    #[serde(default)]
    pub keyword_casing: KeywordCasing,
}

impl Default for CompleterSettings {
    fn default() -> Self {
        Self {
            smart_completion: true,
            keyword_casing: KeywordCasing::Auto,
        }
    }
}

fn default_smart_completion() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialization_defaults() {
        let settings: CompleterSettings = serde_json::from_str("{}").unwrap();
        assert!(settings.smart_completion);
        assert_eq!(settings.keyword_casing, KeywordCasing::Auto);
    }

    #[test]
    fn test_casing_is_case_insensitive() {
        let settings: CompleterSettings =
            serde_json::from_str(r#"{"keywordCasing": "UPPER"}"#).unwrap();
        assert_eq!(settings.keyword_casing, KeywordCasing::Upper);
    }

    #[test]
    fn test_unrecognized_casing_coerces_to_auto() {
        let settings: CompleterSettings =
            serde_json::from_str(r#"{"smartCompletion": false, "keywordCasing": "title"}"#)
                .unwrap();
        assert!(!settings.smart_completion);
        assert_eq!(settings.keyword_casing, KeywordCasing::Auto);
    }
}
