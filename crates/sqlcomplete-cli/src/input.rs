//! Input handling for SQL text, settings files and stdin.

use anyhow::{Context, Result};
use sqlcomplete_core::CompleterSettings;
use std::io::{self, Read};
use std::path::Path;

/// Marks the cursor position in SQL given on the command line.
pub const CURSOR_MARKER: char = '|';

/// Returns the SQL argument, or reads it from stdin when absent.
pub fn read_sql(sql: Option<&str>) -> Result<String> {
    match sql {
        Some(sql) => Ok(sql.to_string()),
        None => read_from_stdin(),
    }
}

fn read_from_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    // A single trailing newline comes from the shell, not the query.
    if content.ends_with('\n') {
        content.pop();
        if content.ends_with('\r') {
            content.pop();
        }
    }
    Ok(content)
}

/// Removes the first cursor marker and returns the SQL with the cursor offset.
///
/// Without a marker the cursor is placed at the end of the text.
pub fn split_cursor(text: &str) -> (String, usize) {
    match text.find(CURSOR_MARKER) {
        Some(offset) => {
            let mut sql = String::with_capacity(text.len() - 1);
            sql.push_str(&text[..offset]);
            sql.push_str(&text[offset + CURSOR_MARKER.len_utf8()..]);
            (sql, offset)
        }
        None => (text.to_string(), text.len()),
    }
}

/// Loads completer settings from a JSON file, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<CompleterSettings> {
    let Some(path) = path else {
        return Ok(CompleterSettings::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlcomplete_core::KeywordCasing;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_split_cursor_with_marker() {
        let (sql, offset) = split_cursor("SELECT | FROM users");
        assert_eq!(sql, "SELECT  FROM users");
        assert_eq!(offset, 7);
    }

    #[test]
    fn test_split_cursor_without_marker() {
        let (sql, offset) = split_cursor("SELECT * FROM us");
        assert_eq!(sql, "SELECT * FROM us");
        assert_eq!(offset, sql.len());
    }

    #[test]
    fn test_split_cursor_only_first_marker() {
        let (sql, offset) = split_cursor("a|b|c");
        assert_eq!(sql, "ab|c");
        assert_eq!(offset, 1);
    }

    #[test]
    fn test_read_sql_argument() {
        assert_eq!(read_sql(Some("SELECT 1")).unwrap(), "SELECT 1");
    }

    #[test]
    fn test_load_default_settings() {
        assert_eq!(load_settings(None).unwrap(), CompleterSettings::default());
    }

    #[test]
    fn test_load_settings_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"smartCompletion": false, "keywordCasing": "UPPER"}}"#).unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert!(!settings.smart_completion);
        assert_eq!(settings.keyword_casing, KeywordCasing::Upper);
    }

    #[test]
    fn test_load_settings_unknown_casing_is_auto() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"keywordCasing": "title"}}"#).unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert!(settings.smart_completion);
        assert_eq!(settings.keyword_casing, KeywordCasing::Auto);
    }

    #[test]
    fn test_load_missing_settings_file() {
        let result = load_settings(Some(&PathBuf::from("/nonexistent/settings.json")));
        assert!(result.is_err());
    }
}
