//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use sqlcomplete_core::{CompleterSettings, KeywordCasing};
use std::path::PathBuf;

/// sqlcomplete - MySQL identifier completion
#[derive(Parser, Debug)]
#[command(name = "sqlcomplete")]
#[command(about = "Complete SQL identifiers at a cursor position", long_about = None)]
#[command(version)]
pub struct Args {
    /// SQL text with the cursor marked by `|` (reads from stdin if omitted;
    /// without a marker the cursor is at the end)
    #[arg(value_name = "SQL")]
    pub sql: Option<String>,

    /// Catalog snapshot (JSON) describing databases, relations and columns
    #[arg(short = 'C', long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Completer settings file (JSON)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Prefix-match every known name instead of classifying the cursor context
    #[arg(long)]
    pub no_smart: bool,

    /// Capitalization of completions (overrides the settings file)
    #[arg(long, value_enum)]
    pub casing: Option<CasingArg>,

    /// Compact JSON output (no pretty-printing)
    #[arg(long)]
    pub compact: bool,
}

impl Args {
    /// Applies command-line overrides on top of file settings.
    pub fn apply_overrides(&self, settings: &mut CompleterSettings) {
        if self.no_smart {
            settings.smart_completion = false;
        }
        if let Some(casing) = self.casing {
            settings.keyword_casing = casing.into();
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One completion per line
    Text,
    /// JSON array of completion entries
    Json,
}

/// Casing options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CasingArg {
    Upper,
    Lower,
    Auto,
}

impl From<CasingArg> for KeywordCasing {
    fn from(casing: CasingArg) -> Self {
        match casing {
            CasingArg::Upper => KeywordCasing::Upper,
            CasingArg::Lower => KeywordCasing::Lower,
            CasingArg::Auto => KeywordCasing::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let args = Args::parse_from(["sqlcomplete", "SELECT * FROM |"]);
        assert_eq!(args.sql.as_deref(), Some("SELECT * FROM |"));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.catalog.is_none());
        assert!(!args.no_smart);
        assert!(args.casing.is_none());
    }

    #[test]
    fn test_parse_full_args() {
        let args = Args::parse_from([
            "sqlcomplete",
            "--catalog",
            "catalog.json",
            "-c",
            "settings.json",
            "-f",
            "json",
            "--no-smart",
            "--casing",
            "lower",
            "--compact",
            "sel",
        ]);
        assert_eq!(args.catalog.unwrap().to_str().unwrap(), "catalog.json");
        assert_eq!(args.config.unwrap().to_str().unwrap(), "settings.json");
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.no_smart);
        assert_eq!(args.casing, Some(CasingArg::Lower));
        assert!(args.compact);
        assert_eq!(args.sql.as_deref(), Some("sel"));
    }

    #[test]
    fn test_overrides_replace_file_settings() {
        let args = Args::parse_from(["sqlcomplete", "--no-smart", "--casing", "upper"]);
        let mut settings = CompleterSettings::default();
        args.apply_overrides(&mut settings);
        assert!(!settings.smart_completion);
        assert_eq!(settings.keyword_casing, KeywordCasing::Upper);
    }

    #[test]
    fn test_no_overrides_keep_file_settings() {
        let args = Args::parse_from(["sqlcomplete"]);
        let mut settings = CompleterSettings {
            smart_completion: true,
            keyword_casing: KeywordCasing::Lower,
        };
        args.apply_overrides(&mut settings);
        assert!(settings.smart_completion);
        assert_eq!(settings.keyword_casing, KeywordCasing::Lower);
    }
}
