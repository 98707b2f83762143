//! Human-readable output, one completion per line.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use sqlcomplete_core::{CompletionCategory, CompletionEntry};
use std::fmt::Write;

/// Format completion entries as `text<TAB>category` lines, colored on a terminal.
/// Entries without a category print the text alone.
pub fn format_text(entries: &[CompletionEntry], use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    for entry in entries {
        if colored {
            write!(out, "{}", entry.text.bold()).unwrap();
        } else {
            write!(out, "{}", entry.text).unwrap();
        }
        match entry.category.map(category_label) {
            Some(label) if colored => writeln!(out, "\t{}", label.dimmed()).unwrap(),
            Some(label) => writeln!(out, "\t{label}").unwrap(),
            None => writeln!(out).unwrap(),
        }
    }

    out
}

fn category_label(category: CompletionCategory) -> &'static str {
    match category {
        CompletionCategory::Column => "column",
        CompletionCategory::Function => "function",
        CompletionCategory::Table => "table",
        CompletionCategory::View => "view",
        CompletionCategory::Alias => "alias",
        CompletionCategory::Database => "database",
        CompletionCategory::Keyword => "keyword",
        CompletionCategory::Show => "show",
        CompletionCategory::Change => "change",
        CompletionCategory::User => "user",
    }
}
