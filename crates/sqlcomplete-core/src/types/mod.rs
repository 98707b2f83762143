//! Types for the SQL completion API.
//!
//! This module defines the request, suggestion and response types exchanged with
//! the completion engine, plus the settings that tune it.

mod completion;
mod settings;

// Re-export all public types
pub use completion::{
    CompletionCategory, CompletionEntry, CompletionRequest, Suggestion, TableRef,
};
pub use settings::{CompleterSettings, KeywordCasing};
