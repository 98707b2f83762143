//! sqlcomplete CLI library.
//!
//! This module exposes internal types for testing purposes.
//! The main entry point is the `sqlcomplete` binary.

pub mod cli;
pub mod input;
pub mod output;
pub mod snapshot;

// Re-export commonly used types
pub use cli::Args;
pub use snapshot::CatalogSnapshot;
