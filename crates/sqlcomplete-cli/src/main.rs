//! sqlcomplete CLI - MySQL identifier completion

use sqlcomplete_cli::cli::{Args, OutputFormat};
use sqlcomplete_cli::input;
use sqlcomplete_cli::output::{format_json, format_text};
use sqlcomplete_cli::snapshot::CatalogSnapshot;

use anyhow::{Context, Result};
use clap::Parser;
use sqlcomplete_core::{Completer, CompletionRequest};
use std::io::{self, Write};
use std::process::ExitCode;

/// Configuration or input error (unreadable file, invalid JSON, bad cursor).
const EXIT_CONFIG_ERROR: u8 = 66;

/// Environment variable holding the log filter (e.g. `debug`, `sqlcomplete_core=trace`).
const LOG_ENV: &str = "SQLCOMPLETE_LOG";

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sqlcomplete: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn run(args: Args) -> Result<()> {
    let mut settings = input::load_settings(args.config.as_deref())?;
    args.apply_overrides(&mut settings);
    tracing::debug!(?settings, "completer settings");

    let completer = Completer::new(&settings);
    if let Some(path) = &args.catalog {
        let snapshot = CatalogSnapshot::load(path)?;
        snapshot.apply(&mut completer.catalog().write());
    }

    let text = input::read_sql(args.sql.as_deref())?;
    let (sql, cursor_offset) = input::split_cursor(&text);
    let request = CompletionRequest::new(sql, cursor_offset);

    let entries = completer
        .complete_request(&request)
        .context("Invalid completion request")?;
    tracing::info!(count = entries.len(), cursor_offset, "completion finished");

    let rendered = match args.format {
        OutputFormat::Text => format_text(&entries, true),
        OutputFormat::Json => {
            let mut json = format_json(&entries, args.compact);
            json.push('\n');
            json
        }
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("Failed to write output")?;
    Ok(())
}
