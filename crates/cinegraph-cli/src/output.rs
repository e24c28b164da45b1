//! Terminal output formatting.
//!
//! Results go to stdout as pretty JSON; status lines go to stderr.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

/// Print a result as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render result")?;
    println!("{}", rendered);
    Ok(())
}

/// Print a success line on stderr.
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print a dimmed note on stderr, used for empty results.
pub fn note(message: &str) {
    eprintln!("{}", message.dimmed());
}

/// Print a list result, noting when it is empty.
pub fn print_list<T: Serialize>(items: &[T], empty: &str) -> Result<()> {
    if items.is_empty() {
        note(empty);
    }
    print_json(items)
}
