//! Build command implementation

use crate::description::BookDescription;
use anyhow::{Context, Result};
use folio_core::SourceFetcher;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Build an EPUB from a JSON book description
pub fn build(input: &str, output: &str, timeout: u64) -> Result<()> {
    let input_path = Path::new(input);
    let base_dir = input_path.parent().unwrap_or_else(|| Path::new("."));

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading book description...");
    let description = BookDescription::load(input_path)?;
    let mut book = description
        .into_book(base_dir)
        .with_context(|| format!("Failed to assemble book from {}", input))?;

    tracing::info!(
        "Assembled '{}' with {} sections",
        book.title(),
        book.sections().len()
    );

    pb.set_message("Writing EPUB...");
    let fetcher = SourceFetcher::new()
        .with_base_dir(base_dir)
        .with_timeout(Duration::from_secs(timeout));
    let result = book
        .write_with(output, &fetcher)
        .with_context(|| format!("Failed to write {}", output));

    match result {
        Ok(()) => {
            pb.finish_with_message(format!("Wrote {}", output));
            Ok(())
        }
        Err(e) => {
            pb.abandon_with_message("Build failed");
            Err(e)
        }
    }
}
