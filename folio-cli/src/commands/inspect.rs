//! Inspect command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use zip::ZipArchive;

/// One archive entry
#[derive(Serialize)]
struct EntryInfo {
    name: String,
    compression: String,
    size: u64,
    compressed_size: u64,
}

/// List the entries of an EPUB archive in stored order
pub fn inspect(input: &str, json: bool) -> Result<()> {
    let file = File::open(input).with_context(|| format!("Failed to open input file: {}", input))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("{} is not a zip archive", input))?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to read entry {} of {}", i, input))?;
        entries.push(EntryInfo {
            name: entry.name().to_string(),
            compression: format!("{:?}", entry.compression()),
            size: entry.size(),
            compressed_size: entry.compressed_size(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!(
                "{:<10} {:>10} {:>10}  {}",
                entry.compression, entry.size, entry.compressed_size, entry.name
            );
        }
        println!("{} entries", entries.len());
    }

    Ok(())
}
