//! List command implementation.

use bootweld_archive::zip::ZipReader;
use bootweld_core::Entry;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON serializable entry data for archive listings.
#[derive(Debug, Serialize, Deserialize)]
struct EntryJson {
    name: String,
    size: u64,
    compressed_size: u64,
    method: String,
    crc: u32,
    is_dir: bool,
}

impl EntryJson {
    fn from_entry(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            size: entry.size,
            compressed_size: entry.compressed_size,
            method: entry.method.name().to_string(),
            crc: entry.crc32,
            is_dir: entry.is_dir(),
        }
    }
}

/// JSON output for archive listing.
#[derive(Debug, Serialize, Deserialize)]
struct ArchiveListJson {
    archive: String,
    entries: Vec<EntryJson>,
}

pub fn cmd_list(
    archive: &Path,
    verbose: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(archive)?;
    let reader = ZipReader::new(BufReader::new(file))?;

    if json {
        let listing = ArchiveListJson {
            archive: archive.display().to_string(),
            entries: reader.entries().iter().map(EntryJson::from_entry).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if verbose {
        println!("{:>10} {:>10} {:>8} {:>10} Name", "Size", "Packed", "Method", "CRC-32");
        for entry in reader.entries() {
            println!(
                "{:>10} {:>10} {:>8} {:>10x} {}",
                entry.size,
                entry.compressed_size,
                entry.method.name(),
                entry.crc32,
                entry.name
            );
        }
    } else {
        for entry in reader.entries() {
            println!("{}", entry.name);
        }
    }
    println!("{} entries", reader.entries().len());
    Ok(())
}
