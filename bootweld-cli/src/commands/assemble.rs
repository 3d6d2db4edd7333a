//! Assemble command implementation.

use bootweld_archive::jar::{AssemblyRequest, BootJarAssembler, EntryPoint};
use std::path::{Path, PathBuf};

#[allow(clippy::too_many_arguments)]
pub fn cmd_assemble(
    source: &Path,
    loader: &Path,
    output: &Path,
    main_class: &str,
    libs: &[PathBuf],
    version_tag: &str,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = AssemblyRequest {
        source_jar: source.to_path_buf(),
        nested_libs: libs.to_vec(),
        loader_jar: loader.to_path_buf(),
        entry_point: EntryPoint::Explicit(main_class.to_string()),
        version: version_tag.to_string(),
    };

    let outcome = BootJarAssembler::new(request).assemble(output)?;

    for skipped in &outcome.skipped_libs {
        eprintln!(
            "Warning: {} does not exist or is a directory, skipped",
            skipped.display()
        );
    }
    if verbose {
        println!("Start-Class: {}", outcome.start_class);
        println!("Embedded libraries: {}", libs.len() - outcome.skipped_libs.len());
    }
    println!("Executable jar created at {}", outcome.target.display());
    Ok(())
}
