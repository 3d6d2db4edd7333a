//! Boot jar assembly.
//!
//! [`BootJarAssembler`] welds a compiled application jar, its dependency
//! jars and a boot loader jar into one self-executing archive whose layout
//! and manifest attributes match what the Spring Boot launcher expects at
//! runtime.

use bootweld_core::error::{BootweldError, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::manifest::{Manifest, MANIFEST_NAME};
use super::writer::{mark_executable, JarWriter};
use crate::zip::ZipReader;

/// Launcher main class embedded by loaders 3.2.0 and newer.
pub const LAUNCHER_CLASS: &str = "org.springframework.boot.loader.launch.JarLauncher";

/// Launcher main class for loaders older than 3.2.0.
pub const LAUNCHER_CLASS_LEGACY: &str = "org.springframework.boot.loader.JarLauncher";

/// Loader version where the launcher package moved.
const LAUNCHER_PACKAGE_MOVE_VERSION: &str = "3.2.0";

/// Root of the embedded application classes inside the output jar.
pub const CLASSES_ROOT: &str = "BOOT-INF/classes/";

/// Root of the embedded dependency jars inside the output jar.
pub const LIBS_ROOT: &str = "BOOT-INF/lib/";

/// Classpath index entry listing the embedded libraries in order.
const CLASSPATH_IDX: &str = "BOOT-INF/classpath.idx";

/// Service registration consumed by `java.nio.file.spi` at runtime.
const FS_PROVIDER_SERVICE: &str = "META-INF/services/java.nio.file.spi.FileSystemProvider";

/// The loader's nested-archive file system provider.
const FS_PROVIDER_CLASS: &str = "org.springframework.boot.loader.nio.file.NestedFileSystemProvider";

/// Result of an entry-point scan, supplied by an external classpath
/// inspection facility.
///
/// Candidate orders are preserved as scanned; resolution picks the first
/// match in that order, whatever it was.
#[derive(Debug, Clone, Default)]
pub struct ClassScan {
    /// Classes declaring `public static void main(String[])`, in scan order.
    pub main_classes: Vec<String>,
    /// Classes carrying the application marker annotation.
    pub annotated_classes: Vec<String>,
}

impl ClassScan {
    /// Resolve the entry point: the first main-method class that also
    /// carries the marker annotation.
    ///
    /// Kotlin hosts `main` in a synthesized `<Name>Kt` class while the
    /// annotation sits on `<Name>`; a second pass covers that split.
    pub fn resolve(&self) -> Option<&str> {
        for name in &self.main_classes {
            if self.annotated_classes.iter().any(|a| a == name) {
                return Some(name);
            }
        }
        for name in &self.main_classes {
            if let Some(original) = name.strip_suffix("Kt") {
                if self.annotated_classes.iter().any(|a| a == original) {
                    return Some(name);
                }
            }
        }
        None
    }
}

/// How the application entry point is determined.
#[derive(Debug, Clone)]
pub enum EntryPoint {
    /// Use this class name verbatim.
    Explicit(String),
    /// Resolve from an externally supplied scan.
    Discover(ClassScan),
}

/// Immutable input bundle for one assembly run.
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    /// The compiled application jar.
    pub source_jar: PathBuf,
    /// Dependency jars to embed, in classpath order.
    pub nested_libs: Vec<PathBuf>,
    /// The boot loader jar whose classes run first.
    pub loader_jar: PathBuf,
    /// Entry-point policy.
    pub entry_point: EntryPoint,
    /// Loader version tag recorded in the manifest.
    pub version: String,
}

/// What an assembly run produced.
#[derive(Debug, Clone)]
pub struct AssemblyOutcome {
    /// Path of the written jar.
    pub target: PathBuf,
    /// The resolved application entry point.
    pub start_class: String,
    /// Nested lib paths skipped because they were missing or directories.
    pub skipped_libs: Vec<PathBuf>,
}

/// Orchestrates one jar assembly from request to finished archive.
pub struct BootJarAssembler {
    request: AssemblyRequest,
}

impl BootJarAssembler {
    /// Create an assembler for a request.
    pub fn new(request: AssemblyRequest) -> Self {
        Self { request }
    }

    /// Assemble the executable jar at `target`.
    ///
    /// Structural preconditions (source jar present, entry point
    /// resolvable) are checked before the target is touched. Once writing
    /// starts, the first error aborts; the partially written target is left
    /// behind, not cleaned up.
    pub fn assemble(&self, target: &Path) -> Result<AssemblyOutcome> {
        let request = &self.request;
        if !request.source_jar.is_file() {
            return Err(BootweldError::missing_source_archive(&request.source_jar));
        }
        let start_class = match &request.entry_point {
            EntryPoint::Explicit(name) => name.clone(),
            EntryPoint::Discover(scan) => scan
                .resolve()
                .map(str::to_string)
                .ok_or(BootweldError::NoEntryPointFound)?,
        };

        let mut source = open_reader(&request.source_jar)?;
        let base_manifest = match source.entry_by_name(MANIFEST_NAME).cloned() {
            Some(entry) => Some(Manifest::parse(&source.extract(&entry)?)?),
            None => None,
        };
        let manifest = self.build_manifest(base_manifest.as_ref(), &start_class);

        let (libs, skipped_libs) = sanitize_libs(&request.nested_libs);

        let mut jar = JarWriter::create(target)?;
        jar.write_manifest(&manifest)?;

        let mut loader = open_reader(&request.loader_jar)?;
        jar.write_loader_classes(&mut loader)?;

        jar.write_sniffed_entries(&mut source, CLASSES_ROOT)?;

        let mut lib_names = Vec::new();
        for lib in &libs {
            let name = jar.write_stored_library(LIBS_ROOT, lib)?;
            if !lib_names.contains(&name) {
                lib_names.push(name);
            }
        }

        jar.write_entry(CLASSPATH_IDX, classpath_idx(&lib_names).as_bytes())?;
        jar.write_entry(FS_PROVIDER_SERVICE, format!("{}\n", FS_PROVIDER_CLASS).as_bytes())?;

        jar.close()?;
        mark_executable(target);

        Ok(AssemblyOutcome {
            target: target.to_path_buf(),
            start_class,
            skipped_libs,
        })
    }

    /// Merge the source jar's manifest with the synthesized launch
    /// attributes; synthesized keys win.
    fn build_manifest(&self, base: Option<&Manifest>, start_class: &str) -> Manifest {
        let launcher = launcher_class(&self.request.version);
        Manifest::merged(
            base,
            &[
                ("Main-Class", launcher),
                ("Start-Class", start_class),
                ("Spring-Boot-Version", &self.request.version),
                ("Spring-Boot-Classes", CLASSES_ROOT),
                ("Spring-Boot-Lib", LIBS_ROOT),
            ],
        )
    }
}

/// Pick the launcher class for a loader version.
fn launcher_class(version: &str) -> &'static str {
    if version_lt(version, LAUNCHER_PACKAGE_MOVE_VERSION) {
        LAUNCHER_CLASS_LEGACY
    } else {
        LAUNCHER_CLASS
    }
}

/// Compare dotted versions segment by segment, numerically where possible.
fn version_lt(a: &str, b: &str) -> bool {
    let mut left = a.split(['.', '-']);
    let mut right = b.split(['.', '-']);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return false,
            (None, Some(_)) => return true,
            (Some(_), None) => return false,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(nx), Ok(ny)) => nx.cmp(&ny),
                    _ => x.cmp(y),
                };
                match ordering {
                    std::cmp::Ordering::Less => return true,
                    std::cmp::Ordering::Greater => return false,
                    std::cmp::Ordering::Equal => {}
                }
            }
        }
    }
}

/// Drop nested lib paths that do not exist or are directories.
fn sanitize_libs(libs: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut kept = Vec::new();
    let mut skipped = Vec::new();
    for lib in libs {
        if lib.is_file() {
            kept.push(lib.clone());
        } else {
            skipped.push(lib.clone());
        }
    }
    (kept, skipped)
}

fn classpath_idx(lib_names: &[String]) -> String {
    let mut out = String::new();
    for name in lib_names {
        out.push_str(&format!("- \"{}\"\n", name));
    }
    out
}

fn open_reader(path: &Path) -> Result<ZipReader<BufReader<File>>> {
    Ok(ZipReader::new(BufReader::new(File::open(path)?))?)
}
