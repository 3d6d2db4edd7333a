//! Jar content writer.
//!
//! [`JarWriter`] layers jar conventions over the raw [`ZipWriter`]: every
//! leaf entry gets its ancestor directories synthesized first, duplicate
//! names are silently ignored (first write wins), nested libraries are
//! embedded uncompressed with a precomputed digest, and entries merged from
//! another archive get the store-vs-deflate decision by sniffing their
//! content for a zip header.

use bootweld_core::crc::StreamDigest;
use bootweld_core::entry::{parent_of, CompressionMethod};
use bootweld_core::error::Result;
use bootweld_core::peek::PeekReader;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

use super::manifest::{Manifest, MANIFEST_NAME};
use crate::zip::{ZipReader, ZipWriter};

/// Stateful writer over one output jar.
///
/// The dedup name set is owned by this instance alone; it never outlives or
/// leaks past the writer.
pub struct JarWriter<W: Write> {
    zip: ZipWriter<W>,
    written: HashSet<String>,
}

impl JarWriter<BufWriter<File>> {
    /// Create (or truncate) the output jar at `target`, creating parent
    /// directories as needed.
    pub fn create(target: &Path) -> Result<Self> {
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(target)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JarWriter<W> {
    /// Wrap an output stream.
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            written: HashSet::new(),
        }
    }

    /// Write the manifest at its conventional entry name.
    pub fn write_manifest(&mut self, manifest: &Manifest) -> Result<()> {
        self.write_entry(MANIFEST_NAME, &manifest.to_bytes())
    }

    /// Write a file entry with DEFLATE compression.
    ///
    /// A name that was already written is a no-op.
    pub fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if self.written.contains(name) {
            return Ok(());
        }
        self.ensure_ancestors(name)?;
        self.zip.add_file(name, data)?;
        self.written.insert(name.to_string());
        Ok(())
    }

    /// Write a file entry with STORE, streaming from a reader whose CRC and
    /// size were computed up front.
    pub fn write_stored_entry<R: Read>(
        &mut self,
        name: &str,
        digest: StreamDigest,
        reader: &mut R,
    ) -> Result<()> {
        if self.written.contains(name) {
            return Ok(());
        }
        self.ensure_ancestors(name)?;
        self.zip.add_file_stored(name, digest, reader)?;
        self.written.insert(name.to_string());
        Ok(())
    }

    /// Embed a library file verbatim under `destination_prefix`, stored.
    ///
    /// The file is read twice: once for the digest, once for the copy.
    /// Returns the destination entry name.
    pub fn write_stored_library(
        &mut self,
        destination_prefix: &str,
        library: &Path,
    ) -> Result<String> {
        let filename = library
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!("{}{}", destination_prefix, filename);

        let digest = StreamDigest::consume(&mut File::open(library)?)?;
        let mut file = File::open(library)?;
        self.write_stored_entry(&name, digest, &mut file)?;
        Ok(name)
    }

    /// Merge every non-directory entry of a source archive under `prefix`.
    ///
    /// The source's own manifest is skipped; the output manifest is the
    /// writer's to produce. Content that itself starts with a zip header is
    /// embedded stored, so an already-compressed payload is never
    /// re-deflated; entries the source already stored keep STORE as well.
    /// Everything else takes the default DEFLATE path.
    pub fn write_sniffed_entries<R: Read + Seek>(
        &mut self,
        source: &mut ZipReader<R>,
        prefix: &str,
    ) -> Result<()> {
        let entries: Vec<_> = source.entries().to_vec();
        for entry in entries {
            if entry.is_dir() || entry.name == MANIFEST_NAME {
                continue;
            }
            let destination = format!("{}{}", prefix, entry.name);
            let content = source.extract(&entry)?;
            let mut peek = PeekReader::new(Cursor::new(content))?;
            let keep_stored = peek.has_zip_header() || entry.method == CompressionMethod::Stored;
            let mut replay = Vec::new();
            peek.read_to_end(&mut replay)?;
            if keep_stored {
                let digest = StreamDigest::of(&replay);
                self.write_stored_entry(&destination, digest, &mut Cursor::new(replay))?;
            } else {
                self.write_entry(&destination, &replay)?;
            }
        }
        Ok(())
    }

    /// Write the `.class` entries of a loader archive at the output root,
    /// preserving their internal paths. Resources are excluded.
    pub fn write_loader_classes<R: Read + Seek>(
        &mut self,
        loader: &mut ZipReader<R>,
    ) -> Result<()> {
        let entries: Vec<_> = loader.entries().to_vec();
        for entry in entries {
            if entry.is_file() && entry.name.ends_with(".class") {
                let content = loader.extract(&entry)?;
                self.write_entry(&entry.name, &content)?;
            }
        }
        Ok(())
    }

    /// Finalize the archive's central directory.
    ///
    /// Must run on every exit path; dropping the writer finishes it as a
    /// last resort, but errors are only observable here.
    pub fn close(&mut self) -> Result<()> {
        self.zip.finish()
    }

    /// Synthesize any missing ancestor directory entries, outermost first.
    fn ensure_ancestors(&mut self, name: &str) -> Result<()> {
        if let Some(parent) = parent_of(name) {
            if !self.written.contains(parent) {
                let parent = parent.to_string();
                self.ensure_ancestors(&parent)?;
                self.zip.add_directory(&parent)?;
                self.written.insert(parent);
            }
        }
        Ok(())
    }
}

/// Best-effort: grant owner-execute on the produced archive.
///
/// Failure is ignored; the jar content is complete and valid regardless.
pub fn mark_executable(target: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = std::fs::metadata(target) {
            let mut permissions = metadata.permissions();
            permissions.set_mode(permissions.mode() | 0o100);
            let _ = std::fs::set_permissions(target, permissions);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootweld_core::entry::Entry;

    fn read_back(bytes: Vec<u8>) -> ZipReader<Cursor<Vec<u8>>> {
        ZipReader::new(Cursor::new(bytes)).unwrap()
    }

    fn names(reader: &ZipReader<Cursor<Vec<u8>>>) -> Vec<String> {
        reader.entries().iter().map(|e| e.name.clone()).collect()
    }

    #[test]
    fn test_ancestors_written_first_and_once() {
        let mut output = Vec::new();
        {
            let mut jar = JarWriter::new(&mut output);
            jar.write_entry("a/b/c.class", b"cafebabe").unwrap();
            jar.write_entry("a/b/d.class", b"cafebabe").unwrap();
            jar.write_entry("a/e.txt", b"resource").unwrap();
            jar.close().unwrap();
        }
        let reader = read_back(output);
        assert_eq!(
            names(&reader),
            ["a/", "a/b/", "a/b/c.class", "a/b/d.class", "a/e.txt"]
        );
    }

    #[test]
    fn test_duplicate_entry_is_noop_first_wins() {
        let mut output = Vec::new();
        {
            let mut jar = JarWriter::new(&mut output);
            jar.write_entry("x.txt", b"first").unwrap();
            jar.write_entry("x.txt", b"second").unwrap();
            jar.close().unwrap();
        }
        let mut reader = read_back(output);
        assert_eq!(names(&reader), ["x.txt"]);
        assert_eq!(reader.extract_by_name("x.txt").unwrap(), b"first");
    }

    #[test]
    fn test_manifest_written_at_conventional_name() {
        let mut manifest = Manifest::new();
        manifest.set("Main-Class", "com.acme.App");

        let mut output = Vec::new();
        {
            let mut jar = JarWriter::new(&mut output);
            jar.write_manifest(&manifest).unwrap();
            jar.close().unwrap();
        }
        let mut reader = read_back(output);
        assert_eq!(names(&reader), ["META-INF/", MANIFEST_NAME]);
        let parsed = Manifest::parse(&reader.extract_by_name(MANIFEST_NAME).unwrap()).unwrap();
        assert_eq!(parsed.get("Main-Class"), Some("com.acme.App"));
    }

    #[test]
    fn test_stored_library_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("dep-1.0.jar");
        let payload: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();
        std::fs::write(&lib, &payload).unwrap();

        let mut output = Vec::new();
        {
            let mut jar = JarWriter::new(&mut output);
            let name = jar.write_stored_library("LIB-ROOT/lib/", &lib).unwrap();
            assert_eq!(name, "LIB-ROOT/lib/dep-1.0.jar");
            jar.close().unwrap();
        }

        let mut reader = read_back(output);
        let entry = reader
            .entry_by_name("LIB-ROOT/lib/dep-1.0.jar")
            .cloned()
            .unwrap();
        assert_eq!(entry.method, CompressionMethod::Stored);
        assert_eq!(entry.size, payload.len() as u64);
        assert_eq!(entry.crc32, StreamDigest::of(&payload).crc32());
        assert_eq!(reader.extract(&entry).unwrap(), payload);
    }

    #[test]
    fn test_sniffed_zip_content_forced_to_store() {
        // Inner archive deflated inside the source archive.
        let mut inner = Vec::new();
        {
            let mut writer = ZipWriter::new(&mut inner);
            writer
                .add_file("inner.txt", "inner content ".repeat(50).as_bytes())
                .unwrap();
            writer.finish().unwrap();
        }

        let mut source = Vec::new();
        {
            let mut writer = ZipWriter::new(&mut source);
            writer.add_file("nested.zip", &inner).unwrap();
            writer
                .add_file("plain.txt", "plain text ".repeat(50).as_bytes())
                .unwrap();
            writer.finish().unwrap();
        }

        let mut output = Vec::new();
        {
            let mut jar = JarWriter::new(&mut output);
            let mut reader = ZipReader::new(Cursor::new(source)).unwrap();
            jar.write_sniffed_entries(&mut reader, "merged/").unwrap();
            jar.close().unwrap();
        }

        let mut reader = read_back(output);
        let nested = reader.entry_by_name("merged/nested.zip").cloned().unwrap();
        assert_eq!(nested.method, CompressionMethod::Stored);
        assert_eq!(reader.extract(&nested).unwrap(), inner);

        let plain = reader.entry_by_name("merged/plain.txt").cloned().unwrap();
        assert_eq!(plain.method, CompressionMethod::Deflate);
    }

    #[test]
    fn test_source_stored_entry_keeps_store() {
        let payload = b"already stored, not an archive".to_vec();
        let mut source = Vec::new();
        {
            let mut writer = ZipWriter::new(&mut source);
            writer
                .add_file_stored(
                    "data.bin",
                    StreamDigest::of(&payload),
                    &mut Cursor::new(&payload),
                )
                .unwrap();
            writer.finish().unwrap();
        }

        let mut output = Vec::new();
        {
            let mut jar = JarWriter::new(&mut output);
            let mut reader = ZipReader::new(Cursor::new(source)).unwrap();
            jar.write_sniffed_entries(&mut reader, "merged/").unwrap();
            jar.close().unwrap();
        }

        let mut reader = read_back(output);
        let entry = reader.entry_by_name("merged/data.bin").cloned().unwrap();
        assert_eq!(entry.method, CompressionMethod::Stored);
        assert_eq!(reader.extract(&entry).unwrap(), payload);
    }

    #[test]
    fn test_loader_classes_only() {
        let mut loader = Vec::new();
        {
            let mut writer = ZipWriter::new(&mut loader);
            writer
                .add_file("org/boot/Launcher.class", b"\xCA\xFE\xBA\xBEloader")
                .unwrap();
            writer.add_file("org/boot/launcher.properties", b"k=v").unwrap();
            writer.finish().unwrap();
        }

        let mut output = Vec::new();
        {
            let mut jar = JarWriter::new(&mut output);
            let mut reader = ZipReader::new(Cursor::new(loader)).unwrap();
            jar.write_loader_classes(&mut reader).unwrap();
            jar.close().unwrap();
        }

        let reader = read_back(output);
        let entry_names = names(&reader);
        assert!(entry_names.contains(&"org/boot/Launcher.class".to_string()));
        assert!(!entry_names.iter().any(|n| n.ends_with(".properties")));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut jar = JarWriter::new(Vec::new());
        jar.write_entry("a.txt", b"a").unwrap();
        jar.close().unwrap();
        jar.close().unwrap();
    }

    #[test]
    fn test_entry_kind_helpers() {
        assert!(Entry::directory("d").is_dir());
        assert!(Entry::file("f", 1).is_file());
    }
}
