//! Full assembly runs driven through the public API, against real files.

use bootweld_archive::jar::{
    AssemblyRequest, BootJarAssembler, ClassScan, EntryPoint, Manifest, LAUNCHER_CLASS,
};
use bootweld_archive::zip::{ZipReader, ZipWriter};
use bootweld_core::entry::CompressionMethod;
use std::io::Cursor;
use std::path::{Path, PathBuf};

fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
    let mut bytes = Vec::new();
    {
        let mut writer = ZipWriter::new(&mut bytes);
        for (name, data) in entries {
            writer.add_file(name, data).unwrap();
        }
        writer.finish().unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

fn build_request(root: &Path) -> (AssemblyRequest, PathBuf) {
    let source = root.join("app.jar");
    write_jar(
        &source,
        &[
            ("com/acme/App.class", b"\xCA\xFE\xBA\xBEapp"),
            ("application.properties", b"server.port=8080\n"),
        ],
    );

    let loader = root.join("loader.jar");
    write_jar(&loader, &[("org/boot/Launcher.class", b"\xCA\xFE\xBA\xBEld")]);

    let lib = root.join("dep-1.0.jar");
    write_jar(&lib, &[("dep/Klass.class", b"\xCA\xFE\xBA\xBEdep")]);

    let request = AssemblyRequest {
        source_jar: source,
        nested_libs: vec![lib],
        loader_jar: loader,
        entry_point: EntryPoint::Discover(ClassScan {
            main_classes: vec!["com.acme.App".into()],
            annotated_classes: vec!["com.acme.App".into()],
        }),
        version: "3.3.1".into(),
    };
    (request, root.join("app-boot.jar"))
}

#[test]
fn assembled_jar_is_a_valid_archive_with_expected_layout() {
    let dir = tempfile::tempdir().unwrap();
    let (request, target) = build_request(dir.path());

    BootJarAssembler::new(request).assemble(&target).unwrap();

    let bytes = std::fs::read(&target).unwrap();
    let mut reader = ZipReader::new(Cursor::new(bytes)).unwrap();

    // Manifest first in the archive.
    let first_file = reader
        .entries()
        .iter()
        .find(|e| e.is_file())
        .unwrap()
        .name
        .clone();
    assert_eq!(first_file, "META-INF/MANIFEST.MF");

    let manifest = Manifest::parse(&reader.extract_by_name("META-INF/MANIFEST.MF").unwrap()).unwrap();
    assert_eq!(manifest.get("Main-Class"), Some(LAUNCHER_CLASS));
    assert_eq!(manifest.get("Start-Class"), Some("com.acme.App"));

    // Resources travel with the classes, at the classes root.
    assert_eq!(
        reader
            .extract_by_name("BOOT-INF/classes/application.properties")
            .unwrap(),
        b"server.port=8080\n"
    );

    // The dependency jar is embedded whole, uncompressed.
    let dep = reader
        .entry_by_name("BOOT-INF/lib/dep-1.0.jar")
        .cloned()
        .unwrap();
    assert_eq!(dep.method, CompressionMethod::Stored);

    // And its bytes still form a readable archive of their own.
    let dep_bytes = reader.extract(&dep).unwrap();
    let mut dep_reader = ZipReader::new(Cursor::new(dep_bytes)).unwrap();
    assert_eq!(
        dep_reader.extract_by_name("dep/Klass.class").unwrap(),
        b"\xCA\xFE\xBA\xBEdep"
    );
}

#[cfg(unix)]
#[test]
fn assembled_jar_gets_owner_execute_bit() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let (request, target) = build_request(dir.path());
    BootJarAssembler::new(request).assemble(&target).unwrap();

    let mode = std::fs::metadata(&target).unwrap().permissions().mode();
    assert_ne!(mode & 0o100, 0, "owner-execute bit not set, mode {:o}", mode);
}

#[test]
fn reassembling_over_an_existing_target_truncates_it() {
    let dir = tempfile::tempdir().unwrap();
    let (request, target) = build_request(dir.path());

    std::fs::write(&target, b"stale garbage from a previous run").unwrap();
    BootJarAssembler::new(request).assemble(&target).unwrap();

    let bytes = std::fs::read(&target).unwrap();
    let reader = ZipReader::new(Cursor::new(bytes)).unwrap();
    assert!(reader.entry_by_name("META-INF/MANIFEST.MF").is_some());
}
