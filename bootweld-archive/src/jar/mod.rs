//! Jar container support: manifest model, content writer, boot assembler.

pub mod boot;
pub mod manifest;
pub mod writer;

pub use boot::{
    AssemblyOutcome, AssemblyRequest, BootJarAssembler, ClassScan, EntryPoint, CLASSES_ROOT,
    LAUNCHER_CLASS, LAUNCHER_CLASS_LEGACY, LIBS_ROOT,
};
pub use manifest::{Manifest, MANIFEST_NAME};
pub use writer::{mark_executable, JarWriter};
