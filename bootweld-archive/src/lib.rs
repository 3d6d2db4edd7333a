//! # Bootweld Archive
//!
//! Jar and ZIP container support for Bootweld.
//!
//! This crate provides the container layer of the assembler:
//!
//! - [`zip`]: a forward-only ZIP writer and a central-directory reader
//! - [`jar`]: the manifest model, the deduplicating [`JarWriter`] and the
//!   [`BootJarAssembler`] that welds application classes, nested dependency
//!   jars and a boot loader into one self-executing archive
//!
//! ## Example
//!
//! ```rust,no_run
//! use bootweld_archive::jar::{AssemblyRequest, BootJarAssembler, EntryPoint};
//! use std::path::Path;
//!
//! let request = AssemblyRequest {
//!     source_jar: "target/app.jar".into(),
//!     nested_libs: vec!["libs/dep-1.0.jar".into()],
//!     loader_jar: "loader/spring-boot-loader.jar".into(),
//!     entry_point: EntryPoint::Explicit("com.acme.App".into()),
//!     version: "3.3.0".into(),
//! };
//! let outcome = BootJarAssembler::new(request)
//!     .assemble(Path::new("target/app-boot.jar"))
//!     .unwrap();
//! println!("wrote {}", outcome.target.display());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod jar;
pub mod zip;

// Re-exports
pub use jar::{
    AssemblyOutcome, AssemblyRequest, BootJarAssembler, ClassScan, EntryPoint, JarWriter, Manifest,
};
pub use zip::{ZipReader, ZipWriter};
