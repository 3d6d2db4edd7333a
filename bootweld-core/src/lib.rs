//! # Bootweld Core
//!
//! Core components for the Bootweld jar assembler.
//!
//! This crate provides the fundamental building blocks the container layer
//! is built from:
//!
//! - [`crc`]: CRC-32 checksum and [`StreamDigest`] for one-pass CRC/size
//!   precomputation over a byte stream
//! - [`peek`]: [`PeekReader`], a buffered-lookahead decorator that sniffs a
//!   container magic without consuming it
//! - [`entry`]: archive entry metadata with a typed file/directory split
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! Bootweld is layered:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Assembly                                            │
//! │     BootJarAssembler, CLI                               │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Container                                           │
//! │     ZIP reader/writer, JarWriter, Manifest              │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Primitives (this crate)                             │
//! │     Crc32, StreamDigest, PeekReader, Entry              │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod crc;
pub mod entry;
pub mod error;
pub mod peek;

// Re-exports for convenience
pub use crc::{Crc32, StreamDigest};
pub use entry::{parent_of, CompressionMethod, Entry, EntryKind};
pub use error::{BootweldError, Result};
pub use peek::{PeekReader, ZIP_HEADER};
