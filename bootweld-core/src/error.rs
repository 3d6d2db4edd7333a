//! Error types for Bootweld operations.
//!
//! This module provides a single error type that covers all failure modes of
//! jar assembly: I/O errors, container format violations, and the two
//! precondition failures the assembler can report before any write happens.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Bootweld operations.
#[derive(Debug, Error)]
pub enum BootweldError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic number in archive header.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Invalid header format.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Unsupported compression method.
    #[error("Unsupported compression method: {method}")]
    UnsupportedMethod {
        /// The compression method identifier.
        method: String,
    },

    /// CRC checksum mismatch.
    #[error("CRC mismatch: expected {expected:#x}, computed {computed:#x}")]
    CrcMismatch {
        /// Expected CRC value from archive.
        expected: u32,
        /// Computed CRC value from data.
        computed: u32,
    },

    /// Entry not found in archive.
    #[error("Entry not found: {name}")]
    EntryNotFound {
        /// Name of the missing entry.
        name: String,
    },

    /// Source archive to assemble from does not exist.
    #[error("Source archive not found: {path}")]
    MissingSourceArchive {
        /// The missing path.
        path: PathBuf,
    },

    /// No class satisfies both entry-point discovery criteria.
    #[error("No entry-point class found: no candidate declares a main method and carries the marker annotation")]
    NoEntryPointFound,
}

/// Result type alias for Bootweld operations.
pub type Result<T> = std::result::Result<T, BootweldError>;

impl BootweldError {
    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create an unsupported method error.
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod {
            method: method.into(),
        }
    }

    /// Create a CRC mismatch error.
    pub fn crc_mismatch(expected: u32, computed: u32) -> Self {
        Self::CrcMismatch { expected, computed }
    }

    /// Create an entry not found error.
    pub fn entry_not_found(name: impl Into<String>) -> Self {
        Self::EntryNotFound { name: name.into() }
    }

    /// Create a missing source archive error.
    pub fn missing_source_archive(path: impl Into<PathBuf>) -> Self {
        Self::MissingSourceArchive { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BootweldError::invalid_magic(vec![0x50, 0x4B], vec![0x1F, 0x8B]);
        assert!(err.to_string().contains("Invalid magic"));

        let err = BootweldError::crc_mismatch(0x12345678, 0xDEADBEEF);
        assert!(err.to_string().contains("CRC mismatch"));

        let err = BootweldError::missing_source_archive("/tmp/app.jar");
        assert!(err.to_string().contains("/tmp/app.jar"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: BootweldError = io_err.into();
        assert!(matches!(err, BootweldError::Io(_)));
    }
}
