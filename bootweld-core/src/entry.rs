//! Archive entry metadata.
//!
//! Entries are tagged as file or directory by [`EntryKind`] rather than by a
//! trailing-slash convention, so directory synthesis in the writer stays
//! checkable by type.

/// Compression method used for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMethod {
    /// DEFLATE compression. The default for freshly written content.
    #[default]
    Deflate,
    /// No compression. Requires size and CRC-32 known before the entry
    /// header is written.
    Stored,
    /// Unknown/unsupported method (read from a foreign archive).
    Unknown(u16),
}

impl CompressionMethod {
    /// Create from the ZIP method identifier.
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::Stored,
            8 => Self::Deflate,
            _ => Self::Unknown(value),
        }
    }

    /// Convert to the ZIP method identifier.
    pub fn to_u16(&self) -> u16 {
        match self {
            Self::Stored => 0,
            Self::Deflate => 8,
            Self::Unknown(id) => *id,
        }
    }

    /// Check if this method is "stored" (no compression).
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored)
    }

    /// Get the method name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stored => "Stored",
            Self::Deflate => "Deflate",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(id) => write!(f, "Unknown({})", id),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Entry kind (file or synthesized directory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    /// Regular file entry with content.
    #[default]
    File,
    /// Directory entry; name ends with `/`, no content.
    Directory,
}

impl EntryKind {
    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// An entry in a ZIP/jar container.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The name/path of the entry within the archive.
    pub name: String,
    /// File or directory.
    pub kind: EntryKind,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// Compression method.
    pub method: CompressionMethod,
    /// CRC-32 of the uncompressed content.
    pub crc32: u32,
    /// Offset of the entry's data within the archive (reader use).
    pub offset: u64,
}

impl Entry {
    /// Create a file entry.
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size,
            compressed_size: size,
            method: CompressionMethod::default(),
            crc32: 0,
            offset: 0,
        }
    }

    /// Create a directory entry, normalizing the trailing slash.
    pub fn directory(name: impl Into<String>) -> Self {
        let mut name = name.into();
        if !name.ends_with('/') {
            name.push('/');
        }
        Self {
            name,
            kind: EntryKind::Directory,
            size: 0,
            compressed_size: 0,
            method: CompressionMethod::Stored,
            crc32: 0,
            offset: 0,
        }
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}

/// Parent directory path of an entry name, including the trailing slash.
///
/// Returns `None` for root-level names. A trailing slash on `name` itself
/// is ignored, so `a/b/` has parent `a/`.
pub fn parent_of(name: &str) -> Option<&str> {
    let trimmed = name.strip_suffix('/').unwrap_or(name);
    trimmed.rfind('/').map(|idx| &name[..idx + 1])
}
