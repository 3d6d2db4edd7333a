//! ZIP container format support.
//!
//! A forward-only writer and a central-directory reader covering the subset
//! of the PKWARE APPNOTE the jar assembler needs. Zip64 archives are out of
//! range; entries and offsets are capped at 4 GiB.

mod reader;
mod writer;

pub use reader::ZipReader;
pub use writer::ZipWriter;

/// ZIP local file header signature.
pub const LOCAL_FILE_HEADER_SIG: u32 = 0x04034B50;

/// ZIP central directory header signature.
pub const CENTRAL_DIR_HEADER_SIG: u32 = 0x02014B50;

/// ZIP end of central directory signature.
pub const END_OF_CENTRAL_DIR_SIG: u32 = 0x06054B50;

/// Upper bound for zip32 sizes and offsets (the zip64 marker value).
pub const MAX_ENTRY_SIZE: u64 = 0xFFFF_FFFF;
