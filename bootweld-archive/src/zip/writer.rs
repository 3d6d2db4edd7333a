//! Sequential ZIP writer.
//!
//! Every entry is written with its CRC and sizes in the local header (flags
//! stay zero, no data descriptors), which is what makes stored entries with
//! precomputed digests possible in a forward-only stream. The central
//! directory is emitted on [`ZipWriter::finish`].

use bootweld_core::crc::{Crc32, StreamDigest};
use bootweld_core::entry::CompressionMethod;
use bootweld_core::error::{BootweldError, Result};
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::{
    CENTRAL_DIR_HEADER_SIG, END_OF_CENTRAL_DIR_SIG, LOCAL_FILE_HEADER_SIG, MAX_ENTRY_SIZE,
};

/// Compress a buffer with raw DEFLATE (no zlib wrapper).
fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Pending central directory record for a written entry.
#[derive(Debug, Clone)]
struct CentralDirRecord {
    method: u16,
    mtime: u16,
    mdate: u16,
    crc32: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    filename: String,
    /// Unix mode shifted into the external attribute field.
    external_attr: u32,
    local_header_offset: u32,
}

impl CentralDirRecord {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let filename_bytes = self.filename.as_bytes();
        writer.write_all(&CENTRAL_DIR_HEADER_SIG.to_le_bytes())?;
        // Version made by: Unix, 2.0
        writer.write_all(&0x0314u16.to_le_bytes())?;
        writer.write_all(&version_needed(self.method).to_le_bytes())?;
        // Flags
        writer.write_all(&0u16.to_le_bytes())?;
        writer.write_all(&self.method.to_le_bytes())?;
        writer.write_all(&self.mtime.to_le_bytes())?;
        writer.write_all(&self.mdate.to_le_bytes())?;
        writer.write_all(&self.crc32.to_le_bytes())?;
        writer.write_all(&self.compressed_size.to_le_bytes())?;
        writer.write_all(&self.uncompressed_size.to_le_bytes())?;
        writer.write_all(&(filename_bytes.len() as u16).to_le_bytes())?;
        // Extra field length, comment length, disk start, internal attrs
        writer.write_all(&0u16.to_le_bytes())?;
        writer.write_all(&0u16.to_le_bytes())?;
        writer.write_all(&0u16.to_le_bytes())?;
        writer.write_all(&0u16.to_le_bytes())?;
        writer.write_all(&self.external_attr.to_le_bytes())?;
        writer.write_all(&self.local_header_offset.to_le_bytes())?;
        writer.write_all(filename_bytes)?;
        Ok(())
    }

    fn written_size(&self) -> u64 {
        46 + self.filename.len() as u64
    }
}

/// Minimum extract version: 2.0 for deflate, 1.0 for store.
fn version_needed(method: u16) -> u16 {
    if method == 8 {
        20
    } else {
        10
    }
}

/// Forward-only ZIP archive writer.
///
/// The writer owns its output stream exclusively until [`finish`] runs; any
/// attempt to add entries afterwards is rejected.
///
/// [`finish`]: ZipWriter::finish
pub struct ZipWriter<W: Write> {
    writer: W,
    entries: Vec<CentralDirRecord>,
    offset: u64,
    finished: bool,
}

impl<W: Write> ZipWriter<W> {
    /// Create a new ZIP writer over an output stream.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entries: Vec::new(),
            offset: 0,
            finished: false,
        }
    }

    /// Add a file entry, compressing with DEFLATE.
    ///
    /// Falls back to STORE when compression does not shrink the content.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let compressed = deflate(data)?;
        let (payload, method) = if compressed.len() < data.len() {
            (compressed.as_slice(), CompressionMethod::Deflate)
        } else {
            (data, CompressionMethod::Stored)
        };
        let crc32 = Crc32::compute(data);
        self.begin_entry(name, method, crc32, payload.len() as u64, data.len() as u64)?;
        self.writer.write_all(payload)?;
        self.offset += payload.len() as u64;
        Ok(())
    }

    /// Add a file entry with STORE method, streaming content from a reader.
    ///
    /// The digest must cover exactly the bytes the reader will yield; a
    /// short or long stream invalidates the already-written header and is
    /// reported as an error.
    pub fn add_file_stored<R: Read>(
        &mut self,
        name: &str,
        digest: StreamDigest,
        reader: &mut R,
    ) -> Result<()> {
        self.begin_entry(
            name,
            CompressionMethod::Stored,
            digest.crc32(),
            digest.size(),
            digest.size(),
        )?;
        let copied = io::copy(reader, &mut self.writer)?;
        if copied != digest.size() {
            return Err(BootweldError::invalid_header(format!(
                "stored entry {}: digest size {} but stream yielded {}",
                name,
                digest.size(),
                copied
            )));
        }
        self.offset += copied;
        Ok(())
    }

    /// Add a directory entry (no content).
    pub fn add_directory(&mut self, name: &str) -> Result<()> {
        let dir_name = if name.ends_with('/') {
            name.to_string()
        } else {
            format!("{}/", name)
        };
        self.begin_entry_full(
            &dir_name,
            CompressionMethod::Stored,
            0,
            0,
            0,
            0o40755 << 16,
        )
    }

    fn begin_entry(
        &mut self,
        name: &str,
        method: CompressionMethod,
        crc32: u32,
        compressed_size: u64,
        uncompressed_size: u64,
    ) -> Result<()> {
        self.begin_entry_full(
            name,
            method,
            crc32,
            compressed_size,
            uncompressed_size,
            0o100644 << 16,
        )
    }

    /// Write the local header and queue the central directory record.
    fn begin_entry_full(
        &mut self,
        name: &str,
        method: CompressionMethod,
        crc32: u32,
        compressed_size: u64,
        uncompressed_size: u64,
        external_attr: u32,
    ) -> Result<()> {
        if self.finished {
            return Err(BootweldError::invalid_header(
                "write after finish".to_string(),
            ));
        }
        if compressed_size >= MAX_ENTRY_SIZE
            || uncompressed_size >= MAX_ENTRY_SIZE
            || self.offset >= MAX_ENTRY_SIZE
        {
            return Err(BootweldError::unsupported_method(
                "entry exceeds 4 GiB; zip64 archives are not supported",
            ));
        }

        let method_id = method.to_u16();
        let (mtime, mdate) = current_dos_time();
        let filename_bytes = name.as_bytes();
        let local_header_offset = self.offset as u32;

        self.writer.write_all(&LOCAL_FILE_HEADER_SIG.to_le_bytes())?;
        self.writer.write_all(&version_needed(method_id).to_le_bytes())?;
        // Flags (sizes and CRC are known up front)
        self.writer.write_all(&0u16.to_le_bytes())?;
        self.writer.write_all(&method_id.to_le_bytes())?;
        self.writer.write_all(&mtime.to_le_bytes())?;
        self.writer.write_all(&mdate.to_le_bytes())?;
        self.writer.write_all(&crc32.to_le_bytes())?;
        self.writer.write_all(&(compressed_size as u32).to_le_bytes())?;
        self.writer.write_all(&(uncompressed_size as u32).to_le_bytes())?;
        self.writer.write_all(&(filename_bytes.len() as u16).to_le_bytes())?;
        // Extra field length
        self.writer.write_all(&0u16.to_le_bytes())?;
        self.writer.write_all(filename_bytes)?;

        self.offset += 30 + filename_bytes.len() as u64;

        self.entries.push(CentralDirRecord {
            method: method_id,
            mtime,
            mdate,
            crc32,
            compressed_size: compressed_size as u32,
            uncompressed_size: uncompressed_size as u32,
            filename: name.to_string(),
            external_attr,
            local_header_offset,
        });
        Ok(())
    }

    /// Finish writing the archive: central directory plus end record.
    ///
    /// Idempotent; later calls are no-ops.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        let central_dir_offset = self.offset;
        let mut central_dir_size = 0u64;
        for entry in &self.entries {
            central_dir_size += entry.written_size();
            entry.write(&mut self.writer)?;
        }

        let num_entries = self.entries.len();
        if num_entries > u16::MAX as usize || central_dir_offset >= MAX_ENTRY_SIZE {
            return Err(BootweldError::unsupported_method(
                "central directory exceeds zip32 limits",
            ));
        }

        self.writer.write_all(&END_OF_CENTRAL_DIR_SIG.to_le_bytes())?;
        // Disk number, disk with central directory
        self.writer.write_all(&0u16.to_le_bytes())?;
        self.writer.write_all(&0u16.to_le_bytes())?;
        self.writer.write_all(&(num_entries as u16).to_le_bytes())?;
        self.writer.write_all(&(num_entries as u16).to_le_bytes())?;
        self.writer.write_all(&(central_dir_size as u32).to_le_bytes())?;
        self.writer.write_all(&(central_dir_offset as u32).to_le_bytes())?;
        // Comment length
        self.writer.write_all(&0u16.to_le_bytes())?;

        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }
}

impl<W: Write> Drop for ZipWriter<W> {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}

/// Current time in DOS date/time format (2-second resolution).
fn current_dos_time() -> (u16, u16) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO);

    let secs = now.as_secs();
    let days = secs / 86400;
    let time_of_day = secs % 86400;

    let hours = (time_of_day / 3600) as u16;
    let minutes = ((time_of_day % 3600) / 60) as u16;
    let seconds = ((time_of_day % 60) / 2) as u16;
    let mtime = (hours << 11) | (minutes << 5) | seconds;

    // Approximate date; DOS epoch is 1980.
    let years = days / 365;
    let year = (1970 + years) as u16;
    let day_of_year = days % 365;
    let month = ((day_of_year / 30) + 1).min(12) as u16;
    let day = ((day_of_year % 30) + 1) as u16;
    let mdate = if year >= 1980 {
        ((year - 1980) << 9) | (month << 5) | day
    } else {
        0
    };

    (mtime, mdate)
}
