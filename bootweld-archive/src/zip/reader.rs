//! Central-directory ZIP reader.
//!
//! Entry metadata always comes from the central directory, which carries
//! authoritative sizes and CRCs even for archives written with data
//! descriptors. Extraction inflates DEFLATE payloads and verifies the CRC.

use bootweld_core::crc::Crc32;
use bootweld_core::entry::{CompressionMethod, Entry, EntryKind};
use bootweld_core::error::{BootweldError, Result};
use flate2::read::DeflateDecoder;
use std::io::{Read, Seek, SeekFrom};

use super::{CENTRAL_DIR_HEADER_SIG, END_OF_CENTRAL_DIR_SIG};

/// Decompress a raw DEFLATE buffer.
fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

/// ZIP archive reader over any seekable byte source.
pub struct ZipReader<R: Read + Seek> {
    reader: R,
    entries: Vec<Entry>,
}

impl<R: Read + Seek> ZipReader<R> {
    /// Open an archive, reading its central directory.
    pub fn new(mut reader: R) -> Result<Self> {
        let entries = Self::read_central_directory(&mut reader)?;
        Ok(Self { reader, entries })
    }

    /// The entries in central directory order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Get entry metadata by exact name.
    pub fn entry_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Extract an entry's uncompressed content, verifying its CRC.
    pub fn extract(&mut self, entry: &Entry) -> Result<Vec<u8>> {
        self.reader.seek(SeekFrom::Start(entry.offset))?;
        let mut compressed = vec![0u8; entry.compressed_size as usize];
        self.reader.read_exact(&mut compressed)?;

        let content = match entry.method {
            CompressionMethod::Stored => compressed,
            CompressionMethod::Deflate => inflate(&compressed)?,
            CompressionMethod::Unknown(id) => {
                return Err(BootweldError::unsupported_method(format!("{}", id)))
            }
        };

        let computed = Crc32::compute(&content);
        if computed != entry.crc32 {
            return Err(BootweldError::crc_mismatch(entry.crc32, computed));
        }
        Ok(content)
    }

    /// Extract an entry by name.
    pub fn extract_by_name(&mut self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .entry_by_name(name)
            .cloned()
            .ok_or_else(|| BootweldError::entry_not_found(name))?;
        self.extract(&entry)
    }

    fn read_central_directory(reader: &mut R) -> Result<Vec<Entry>> {
        let (cd_offset, total_entries) = Self::locate_central_directory(reader)?;

        reader.seek(SeekFrom::Start(cd_offset))?;
        let mut raw = Vec::with_capacity(total_entries);
        for _ in 0..total_entries {
            raw.push(Self::read_central_record(reader)?);
        }

        // Resolve each data offset from the local header, whose name/extra
        // lengths may differ from the central record's.
        let mut entries = Vec::with_capacity(raw.len());
        for (mut entry, local_header_offset) in raw {
            reader.seek(SeekFrom::Start(local_header_offset + 26))?;
            let mut lens = [0u8; 4];
            reader.read_exact(&mut lens)?;
            let name_len = u16::from_le_bytes([lens[0], lens[1]]) as u64;
            let extra_len = u16::from_le_bytes([lens[2], lens[3]]) as u64;
            entry.offset = local_header_offset + 30 + name_len + extra_len;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Find the end-of-central-directory record and return
    /// `(cd_offset, entry_count)`.
    fn locate_central_directory(reader: &mut R) -> Result<(u64, usize)> {
        let file_size = reader.seek(SeekFrom::End(0))?;

        // Max trailing comment is 65535 bytes; EOCD itself is 22.
        let search_start = file_size.saturating_sub(65535 + 22);
        reader.seek(SeekFrom::Start(search_start))?;
        let mut tail = vec![0u8; (file_size - search_start) as usize];
        reader.read_exact(&mut tail)?;

        let sig = END_OF_CENTRAL_DIR_SIG.to_le_bytes();
        let eocd = tail
            .windows(4)
            .rposition(|w| w == sig)
            .ok_or_else(|| BootweldError::invalid_header("end of central directory not found"))?;
        let record = &tail[eocd..];
        if record.len() < 22 {
            return Err(BootweldError::invalid_header("truncated end record"));
        }

        let total_entries = u16::from_le_bytes([record[10], record[11]]) as usize;
        let cd_offset = u32::from_le_bytes([record[16], record[17], record[18], record[19]]) as u64;
        Ok((cd_offset, total_entries))
    }

    /// Read one central directory record, returning the entry and its
    /// local header offset.
    fn read_central_record(reader: &mut R) -> Result<(Entry, u64)> {
        let mut buf = [0u8; 46];
        reader.read_exact(&mut buf)?;

        let signature = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if signature != CENTRAL_DIR_HEADER_SIG {
            return Err(BootweldError::invalid_magic(
                CENTRAL_DIR_HEADER_SIG.to_le_bytes().to_vec(),
                signature.to_le_bytes().to_vec(),
            ));
        }

        let method = CompressionMethod::from_u16(u16::from_le_bytes([buf[10], buf[11]]));
        let crc32 = u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]);
        let compressed_size =
            u32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]) as u64;
        let uncompressed_size =
            u32::from_le_bytes([buf[24], buf[25], buf[26], buf[27]]) as u64;
        let name_len = u16::from_le_bytes([buf[28], buf[29]]) as usize;
        let extra_len = u16::from_le_bytes([buf[30], buf[31]]) as usize;
        let comment_len = u16::from_le_bytes([buf[32], buf[33]]) as usize;
        let local_header_offset =
            u32::from_le_bytes([buf[42], buf[43], buf[44], buf[45]]) as u64;

        let mut name_bytes = vec![0u8; name_len];
        reader.read_exact(&mut name_bytes)?;
        let name = String::from_utf8_lossy(&name_bytes).into_owned();

        // Extra field and comment carry nothing we use.
        reader.seek(SeekFrom::Current((extra_len + comment_len) as i64))?;

        let kind = if name.ends_with('/') {
            EntryKind::Directory
        } else {
            EntryKind::File
        };

        let entry = Entry {
            name,
            kind,
            size: uncompressed_size,
            compressed_size,
            method,
            crc32,
            offset: 0, // resolved by the caller
        };
        Ok((entry, local_header_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zip::ZipWriter;
    use std::io::Cursor;

    fn sample_archive() -> Vec<u8> {
        let mut output = Vec::new();
        {
            let mut writer = ZipWriter::new(&mut output);
            writer.add_file("a.txt", b"alpha").unwrap();
            writer.add_directory("dir/").unwrap();
            writer
                .add_file("dir/b.txt", "beta ".repeat(100).as_bytes())
                .unwrap();
            writer.finish().unwrap();
        }
        output
    }

    #[test]
    fn test_reads_entry_metadata() {
        let reader = ZipReader::new(Cursor::new(sample_archive())).unwrap();
        let names: Vec<_> = reader.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "dir/", "dir/b.txt"]);
        assert!(reader.entries()[1].is_dir());
    }

    #[test]
    fn test_extract_by_name() {
        let mut reader = ZipReader::new(Cursor::new(sample_archive())).unwrap();
        assert_eq!(reader.extract_by_name("a.txt").unwrap(), b"alpha");
        assert_eq!(
            reader.extract_by_name("dir/b.txt").unwrap(),
            "beta ".repeat(100).as_bytes()
        );
    }

    #[test]
    fn test_missing_entry() {
        let mut reader = ZipReader::new(Cursor::new(sample_archive())).unwrap();
        assert!(matches!(
            reader.extract_by_name("nope.txt"),
            Err(BootweldError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_not_a_zip() {
        let garbage = b"this is not an archive at all".to_vec();
        assert!(ZipReader::new(Cursor::new(garbage)).is_err());
    }

    #[test]
    fn test_crc_verified_on_extract() {
        let mut data = sample_archive();
        // Flip a byte inside the first entry's stored payload.
        let mut reader = ZipReader::new(Cursor::new(data.clone())).unwrap();
        let offset = reader.entries()[0].offset as usize;
        data[offset] ^= 0xFF;
        let mut reader = ZipReader::new(Cursor::new(data)).unwrap();
        let entry = reader.entries()[0].clone();
        assert!(matches!(
            reader.extract(&entry),
            Err(BootweldError::CrcMismatch { .. })
        ));
    }
}
