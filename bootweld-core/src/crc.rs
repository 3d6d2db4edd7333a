//! CRC-32 checksums and streaming digests.
//!
//! The ZIP container verifies each entry with a CRC-32 (ISO 3309), and a
//! streaming writer must know the CRC and byte count of a stored entry
//! *before* its local header is emitted. [`Crc32`] is the incremental
//! checksum; [`StreamDigest`] consumes a whole reader once and captures
//! both values.

use std::io::Read;

/// Chunk size for streaming reads.
const BUFFER_SIZE: usize = 32 * 1024;

/// CRC-32 lookup table (polynomial 0xEDB88320, reflected).
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB88320;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// CRC-32 calculator (ISO 3309).
///
/// The standard CRC-32 used by ZIP, GZIP and PNG: reflected polynomial
/// 0xEDB88320, initial value 0xFFFFFFFF, final XOR 0xFFFFFFFF.
///
/// # Example
///
/// ```
/// use bootweld_core::crc::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"Hello, World!");
/// assert_eq!(crc.finalize(), 0xEC4AC3D0);
/// ```
#[derive(Debug, Clone)]
pub struct Crc32 {
    crc: u32,
}

impl Crc32 {
    /// Create a new CRC-32 calculator.
    pub fn new() -> Self {
        Self { crc: 0xFFFFFFFF }
    }

    /// Update the CRC with more data.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        let mut c = self.crc;
        for &byte in data {
            c = CRC32_TABLE[((c ^ byte as u32) & 0xFF) as usize] ^ (c >> 8);
        }
        self.crc = c;
    }

    /// Get the current CRC value (without finalizing).
    #[inline(always)]
    pub fn value(&self) -> u32 {
        self.crc ^ 0xFFFFFFFF
    }

    /// Finalize and return the CRC value.
    #[inline(always)]
    pub fn finalize(self) -> u32 {
        self.crc ^ 0xFFFFFFFF
    }

    /// Compute CRC-32 for a slice in one call.
    #[inline]
    pub fn compute(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(data);
        crc.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// CRC-32 and byte count of a fully consumed byte stream.
///
/// Stored (uncompressed) entries need both values up front, so callers run
/// the source through a `StreamDigest` first and then supply the bytes a
/// second time for the actual copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDigest {
    crc32: u32,
    size: u64,
}

impl StreamDigest {
    /// Consume the reader to the end, digesting every byte.
    pub fn consume<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut crc = Crc32::new();
        let mut size = 0u64;
        let mut buffer = [0u8; BUFFER_SIZE];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            crc.update(&buffer[..n]);
            size += n as u64;
        }
        Ok(Self {
            crc32: crc.finalize(),
            size,
        })
    }

    /// Digest an in-memory slice.
    pub fn of(data: &[u8]) -> Self {
        Self {
            crc32: Crc32::compute(data),
            size: data.len() as u64,
        }
    }

    /// The CRC-32 of the consumed bytes.
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    /// The number of bytes consumed.
    pub fn size(&self) -> u64 {
        self.size
    }
}
