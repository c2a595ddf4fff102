//! The fixed 128 KiB header: magic, version, maxzoom, compression kind, and a
//! compressed opaque metadata blob, all in the first region of the archive.

use crate::compression::Compression;
use crate::error::{Error, Result};
use crate::geometry::HEADER_SIZE;

const MAGIC: &[u8; 2] = b"S2";
const PREAMBLE_SIZE: usize = 10;
const METADATA_CAPACITY: usize = HEADER_SIZE as usize - PREAMBLE_SIZE;

/// Current on-disk format version.
pub const VERSION: u16 = 1;

/// Parsed view of the fixed header region.
///
/// Byte layout (little-endian throughout):
/// * `0..2`   — magic `"S2"`
/// * `2..4`   — format version, `u16`
/// * `4`      — maxzoom
/// * `5`      — compression kind (applies to both tile payloads and metadata)
/// * `6..10`  — compressed metadata length, `u32`
/// * `10..`   — compressed metadata bytes, zero-padded to fill the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// format version
    pub version: u16,
    /// maximum zoom level stored in the archive
    pub maxzoom: u8,
    /// compression applied to tile payloads and to the metadata blob
    pub compression: Compression,
    /// compressed metadata bytes, as stored on disk
    pub metadata: Vec<u8>,
}

impl Header {
    /// Build a header from already-compressed metadata bytes.
    pub fn new(maxzoom: u8, compression: Compression, metadata: Vec<u8>) -> Result<Header> {
        if metadata.is_empty() {
            return Err(Error::MissingMetadata);
        }
        if metadata.len() > METADATA_CAPACITY {
            return Err(Error::MetadataTooLarge { len: metadata.len() });
        }
        Ok(Header {
            version: VERSION,
            maxzoom,
            compression,
            metadata,
        })
    }

    /// Serialize into a fixed `HEADER_SIZE`-byte buffer, zero-padded.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.metadata.is_empty() {
            return Err(Error::MissingMetadata);
        }
        if self.metadata.len() > METADATA_CAPACITY {
            return Err(Error::MetadataTooLarge {
                len: self.metadata.len(),
            });
        }
        let mut buf = vec![0u8; HEADER_SIZE as usize];
        buf[0..2].copy_from_slice(MAGIC);
        buf[2..4].copy_from_slice(&self.version.to_le_bytes());
        buf[4] = self.maxzoom;
        buf[5] = self.compression.into();
        buf[6..10].copy_from_slice(&(self.metadata.len() as u32).to_le_bytes());
        buf[PREAMBLE_SIZE..PREAMBLE_SIZE + self.metadata.len()].copy_from_slice(&self.metadata);
        Ok(buf)
    }

    /// Parse a header out of a `HEADER_SIZE`-byte buffer.
    pub fn from_bytes(buf: &[u8]) -> Result<Header> {
        if buf.len() < PREAMBLE_SIZE || &buf[0..2] != MAGIC {
            return Err(Error::BadMagic);
        }
        let version = u16::from_le_bytes([buf[2], buf[3]]);
        let maxzoom = buf[4];
        let compression = Compression::from(buf[5]);
        let metadata_len = u32::from_le_bytes([buf[6], buf[7], buf[8], buf[9]]) as usize;
        if metadata_len == 0 {
            return Err(Error::MissingMetadata);
        }
        if metadata_len > METADATA_CAPACITY || PREAMBLE_SIZE + metadata_len > buf.len() {
            return Err(Error::MetadataTooLarge { len: metadata_len });
        }
        let metadata = buf[PREAMBLE_SIZE..PREAMBLE_SIZE + metadata_len].to_vec();
        Ok(Header {
            version,
            maxzoom,
            compression,
            metadata,
        })
    }
}
